use crate::{
    client::{
        model::{Timestamp, VerdictResponse},
        ApiError,
    },
    problem::ProblemCatalog,
    verdict::{VerdictPoller, VerdictSource},
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

/// What [`MockVerdictSource`] answers to one request.
pub struct Reply {
    pub delay: Duration,
    pub result: Result<VerdictResponse, ApiError>,
}

impl Reply {
    pub fn ok(res: VerdictResponse) -> Reply {
        Reply {
            delay: Duration::ZERO,
            result: Ok(res),
        }
    }

    pub fn fail() -> Reply {
        Reply {
            delay: Duration::ZERO,
            result: Err(ApiError::Status(
                reqwest::StatusCode::BAD_GATEWAY,
                "upstream down".into(),
            )),
        }
    }

    pub fn after(mut self, delay: Duration) -> Reply {
        self.delay = delay;
        self
    }
}

/// A verdict source answering from a script keyed by request number.
pub struct MockVerdictSource {
    calls: AtomicUsize,
    script: Box<dyn Fn(usize) -> Reply + Send + Sync>,
}

impl MockVerdictSource {
    pub fn new(script: impl Fn(usize) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(MockVerdictSource {
            calls: AtomicUsize::new(0),
            script: Box::new(script),
        })
    }

    pub fn always(res: VerdictResponse) -> Arc<Self> {
        Self::new(move |_| Reply::ok(res.clone()))
    }

    /// Number of requests made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VerdictSource for MockVerdictSource {
    async fn fetch_verdict(&self, _submission_id: &str) -> Result<VerdictResponse, ApiError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.script)(n);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

pub fn verdict_response(verdict: i32, verdict_list: Vec<i32>) -> VerdictResponse {
    let passed = verdict_list.iter().filter(|&&v| v == 3).count() as u32;
    VerdictResponse {
        date: Timestamp {
            seconds: 1_700_000_000,
        },
        passed_cases: passed,
        total_cases: verdict_list.len() as u32,
        problem_id: "two-sum".into(),
        verdict,
        verdict_list,
    }
}

pub fn poller(source: &Arc<MockVerdictSource>) -> VerdictPoller<MockVerdictSource> {
    let mut titles = HashMap::new();
    titles.insert("two-sum".to_owned(), "Two Sum".to_owned());
    let titles: Arc<dyn ProblemCatalog> = Arc::new(titles);
    VerdictPoller::new(source.clone(), titles, "1")
}

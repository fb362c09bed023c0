use super::VerdictSnapshot;
use crate::{
    client::{model::VerdictResponse, ApiError},
    prelude::*,
    problem::ProblemCatalog,
};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing_futures::Instrument;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Anything that can fetch the verdict of a submission.
#[async_trait]
pub trait VerdictSource: Send + Sync {
    async fn fetch_verdict(&self, submission_id: &str) -> Result<VerdictResponse, ApiError>;
}

/// What the verdict view currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Nothing has been fetched successfully yet.
    Loading,
    Displaying(VerdictSnapshot),
}

impl PollState {
    pub fn snapshot(&self) -> Option<&VerdictSnapshot> {
        match self {
            PollState::Loading => None,
            PollState::Displaying(s) => Some(s),
        }
    }
}

/// Periodically fetches the verdict of one submission.
pub struct VerdictPoller<S> {
    source: Arc<S>,
    problems: Arc<dyn ProblemCatalog>,
    submission_id: String,
    interval: Duration,
    stop_on_settled: bool,
}

impl<S: VerdictSource + 'static> VerdictPoller<S> {
    pub fn new(
        source: Arc<S>,
        problems: Arc<dyn ProblemCatalog>,
        submission_id: impl Into<String>,
    ) -> Self {
        VerdictPoller {
            source,
            problems,
            submission_id: submission_id.into(),
            interval: DEFAULT_POLL_INTERVAL,
            stop_on_settled: false,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Stop polling once the verdict and every test case are final.
    pub fn stop_on_settled(mut self, stop: bool) -> Self {
        self.stop_on_settled = stop;
        self
    }

    /// Start polling. The first request goes out immediately, then one every
    /// interval until the returned handle is deactivated or dropped.
    pub fn activate(self) -> PollHandle {
        let (state_tx, state_rx) = watch::channel(PollState::Loading);
        let cancel = CancellationToken::new();
        let span = tracing::info_span!("poll_verdict", submission = %self.submission_id);
        let task = tokio::spawn(self.run(state_tx, cancel.clone()).instrument(span));
        PollHandle {
            state: state_rx,
            cancel,
            task: Some(task),
        }
    }

    async fn run(self, state: watch::Sender<PollState>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Fetches run concurrently; each result carries the sequence number
        // of the request that produced it.
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();
        let mut next_seq = 0u64;
        let mut last_applied = None;

        tracing::info!("Start polling every {:?}", self.interval);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some((seq, res)) = result_rx.recv() => {
                    if self.apply(seq, res, &mut last_applied, &state) {
                        tracing::info!("Verdict settled");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let seq = next_seq;
                    next_seq += 1;
                    let source = self.source.clone();
                    let id = self.submission_id.clone();
                    let result_tx = result_tx.clone();
                    tokio::spawn(
                        async move {
                            tracing::debug!("Request #{}", seq);
                            let res = source.fetch_verdict(&id).await;
                            let _ = result_tx.send((seq, res));
                        }
                        .in_current_span(),
                    );
                }
            }
        }
        tracing::info!("Stopped polling");
    }

    /// Apply one fetch result. Returns whether polling should stop.
    fn apply(
        &self,
        seq: u64,
        res: Result<VerdictResponse, ApiError>,
        last_applied: &mut Option<u64>,
        state: &watch::Sender<PollState>,
    ) -> bool {
        let res = match res {
            Ok(res) => res,
            Err(e) if e.is_transient() => {
                tracing::warn!("Verdict fetch failed, retrying next tick: {}", e);
                return false;
            }
            Err(e) => {
                tracing::warn!("Verdict fetch failed: {}", e);
                return false;
            }
        };
        if matches!(*last_applied, Some(last) if seq < last) {
            tracing::debug!("Dropping stale response #{}", seq);
            return false;
        }
        *last_applied = Some(seq);

        let snapshot = VerdictSnapshot::from_response(&res, &*self.problems);
        let settled = snapshot.is_settled();
        state.send_if_modified(move |current| {
            if matches!(current, PollState::Displaying(s) if *s == snapshot) {
                return false;
            }
            *current = PollState::Displaying(snapshot);
            true
        });
        self.stop_on_settled && settled
    }
}

/// Handle to an active poller. Dropping it stops polling.
pub struct PollHandle {
    state: watch::Receiver<PollState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Wait for the next displayed change. Returns `false` once the poller
    /// has stopped.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// Stop polling and wait for the poll loop to exit. Results of requests
    /// still in flight are discarded.
    pub async fn deactivate(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Poll task failed: {}", e);
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

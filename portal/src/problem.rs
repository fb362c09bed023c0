//! Problem titles and per-problem submission status.

use crate::{
    client::model::{SubmissionBrief, SubmissionsRequest},
    config::ConfigError,
    verdict::VerdictCode,
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, path::Path};

/// Looks up human-readable problem titles.
pub trait ProblemCatalog: Send + Sync {
    fn title(&self, problem_id: &str) -> Option<String>;
}

impl ProblemCatalog for HashMap<String, String> {
    fn title(&self, problem_id: &str) -> Option<String> {
        self.get(problem_id).cloned()
    }
}

/// Read a TOML file of `problem-id = "Title"` pairs.
pub async fn load_problem_titles(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let s = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read(path.to_owned(), e))?;
    Ok(toml::from_str(&s)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSubmission {
    pub verdict: VerdictCode,
    pub time: Option<DateTime<Utc>>,
}

/// The "Status" card of a problem page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemStatus {
    /// Any submission was accepted.
    pub solved: bool,
    /// The first few submissions, in the order the backend sent them.
    pub recent: Vec<RecentSubmission>,
}

impl ProblemStatus {
    pub const RECENT_LIMIT: usize = 5;

    /// The `/getSubmissions` request backing the status of `problem_ids`.
    /// Full submissions are asked for, not the brief form.
    pub fn request(problem_ids: &[String], uid: &str) -> SubmissionsRequest {
        SubmissionsRequest {
            problem_ids: problem_ids.to_vec(),
            uid: uid.to_owned(),
            is_brief: false,
        }
    }

    pub fn from_submissions(submissions: &[SubmissionBrief], limit: usize) -> ProblemStatus {
        ProblemStatus {
            solved: submissions
                .iter()
                .any(|s| VerdictCode(s.verdict).is_accepted()),
            recent: submissions
                .iter()
                .take(limit)
                .map(|s| RecentSubmission {
                    verdict: VerdictCode(s.verdict),
                    time: s.date.to_datetime(),
                })
                .collect(),
        }
    }
}

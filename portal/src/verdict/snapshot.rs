use super::{CaseStatus, VerdictCode};
use crate::{client::model::VerdictResponse, problem::ProblemCatalog};
use chrono::{Datelike, NaiveDate};

/// Problem name shown when the problem id is unknown.
pub const CUSTOM_SUBMISSION: &str = "Custom Submission";

/// The latest known state of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictSnapshot {
    /// Submission date (UTC).
    pub date: Option<NaiveDate>,
    pub problem_name: String,
    pub overall_verdict: VerdictCode,
    /// `"X of Y"`.
    pub cases_passed: String,
    /// One verdict code per test case.
    pub case_statuses: Vec<i32>,
    pub language: Option<String>,
    pub time: Option<String>,
    pub memory: Option<String>,
}

impl VerdictSnapshot {
    pub fn from_response(res: &VerdictResponse, problems: &dyn ProblemCatalog) -> VerdictSnapshot {
        VerdictSnapshot {
            date: res.date.to_datetime().map(|d| d.naive_utc().date()),
            problem_name: problems
                .title(&res.problem_id)
                .unwrap_or_else(|| CUSTOM_SUBMISSION.to_owned()),
            overall_verdict: VerdictCode(res.verdict),
            cases_passed: format!("{} of {}", res.passed_cases, res.total_cases),
            case_statuses: res.verdict_list.clone(),
            language: None,
            time: None,
            memory: None,
        }
    }

    /// `M-D-YYYY`, or an empty string if the date is unknown.
    pub fn date_string(&self) -> String {
        self.date
            .map(|d| format!("{}-{}-{}", d.month(), d.day(), d.year()))
            .unwrap_or_default()
    }

    pub fn case_icons(&self) -> Vec<CaseStatus> {
        self.case_statuses
            .iter()
            .map(|&c| CaseStatus::from_code(c))
            .collect()
    }

    /// The overall verdict is final and no test case is still pending.
    pub fn is_settled(&self) -> bool {
        self.overall_verdict.is_final()
            && self
                .case_icons()
                .iter()
                .all(|&s| s != CaseStatus::Pending)
    }
}

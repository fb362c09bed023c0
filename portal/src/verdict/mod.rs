//! Verdict codes, snapshots and polling.

mod poll;
pub mod render;
mod snapshot;

pub use poll::*;
pub use snapshot::*;

use serde::{Deserialize, Serialize};

/// Verdict code of an accepted submission or test case. Lower codes are
/// still in progress, higher codes are failures.
pub const ACCEPTED: i32 = 3;

/// A verdict code as sent by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerdictCode(pub i32);

/// Display data of a verdict code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictInfo {
    pub description: &'static str,
    /// Hex display color.
    pub color: &'static str,
}

const GREY: &str = "#808080";
const GREEN: &str = "#1db924";
const RED: &str = "#ff5555";
const ORANGE: &str = "#f2a93b";
const PURPLE: &str = "#9b59b6";

impl VerdictCode {
    pub fn info(self) -> VerdictInfo {
        let (description, color) = match self.0 {
            1 => ("In Queue", GREY),
            2 => ("Processing", GREY),
            3 => ("Accepted", GREEN),
            4 => ("Wrong Answer", RED),
            5 => ("Time Limit Exceeded", ORANGE),
            6 => ("Compilation Error", PURPLE),
            7 => ("Runtime Error (SIGSEGV)", RED),
            8 => ("Runtime Error (SIGXFSZ)", RED),
            9 => ("Runtime Error (SIGFPE)", RED),
            10 => ("Runtime Error (SIGABRT)", RED),
            11 => ("Runtime Error (NZEC)", RED),
            12 => ("Runtime Error (Other)", RED),
            13 => ("Internal Error", PURPLE),
            14 => ("Exec Format Error", PURPLE),
            _ => ("Unknown", GREY),
        };
        VerdictInfo { description, color }
    }

    pub fn is_accepted(self) -> bool {
        self.0 == ACCEPTED
    }

    /// Whether judging has finished, successfully or not.
    pub fn is_final(self) -> bool {
        self.0 >= ACCEPTED
    }
}

impl std::fmt::Display for VerdictCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.info().description)
    }
}

/// How a single test case is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    Correct,
    Failed,
    Pending,
}

impl CaseStatus {
    pub fn from_code(code: i32) -> CaseStatus {
        match code {
            ACCEPTED => CaseStatus::Correct,
            c if c > ACCEPTED => CaseStatus::Failed,
            _ => CaseStatus::Pending,
        }
    }
}

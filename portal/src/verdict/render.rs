//! Plain-text rendering of the verdict table.

use super::{CaseStatus, PollState, VerdictSnapshot};
use itertools::Itertools;
use std::borrow::Cow;

/// Width of one relative width unit, in characters.
const UNIT: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Problem,
    Verdict,
    Language,
    Time,
    Memory,
    TestCases,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Date,
        Column::Problem,
        Column::Verdict,
        Column::Language,
        Column::Time,
        Column::Memory,
        Column::TestCases,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Problem => "Problem",
            Column::Verdict => "Verdict",
            Column::Language => "Language",
            Column::Time => "Time",
            Column::Memory => "Memory",
            Column::TestCases => "Test Cases",
        }
    }

    /// Relative width of the column.
    pub fn weight(self) -> f32 {
        match self {
            Column::Date | Column::Problem | Column::Verdict => 2.0,
            _ => 1.5,
        }
    }

    pub fn width(self) -> usize {
        (self.weight() * UNIT) as usize
    }

    pub fn cell(self, snapshot: &VerdictSnapshot) -> Cow<'_, str> {
        fn optional(v: &Option<String>) -> Cow<'_, str> {
            v.as_deref().map_or(Cow::Borrowed("-"), Cow::Borrowed)
        }
        match self {
            Column::Date => Cow::Owned(snapshot.date_string()),
            Column::Problem => Cow::Borrowed(&snapshot.problem_name),
            Column::Verdict => Cow::Borrowed(snapshot.overall_verdict.info().description),
            Column::Language => optional(&snapshot.language),
            Column::Time => optional(&snapshot.time),
            Column::Memory => optional(&snapshot.memory),
            Column::TestCases => Cow::Borrowed(&snapshot.cases_passed),
        }
    }
}

pub fn glyph(status: CaseStatus) -> char {
    match status {
        CaseStatus::Correct => '✔',
        CaseStatus::Failed => '✘',
        CaseStatus::Pending => '…',
    }
}

fn row<'a>(cells: impl Iterator<Item = (Column, Cow<'a, str>)>) -> String {
    cells
        .map(|(col, s)| format!("{:<width$}", s, width = col.width()))
        .join(" ")
        .trim_end()
        .to_owned()
}

pub fn header() -> String {
    row(Column::ALL.iter().map(|&c| (c, Cow::Borrowed(c.title()))))
}

pub fn values(snapshot: &VerdictSnapshot) -> String {
    row(Column::ALL.iter().map(|&c| (c, c.cell(snapshot))))
}

/// One glyph per test case, in order.
pub fn case_icons(snapshot: &VerdictSnapshot) -> String {
    snapshot.case_icons().into_iter().map(glyph).join(" ")
}

pub fn render_snapshot(snapshot: &VerdictSnapshot) -> String {
    format!(
        "{}\n{}\n{}",
        header(),
        values(snapshot),
        case_icons(snapshot)
    )
}

pub fn render_state(submission_id: &str, state: &PollState) -> String {
    let body = match state {
        PollState::Loading => "Loading...".to_owned(),
        PollState::Displaying(s) => render_snapshot(s),
    };
    format!("Submission #{}\n{}", submission_id, body)
}

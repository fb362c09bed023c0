//! Request and response bodies of the judge backend.

use crate::util::string_or_number;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A point in time as the backend serializes it, `{ "seconds": 1700000000 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
}

impl Timestamp {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, 0).single()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictRequest {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictResponse {
    pub date: Timestamp,
    pub passed_cases: u32,
    pub total_cases: u32,
    #[serde(default, deserialize_with = "string_or_number")]
    pub problem_id: String,
    pub verdict: i32,
    #[serde(default)]
    pub verdict_list: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsRequest {
    pub problem_ids: Vec<String>,
    pub uid: String,
    pub is_brief: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsResponse {
    pub submissions_per_problem: Vec<ProblemSubmissions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemSubmissions {
    #[serde(default)]
    pub submissions: Vec<SubmissionBrief>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionBrief {
    pub verdict: i32,
    pub date: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDataRequest {
    pub uid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDataResponse {
    pub username: String,
    pub email: String,
    pub name: String,
    pub school: String,
    pub problems_attempted: u32,
    pub problems_accepted: u32,
    pub problems_wrong: u32,
    #[serde(rename = "problemsTLE")]
    pub problems_tle: u32,
    #[serde(rename = "problemsRTE")]
    pub problems_rte: u32,
}

/// Only the fields that changed are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserDataRequest {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

/// Per-field outcome strings: `"Success"`, `"Not Updated"`, or an error
/// message. Fields the server did not mention are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateUserDataResponse {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub school: Option<String>,
}

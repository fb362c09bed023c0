//! Profile editing state.
//!
//! Only fields that differ from the saved profile are submitted. The backend
//! answers with one status string per field; fields it did not accept are
//! reverted and marked so the user can try again.

use crate::client::model::{UpdateUserDataRequest, UpdateUserDataResponse, UserDataResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Username,
    Email,
    Name,
    School,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Username,
        ProfileField::Email,
        ProfileField::Name,
        ProfileField::School,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Username => "Username",
            ProfileField::Email => "Email",
            ProfileField::Name => "Name",
            ProfileField::School => "School",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileData {
    pub username: String,
    pub email: String,
    pub name: String,
    pub school: String,
}

impl ProfileData {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Username => &self.username,
            ProfileField::Email => &self.email,
            ProfileField::Name => &self.name,
            ProfileField::School => &self.school,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::Username => &mut self.username,
            ProfileField::Email => &mut self.email,
            ProfileField::Name => &mut self.name,
            ProfileField::School => &mut self.school,
        };
        *slot = value;
    }
}

impl From<&UserDataResponse> for ProfileData {
    fn from(res: &UserDataResponse) -> Self {
        ProfileData {
            username: res.username.clone(),
            email: res.email.clone(),
            name: res.name.clone(),
            school: res.school.clone(),
        }
    }
}

/// Read-only submission counters shown next to the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileCounters {
    pub attempted: u32,
    pub accepted: u32,
    pub wrong: u32,
    pub tle: u32,
    pub rte: u32,
}

impl From<&UserDataResponse> for ProfileCounters {
    fn from(res: &UserDataResponse) -> Self {
        ProfileCounters {
            attempted: res.problems_attempted,
            accepted: res.problems_accepted,
            wrong: res.problems_wrong,
            tle: res.problems_tle,
            rte: res.problems_rte,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    NotUpdated,
    Success,
    /// Any other status string the backend sent back.
    Rejected(String),
}

impl FieldStatus {
    pub fn parse(s: &str) -> FieldStatus {
        match s {
            "Success" => FieldStatus::Success,
            "Not Updated" => FieldStatus::NotUpdated,
            other => FieldStatus::Rejected(other.to_owned()),
        }
    }

    pub fn has_issue(&self) -> bool {
        matches!(self, FieldStatus::Rejected(_))
    }

    pub fn message(&self) -> Option<String> {
        match self {
            FieldStatus::Rejected(reason) => Some(format!("Try Again: {}", reason)),
            _ => None,
        }
    }
}

fn response_status(res: &UpdateUserDataResponse, field: ProfileField) -> Option<&str> {
    match field {
        ProfileField::Username => res.username.as_deref(),
        ProfileField::Email => res.email.as_deref(),
        ProfileField::Name => res.name.as_deref(),
        ProfileField::School => res.school.as_deref(),
    }
}

#[derive(Debug, Clone)]
pub struct ProfileEditor {
    uid: String,
    saved: ProfileData,
    draft: ProfileData,
    counters: ProfileCounters,
    editing: bool,
    /// Fields of the update currently awaiting a response.
    submitted: Vec<ProfileField>,
    statuses: [FieldStatus; 4],
}

impl ProfileEditor {
    pub fn new(uid: impl Into<String>, data: &UserDataResponse) -> ProfileEditor {
        let saved = ProfileData::from(data);
        ProfileEditor {
            uid: uid.into(),
            draft: saved.clone(),
            saved,
            counters: ProfileCounters::from(data),
            editing: false,
            submitted: vec![],
            statuses: [
                FieldStatus::NotUpdated,
                FieldStatus::NotUpdated,
                FieldStatus::NotUpdated,
                FieldStatus::NotUpdated,
            ],
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn saved(&self) -> &ProfileData {
        &self.saved
    }

    pub fn draft(&self) -> &ProfileData {
        &self.draft
    }

    pub fn counters(&self) -> ProfileCounters {
        self.counters
    }

    pub fn status(&self, field: ProfileField) -> &FieldStatus {
        &self.statuses[field.index()]
    }

    pub fn field_message(&self, field: ProfileField) -> Option<String> {
        self.status(field).message()
    }

    /// Edit a draft field. Ignored while not editing.
    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        if !self.editing {
            tracing::debug!("Ignoring edit of {} outside editing", field.label());
            return;
        }
        self.draft.set(field, value.into());
    }

    pub fn changed_fields(&self) -> Vec<ProfileField> {
        ProfileField::ALL
            .iter()
            .copied()
            .filter(|&f| self.saved.get(f) != self.draft.get(f))
            .collect()
    }

    /// Enter editing, or leave it by submitting. Returns the update to send,
    /// which only carries changed fields. With nothing changed editing ends
    /// right away and nothing is sent.
    pub fn toggle(&mut self) -> Option<UpdateUserDataRequest> {
        if !self.editing {
            self.editing = true;
            return None;
        }

        let changed = self.changed_fields();
        if changed.is_empty() {
            self.editing = false;
            return None;
        }

        let mut req = UpdateUserDataRequest {
            uid: self.uid.clone(),
            ..Default::default()
        };
        for &field in &changed {
            let value = Some(self.draft.get(field).to_owned());
            match field {
                ProfileField::Username => req.username = value,
                ProfileField::Email => req.email = value,
                ProfileField::Name => req.name = value,
                ProfileField::School => req.school = value,
            }
        }
        self.submitted = changed;
        Some(req)
    }

    /// Apply the backend's per-field answer. Returns whether editing ended.
    pub fn apply_update(&mut self, res: &UpdateUserDataResponse) -> bool {
        let mut all_ok = true;
        for field in ProfileField::ALL {
            let status = response_status(res, field)
                .map(FieldStatus::parse)
                .unwrap_or(FieldStatus::NotUpdated);
            if status.has_issue() {
                tracing::warn!("{} was not updated: {:?}", field.label(), status);
                all_ok = false;
                let old = self.saved.get(field).to_owned();
                self.draft.set(field, old);
            } else if status == FieldStatus::Success {
                let new = self.draft.get(field).to_owned();
                self.saved.set(field, new);
            }
            self.statuses[field.index()] = status;
        }

        self.submitted.clear();
        if all_ok {
            self.editing = false;
        }
        !self.editing
    }

    /// The update request itself failed. Every submitted field is reverted
    /// and marked for retry; editing stays open.
    pub fn apply_update_failure(&mut self, err: &dyn std::fmt::Display) {
        tracing::warn!("Profile update failed: {}", err);
        for field in std::mem::take(&mut self.submitted) {
            let old = self.saved.get(field).to_owned();
            self.draft.set(field, old);
            self.statuses[field.index()] = FieldStatus::Rejected(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor() -> ProfileEditor {
        ProfileEditor::new(
            "u1",
            &UserDataResponse {
                username: "ada".into(),
                email: "ada@example.org".into(),
                name: "Ada".into(),
                school: "UCF".into(),
                problems_attempted: 3,
                ..Default::default()
            },
        )
    }

    #[test]
    fn rejected_field_reverts_and_editing_stays_open() {
        let mut ed = editor();
        assert_eq!(ed.toggle(), None);
        ed.set_field(ProfileField::Username, "grace");
        ed.set_field(ProfileField::Email, "grace@example.org");

        let req = ed.toggle().unwrap();
        assert_eq!(req.username.as_deref(), Some("grace"));
        assert_eq!(req.email.as_deref(), Some("grace@example.org"));
        assert_eq!(req.name, None);

        let ended = ed.apply_update(&UpdateUserDataResponse {
            username: Some("taken".into()),
            email: Some("Success".into()),
            ..Default::default()
        });
        assert!(!ended);
        assert!(ed.is_editing());
        assert_eq!(ed.draft().username, "ada");
        assert_eq!(ed.draft().email, "grace@example.org");
        assert_eq!(ed.saved().email, "grace@example.org");
        assert_eq!(
            ed.field_message(ProfileField::Username).as_deref(),
            Some("Try Again: taken")
        );
        assert_eq!(ed.field_message(ProfileField::Email), None);
    }

    #[test]
    fn all_success_ends_editing() {
        let mut ed = editor();
        ed.toggle();
        ed.set_field(ProfileField::School, "MIT");
        ed.toggle().unwrap();
        assert!(ed.apply_update(&UpdateUserDataResponse {
            school: Some("Success".into()),
            username: Some("Not Updated".into()),
            ..Default::default()
        }));
        assert_eq!(ed.saved().school, "MIT");
    }

    #[test]
    fn nothing_changed_sends_nothing() {
        let mut ed = editor();
        ed.toggle();
        ed.set_field(ProfileField::Name, "Ada");
        assert_eq!(ed.toggle(), None);
        assert!(!ed.is_editing());
    }

    #[test]
    fn network_failure_reverts_submitted_fields() {
        let mut ed = editor();
        ed.toggle();
        ed.set_field(ProfileField::Name, "Lovelace");
        ed.toggle().unwrap();
        ed.apply_update_failure(&"connection refused");
        assert!(ed.is_editing());
        assert_eq!(ed.draft().name, "Ada");
        assert!(ed.status(ProfileField::Name).has_issue());
        assert!(!ed.status(ProfileField::Email).has_issue());
    }

    #[test]
    fn edits_outside_editing_are_ignored() {
        let mut ed = editor();
        ed.set_field(ProfileField::Username, "nope");
        assert_eq!(ed.draft().username, "ada");
        assert_eq!(ed.counters().attempted, 3);
    }
}

//! Test case folder ingestion.
//!
//! A dropped folder holds files named `<base>.in` and `<base>.out`. Files are
//! paired by base name into *slots*, assigned in the order base names are
//! first seen, so that `inputs[slot]` and `outputs[slot]` belong to the same
//! test case. Contents are base64-encoded for submission.

mod folder;

pub use self::folder::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const INPUT_EXTENSION: &str = "in";
pub const OUTPUT_EXTENSION: &str = "out";

/// A single file of a dropped folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseFile {
    /// File name including extension, without any directory part.
    pub name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFileKind {
    Input,
    Output,
    Other,
}

impl TestCaseFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> TestCaseFile {
        TestCaseFile {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Everything before the first `.`, so `a.b.in` belongs to `a`.
    pub fn base_name(&self) -> &str {
        self.name.split('.').next().unwrap_or_default()
    }

    /// Everything after the last `.`; a name without dots is its own
    /// extension.
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or_default()
    }

    pub fn kind(&self) -> CaseFileKind {
        match self.extension() {
            INPUT_EXTENSION => CaseFileKind::Input,
            OUTPUT_EXTENSION => CaseFileKind::Output,
            _ => CaseFileKind::Other,
        }
    }
}

/// Maps base file names to slots in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct CaseIndex {
    slots: HashMap<String, usize>,
    names: Vec<String>,
}

impl CaseIndex {
    pub fn new() -> CaseIndex {
        Self::default()
    }

    /// Returns the slot of `base_name`, assigning the next free one if the
    /// name has not been seen before.
    pub fn slot_for(&mut self, base_name: &str) -> usize {
        if let Some(&slot) = self.slots.get(base_name) {
            return slot;
        }
        let slot = self.names.len();
        self.slots.insert(base_name.to_owned(), slot);
        self.names.push(base_name.to_owned());
        slot
    }

    pub fn get(&self, base_name: &str) -> Option<usize> {
        self.slots.get(base_name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// Slot-aligned inputs and outputs of one ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestedCaseSet {
    /// Base64 content of `<name>.in` per slot.
    pub inputs: Vec<Option<String>>,
    /// Base64 content of `<name>.out` per slot.
    pub outputs: Vec<Option<String>>,
    /// Base name of each slot.
    pub names: Vec<String>,
    /// Files that were accepted but are neither `.in` nor `.out`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    /// Files whose slot already held an input (or output) from an earlier
    /// file of the same name, e.g. `sub/1.in` after `1.in`. The earlier file
    /// is kept.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<String>,
}

impl IngestedCaseSet {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Slots missing either their input or their output.
    pub fn incomplete_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(move |&i| self.inputs[i].is_none() || self.outputs[i].is_none())
    }
}

/// Pair `files` into slots. Slots are assigned over every file in order,
/// including files whose extension is later ignored. When two files map to
/// the same input or output, the first one wins.
pub fn ingest(files: &[TestCaseFile]) -> IngestedCaseSet {
    let mut index = CaseIndex::new();
    for file in files {
        index.slot_for(file.base_name());
    }

    let mut inputs = vec![None; index.len()];
    let mut outputs = vec![None; index.len()];
    let mut ignored = vec![];
    let mut duplicates = vec![];

    for file in files {
        let slot = match index.get(file.base_name()) {
            Some(slot) => slot,
            None => continue,
        };
        let target = match file.kind() {
            CaseFileKind::Input => &mut inputs[slot],
            CaseFileKind::Output => &mut outputs[slot],
            CaseFileKind::Other => {
                ignored.push(file.name.clone());
                continue;
            }
        };
        if target.is_some() {
            duplicates.push(file.name.clone());
            continue;
        }
        *target = Some(STANDARD.encode(&file.content));
    }

    if !ignored.is_empty() {
        tracing::warn!(
            "Ignored {} file(s) that are neither .{} nor .{}: {:?}",
            ignored.len(),
            INPUT_EXTENSION,
            OUTPUT_EXTENSION,
            ignored
        );
    }

    if !duplicates.is_empty() {
        tracing::warn!(
            "Dropped {} file(s) whose test case was already filled by an earlier file: {:?}",
            duplicates.len(),
            duplicates
        );
    }

    IngestedCaseSet {
        inputs,
        outputs,
        names: index.into_names(),
        ignored,
        duplicates,
    }
}

/// Receiver of an ingestion result, implemented by whatever owns the
/// submission being assembled.
pub trait CaseSetSink {
    fn set_inputs(&mut self, inputs: Vec<Option<String>>);
    fn set_outputs(&mut self, outputs: Vec<Option<String>>);
}

/// State of the submit page: the test cases that will go out with the next
/// run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitDraft {
    pub inputs: Vec<Option<String>>,
    pub outputs: Vec<Option<String>>,
}

impl CaseSetSink for SubmitDraft {
    fn set_inputs(&mut self, inputs: Vec<Option<String>>) {
        self.inputs = inputs;
    }

    fn set_outputs(&mut self, outputs: Vec<Option<String>>) {
        self.outputs = outputs;
    }
}

impl SubmitDraft {
    /// Number of test cases that have both an input and an output.
    pub fn complete_cases(&self) -> usize {
        self.inputs
            .iter()
            .zip(self.outputs.iter())
            .filter(|(i, o)| i.is_some() && o.is_some())
            .count()
    }
}

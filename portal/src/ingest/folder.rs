use super::{ingest, CaseSetSink, IngestedCaseSet, TestCaseFile};
use crate::{
    config::IngestConfig,
    fs::{self, FolderEntry},
};
use err_derive::Error;
use std::path::Path;
use tracing_futures::Instrument;

pub const REJECTED_WARNING: &str = "Uploaded wrong folder type!";
pub const TOO_LARGE_WARNING: &str = "Uploaded file is too large!";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(display = "IO error: {}", _0)]
    Io(#[error(source)] std::io::Error),
}

/// Why a dropped file was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Extension(String),
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub name: String,
    pub reason: RejectReason,
}

/// Decides which files of a drop are accepted.
#[derive(Debug, Clone)]
pub struct DropFilter {
    max_file_size: u64,
    reject_extensions: Vec<String>,
}

impl DropFilter {
    pub fn new(cfg: &IngestConfig) -> DropFilter {
        DropFilter {
            max_file_size: cfg.max_file_size,
            reject_extensions: cfg
                .reject_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn check(&self, name: &str, size: u64) -> Result<(), RejectReason> {
        if let Some((_, ext)) = name.rsplit_once('.') {
            let ext = ext.to_ascii_lowercase();
            if self.reject_extensions.contains(&ext) {
                return Err(RejectReason::Extension(ext));
            }
        }
        if size > self.max_file_size {
            return Err(RejectReason::TooLarge {
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Split folder entries into accepted ones and rejected files.
    pub fn partition(&self, entries: Vec<FolderEntry>) -> (Vec<FolderEntry>, Vec<RejectedFile>) {
        let mut accepted = vec![];
        let mut rejected = vec![];
        for entry in entries {
            match self.check(&entry.name, entry.size) {
                Ok(()) => accepted.push(entry),
                Err(reason) => rejected.push(RejectedFile {
                    name: entry.name,
                    reason,
                }),
            }
        }
        (accepted, rejected)
    }
}

impl Default for DropFilter {
    fn default() -> Self {
        DropFilter::new(&IngestConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropState {
    /// No folder has been dropped yet.
    Empty,
    /// A folder was dropped and ingested.
    Loaded {
        cases: usize,
        accepted: usize,
        rejected: Vec<RejectedFile>,
        ignored: Vec<String>,
        duplicates: Vec<String>,
    },
}

/// The folder drop area of the submit page.
///
/// Every drop replaces the previous one; there is no way back to
/// [`DropState::Empty`]. The result goes to the [`CaseSetSink`] passed in and
/// is not kept here.
#[derive(Debug, Clone)]
pub struct FolderDrop {
    filter: DropFilter,
    state: DropState,
    warning: Option<&'static str>,
}

impl FolderDrop {
    pub fn new(filter: DropFilter) -> FolderDrop {
        FolderDrop {
            filter,
            state: DropState::Empty,
            warning: None,
        }
    }

    pub fn state(&self) -> &DropState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, DropState::Loaded { .. })
    }

    /// Whether the last drop contained rejected files.
    pub fn has_rejected(&self) -> bool {
        self.warning.is_some()
    }

    /// [`REJECTED_WARNING`] if the last drop had a file of a wrong type,
    /// [`TOO_LARGE_WARNING`] if it only had oversized files.
    pub fn warning(&self) -> Option<&'static str> {
        self.warning
    }

    /// Handle a drop of already-read files.
    pub fn on_drop(
        &mut self,
        accepted: Vec<TestCaseFile>,
        rejected: Vec<RejectedFile>,
        sink: &mut impl CaseSetSink,
    ) -> IngestedCaseSet {
        self.warning = if rejected.is_empty() {
            None
        } else if rejected
            .iter()
            .any(|r| matches!(r.reason, RejectReason::Extension(_)))
        {
            Some(REJECTED_WARNING)
        } else {
            Some(TOO_LARGE_WARNING)
        };
        if !rejected.is_empty() {
            tracing::warn!("{} file(s) rejected: {:?}", rejected.len(), rejected);
        }

        let set = ingest(&accepted);
        tracing::info!(
            "Ingested {} file(s) into {} test case(s)",
            accepted.len(),
            set.len()
        );

        sink.set_inputs(set.inputs.clone());
        sink.set_outputs(set.outputs.clone());

        self.state = DropState::Loaded {
            cases: set.len(),
            accepted: accepted.len(),
            rejected,
            ignored: set.ignored.clone(),
            duplicates: set.duplicates.clone(),
        };
        set
    }

    /// Handle a dropped directory: list it, then go on as
    /// [`drop_entries`](Self::drop_entries).
    pub async fn drop_folder(
        &mut self,
        dir: &Path,
        sink: &mut impl CaseSetSink,
    ) -> Result<IngestedCaseSet, IngestError> {
        let span = tracing::info_span!("drop_folder", dir = %dir.display());
        let entries = fs::list_folder(dir).instrument(span.clone()).await?;
        self.drop_entries(entries, sink).instrument(span).await
    }

    /// Filter listed files, read every accepted one and only then ingest. A
    /// failed read leaves both this component and `sink` untouched.
    pub async fn drop_entries(
        &mut self,
        entries: Vec<FolderEntry>,
        sink: &mut impl CaseSetSink,
    ) -> Result<IngestedCaseSet, IngestError> {
        let (accepted, rejected) = self.filter.partition(entries);
        let accepted = fs::read_entries(accepted).await?;
        Ok(self.on_drop(accepted, rejected, sink))
    }
}

impl Default for FolderDrop {
    fn default() -> Self {
        FolderDrop::new(DropFilter::default())
    }
}

//! File-system-related stuff: listing a dropped folder and reading its files.

use crate::ingest::TestCaseFile;
use futures::{StreamExt, TryStreamExt};
use ignore::WalkBuilder;
use std::{
    io,
    path::{Path, PathBuf},
};

/// Maximum number of files read at the same time.
const READ_CONCURRENCY: usize = 16;

/// A regular file found under a dropped folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub path: PathBuf,
    /// File name without its directory part.
    pub name: String,
    pub size: u64,
}

/// List every regular file under `root`, recursively, in file name order.
/// Hidden files and directories are skipped; ignore files are not honored.
pub async fn list_folder(root: &Path) -> io::Result<Vec<FolderEntry>> {
    let root = root.to_owned();
    tokio::task::spawn_blocking(move || walk_folder(&root))
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}

fn walk_folder(root: &Path) -> io::Result<Vec<FolderEntry>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        ));
    }

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut entries = vec![];
    for entry in walker {
        let entry = entry.map_err(into_io_error)?;
        if !entry.file_type().map_or(false, |t| t.is_file()) {
            continue;
        }
        let size = entry.metadata().map_err(into_io_error)?.len();
        entries.push(FolderEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
            size,
        });
    }
    Ok(entries)
}

fn into_io_error(e: ignore::Error) -> io::Error {
    let msg = e.to_string();
    e.into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, msg))
}

/// Read all `entries`. Resolves only after every read has finished, keeping
/// the order of `entries`; the first failure fails the whole batch.
pub async fn read_entries(entries: Vec<FolderEntry>) -> io::Result<Vec<TestCaseFile>> {
    futures::stream::iter(entries)
        .map(|entry| async move {
            let content = tokio::fs::read(&entry.path).await?;
            tracing::trace!("Read {} bytes from {}", content.len(), entry.path.display());
            Ok::<_, io::Error>(TestCaseFile {
                name: entry.name,
                content,
            })
        })
        .buffered(READ_CONCURRENCY)
        .try_collect()
        .await
}

//! Tests to verify that dropping real folders through
//! [`crate::ingest::FolderDrop`] behaves correctly.

use crate::{
    fs,
    ingest::{DropFilter, DropState, FolderDrop, RejectReason, SubmitDraft},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pretty_assertions::assert_eq;
use std::path::Path;
use test_env_log::test;

async fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.unwrap();
        }
        tokio::fs::write(path, content).await.unwrap();
    }
}

#[test(tokio::test)]
async fn folder_pairs_files_into_slots() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        &[
            ("a.in", "1 2"),
            ("a.out", "3"),
            ("b.in", "4 5"),
            ("c.out", "6"),
            ("sub/d.in", "7"),
            (".hidden.in", "secret"),
        ],
    )
    .await;

    let mut area = FolderDrop::default();
    let mut draft = SubmitDraft::default();
    let set = area.drop_folder(dir.path(), &mut draft).await.unwrap();

    assert_eq!(set.names, vec!["a", "b", "c", "d"]);
    assert_eq!(set.outputs[1], None);
    assert_eq!(set.inputs[2], None);
    assert_eq!(set.inputs[0], Some(STANDARD.encode("1 2")));
    assert_eq!(draft.inputs, set.inputs);
    assert_eq!(draft.outputs, set.outputs);
    assert_eq!(draft.complete_cases(), 1);
    assert!(!area.has_rejected());
}

#[test(tokio::test)]
async fn rejected_files_warn_until_next_clean_drop() {
    let bad = tempfile::tempdir().unwrap();
    write_files(bad.path(), &[("1.in", "x"), ("cases.zip", "PK")]).await;
    let good = tempfile::tempdir().unwrap();
    write_files(good.path(), &[("1.in", "x"), ("1.out", "y")]).await;

    let mut area = FolderDrop::new(DropFilter::default());
    let mut draft = SubmitDraft::default();

    area.drop_folder(bad.path(), &mut draft).await.unwrap();
    assert!(area.warning().is_some());
    match area.state() {
        DropState::Loaded {
            rejected, accepted, ..
        } => {
            assert_eq!(*accepted, 1);
            assert_eq!(rejected[0].reason, RejectReason::Extension("zip".into()));
        }
        DropState::Empty => panic!("drop did not load"),
    }

    area.drop_folder(good.path(), &mut draft).await.unwrap();
    assert_eq!(area.warning(), None);
    assert_eq!(draft.complete_cases(), 1);
}

#[test(tokio::test)]
async fn missing_folder_publishes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut area = FolderDrop::default();
    let mut draft = SubmitDraft {
        inputs: vec![Some("kept".into())],
        outputs: vec![None],
    };

    let res = area.drop_folder(&dir.path().join("nope"), &mut draft).await;
    assert!(res.is_err());
    assert_eq!(area.state(), &DropState::Empty);
    assert_eq!(draft.inputs, vec![Some("kept".to_owned())]);
}

#[test(tokio::test)]
async fn nested_file_with_same_name_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        &[
            ("1.in", "top"),
            ("1.out", "TOP"),
            ("sub/1.in", "nested"),
            ("sub/1.out", "NESTED"),
        ],
    )
    .await;

    let mut area = FolderDrop::default();
    let mut draft = SubmitDraft::default();
    let set = area.drop_folder(dir.path(), &mut draft).await.unwrap();

    assert_eq!(set.names, vec!["1"]);
    assert_eq!(set.inputs, vec![Some(STANDARD.encode("top"))]);
    assert_eq!(set.outputs, vec![Some(STANDARD.encode("TOP"))]);
    assert_eq!(set.duplicates, vec!["1.in", "1.out"]);
    match area.state() {
        DropState::Loaded { duplicates, .. } => assert_eq!(duplicates.len(), 2),
        DropState::Empty => panic!("drop did not load"),
    }
}

#[test(tokio::test)]
async fn failed_read_keeps_previous_drop() {
    let first = tempfile::tempdir().unwrap();
    write_files(first.path(), &[("1.in", "x"), ("1.out", "y")]).await;
    let second = tempfile::tempdir().unwrap();
    write_files(second.path(), &[("2.in", "a"), ("2.out", "b")]).await;

    let mut area = FolderDrop::default();
    let mut draft = SubmitDraft::default();
    area.drop_folder(first.path(), &mut draft).await.unwrap();
    let state_before = area.state().clone();
    let draft_before = draft.clone();

    // the file disappears between listing and reading
    let entries = fs::list_folder(second.path()).await.unwrap();
    assert_eq!(entries.len(), 2);
    tokio::fs::remove_file(second.path().join("2.out"))
        .await
        .unwrap();

    assert!(fs::read_entries(entries.clone()).await.is_err());
    assert!(area.drop_entries(entries, &mut draft).await.is_err());
    assert_eq!(area.state(), &state_before);
    assert_eq!(draft, draft_before);
}

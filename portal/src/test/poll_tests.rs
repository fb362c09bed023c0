//! Tests to verify that [`crate::verdict::VerdictPoller`] schedules requests and
//! publishes snapshots correctly. All of them run on a paused clock.

use super::util::{poller, verdict_response, MockVerdictSource, Reply};
use crate::verdict::{CaseStatus, PollState, VerdictCode};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn shown_verdict(state: &PollState) -> Option<VerdictCode> {
    state.snapshot().map(|s| s.overall_verdict)
}

#[tokio::test(start_paused = true)]
async fn requests_on_activation_then_every_interval() {
    let source = MockVerdictSource::always(verdict_response(2, vec![3, 1]));
    let start = Instant::now();
    let handle = poller(&source).activate();

    sleep_until(start + ms(100)).await;
    assert_eq!(source.calls(), 1);
    sleep_until(start + ms(5_500)).await;
    assert_eq!(source.calls(), 2);
    sleep_until(start + ms(10_500)).await;
    assert_eq!(source.calls(), 3);

    handle.deactivate().await;
    sleep(Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_polling() {
    let source = MockVerdictSource::always(verdict_response(2, vec![1]));
    let handle = poller(&source).activate();
    sleep(ms(100)).await;
    drop(handle);
    sleep(Duration::from_secs(20)).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn loading_until_first_success() {
    let source = MockVerdictSource::new(|n| match n {
        0 => Reply::fail(),
        _ => Reply::ok(verdict_response(3, vec![3, 3, 5, 1])),
    });
    let start = Instant::now();
    let handle = poller(&source).activate();

    sleep_until(start + ms(100)).await;
    assert_eq!(handle.state(), PollState::Loading);

    sleep_until(start + ms(5_100)).await;
    let state = handle.state();
    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.problem_name, "Two Sum");
    assert_eq!(snapshot.cases_passed, "2 of 4");
    assert_eq!(
        snapshot.case_icons(),
        vec![
            CaseStatus::Correct,
            CaseStatus::Correct,
            CaseStatus::Failed,
            CaseStatus::Pending
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_previous_snapshot() {
    let source = MockVerdictSource::new(|n| match n {
        0 => Reply::ok(verdict_response(2, vec![1, 1])),
        1 => Reply::fail(),
        _ => Reply::ok(verdict_response(4, vec![3, 4])),
    });
    let start = Instant::now();
    let handle = poller(&source).activate();

    sleep_until(start + ms(100)).await;
    assert_eq!(shown_verdict(&handle.state()), Some(VerdictCode(2)));
    sleep_until(start + ms(5_100)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(shown_verdict(&handle.state()), Some(VerdictCode(2)));
    sleep_until(start + ms(10_100)).await;
    assert_eq!(shown_verdict(&handle.state()), Some(VerdictCode(4)));
}

#[tokio::test(start_paused = true)]
async fn late_response_does_not_overwrite_newer_one() {
    let source = MockVerdictSource::new(|n| match n {
        0 => Reply::ok(verdict_response(2, vec![1])).after(ms(8_000)),
        _ => Reply::ok(verdict_response(3, vec![3])),
    });
    let start = Instant::now();
    let handle = poller(&source).activate();

    sleep_until(start + ms(5_100)).await;
    assert_eq!(shown_verdict(&handle.state()), Some(VerdictCode(3)));
    // the first request resolves at 8s
    sleep_until(start + ms(8_100)).await;
    assert_eq!(shown_verdict(&handle.state()), Some(VerdictCode(3)));
}

#[tokio::test(start_paused = true)]
async fn unchanged_snapshot_is_not_republished() {
    let source = MockVerdictSource::always(verdict_response(2, vec![3, 1]));
    let start = Instant::now();
    let handle = poller(&source).activate();
    let mut rx = handle.subscribe();

    sleep_until(start + ms(100)).await;
    assert!(rx.has_changed().unwrap());
    let first = rx.borrow_and_update().clone();

    sleep_until(start + ms(10_100)).await;
    assert_eq!(source.calls(), 3);
    assert!(!rx.has_changed().unwrap());
    assert_eq!(*rx.borrow(), first);
}

#[tokio::test(start_paused = true)]
async fn in_flight_result_is_discarded_after_deactivation() {
    let source = MockVerdictSource::new(|_| Reply::ok(verdict_response(3, vec![3])).after(ms(3_000)));
    let handle = poller(&source).activate();
    let rx = handle.subscribe();

    sleep(ms(1_000)).await;
    handle.deactivate().await;
    sleep(ms(5_000)).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(*rx.borrow(), PollState::Loading);
}

#[tokio::test(start_paused = true)]
async fn keeps_polling_after_final_verdict_by_default() {
    let source = MockVerdictSource::always(verdict_response(3, vec![3, 3]));
    let start = Instant::now();
    let _handle = poller(&source).activate();

    sleep_until(start + ms(10_100)).await;
    assert_eq!(source.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn stops_once_settled_when_asked() {
    let source = MockVerdictSource::new(|n| match n {
        0 => Reply::ok(verdict_response(2, vec![3, 1])),
        _ => Reply::ok(verdict_response(4, vec![3, 4])),
    });
    let start = Instant::now();
    let mut handle = poller(&source).stop_on_settled(true).activate();

    sleep_until(start + ms(20_100)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(shown_verdict(&handle.state()), Some(VerdictCode(4)));

    // the poller is gone once the last change has been seen
    while handle.changed().await {}
}

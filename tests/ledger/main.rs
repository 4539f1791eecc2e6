//! Query side: the summary projection fed from the event store.

mod support;

use std::time::Duration;

use giftcard_ledger::projection::ProjectionWorker;
use giftcard_ledger::{
    CardSummary, CardSummaryFilter, CardSummaryProjection, FetchCardSummariesQuery,
    GiftCardCommand, GiftCardLedger, LedgerConfig,
};
use support::{count_prefix, ledger, wait_for_watermark};

fn fetch(ledger: &support::Ledger, prefix: &str) -> Vec<CardSummary> {
    ledger
        .fetch(&FetchCardSummariesQuery::new(
            0,
            100,
            CardSummaryFilter::starting_with(prefix),
        ))
        .unwrap()
}

#[test]
fn issued_redeemed_cancelled_summary() {
    let ledger = ledger();
    ledger.submit(GiftCardCommand::issue("X", 100)).unwrap();
    ledger.submit(GiftCardCommand::redeem("X", 30)).unwrap();
    ledger.submit(GiftCardCommand::cancel("X")).unwrap();
    ledger.catch_up().unwrap();

    assert_eq!(
        fetch(&ledger, ""),
        vec![CardSummary {
            id: "X".into(),
            initial_value: 100,
            remaining_value: 0,
        }]
    );
}

#[test]
fn count_changes_by_exactly_the_matching_delta() {
    let ledger = ledger();
    ledger.submit(GiftCardCommand::issue("AB-1", 5)).unwrap();
    ledger.catch_up().unwrap();
    let (before, mark_before) = count_prefix(&ledger, "AB");

    ledger.submit(GiftCardCommand::issue("AB-2", 5)).unwrap();
    ledger.submit(GiftCardCommand::issue("ZZ-1", 5)).unwrap();
    ledger.catch_up().unwrap();
    let (after, mark_after) = count_prefix(&ledger, "AB");

    assert_eq!(after, before + 1);
    assert!(mark_after > mark_before);
    assert_eq!(count_prefix(&ledger, "").0, 3);
}

#[test]
fn watermark_strictly_increases_with_each_event() {
    let ledger = ledger();
    let mut last = count_prefix(&ledger, "").1;
    assert_eq!(last, 0);

    for (i, command) in [
        GiftCardCommand::issue("A", 50),
        GiftCardCommand::redeem("A", 10),
        GiftCardCommand::issue("B", 7),
        GiftCardCommand::cancel("A"),
    ]
    .into_iter()
    .enumerate()
    {
        let global = ledger.submit(command).unwrap();
        assert_eq!(global, i as u64 + 1);
        ledger.catch_up().unwrap();

        let mark = count_prefix(&ledger, "").1;
        assert!(mark > last);
        assert_eq!(mark, global);
        last = mark;
    }
}

#[test]
fn prefix_filter_is_exact_and_ordered() {
    let ledger = ledger();
    for id in ["AC3", "B1", "AB2", "AB1", "ab9"] {
        ledger.submit(GiftCardCommand::issue(id, 1)).unwrap();
    }
    ledger.catch_up().unwrap();

    let ids: Vec<_> = fetch(&ledger, "AB").into_iter().map(|s| s.id).collect();
    assert_eq!(ids, ["AB1", "AB2"]);

    let ids: Vec<_> = fetch(&ledger, "A").into_iter().map(|s| s.id).collect();
    assert_eq!(ids, ["AB1", "AB2", "AC3"]);
}

#[test]
fn paging_walks_the_id_order() {
    let ledger = ledger();
    for id in ["c", "a", "e", "b", "d"] {
        ledger.submit(GiftCardCommand::issue(id, 1)).unwrap();
    }
    ledger.catch_up().unwrap();

    let page = |offset| {
        ledger
            .fetch(&FetchCardSummariesQuery::new(offset, 2, CardSummaryFilter::default()))
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(page(0), ["a", "b"]);
    assert_eq!(page(2), ["c", "d"]);
    assert_eq!(page(4), ["e"]);
    assert!(page(6).is_empty());
}

#[test]
fn replaying_the_whole_feed_changes_nothing() {
    let ledger = ledger();
    ledger.submit(GiftCardCommand::issue("X", 100)).unwrap();
    ledger.submit(GiftCardCommand::redeem("X", 30)).unwrap();
    ledger.catch_up().unwrap();
    let before = fetch(&ledger, "");

    let projection = CardSummaryProjection::new(ledger.projection().store().clone());
    let mut worker = ProjectionWorker::new(ledger.service().events().clone(), projection, 1)
        .unwrap()
        .from_position(0);
    assert_eq!(worker.catch_up().unwrap(), 2);
    assert_eq!(worker.stats().duplicates_skipped, 2);
    assert_eq!(worker.stats().events_applied, 0);

    assert_eq!(fetch(&ledger, ""), before);
    assert_eq!(count_prefix(&ledger, "").1, 2);
}

#[test]
fn background_worker_catches_up() {
    let ledger = ledger();
    let worker = ledger.spawn_projection_worker().unwrap();

    ledger.submit(GiftCardCommand::issue("W", 20)).unwrap();
    let last = ledger.submit(GiftCardCommand::redeem("W", 5)).unwrap();
    wait_for_watermark(&ledger, last, Duration::from_secs(5));

    assert_eq!(fetch(&ledger, "W")[0].remaining_value, 15);

    let stats = worker.stop();
    assert!(stats.fault.is_none());
    assert_eq!(stats.events_applied, 2);
}

#[test]
fn bulk_issue_lands_in_the_projection() {
    let config = LedgerConfig::from_toml("[bulk]\nid_length = 16\nreport_interval_ms = 5").unwrap();
    let ledger = GiftCardLedger::in_memory(config);

    let done = ledger.bulk_issue(20, 25, |_| {}).wait();
    assert_eq!(done.success + done.error, 20);
    ledger.catch_up().unwrap();

    let rows = fetch(&ledger, "");
    assert_eq!(rows.len(), done.success);
    assert!(rows.iter().all(|row| row.id.len() == 16 && row.remaining_value == 25));
}

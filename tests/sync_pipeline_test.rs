// End-to-end sync cycles against an in-memory store

use std::sync::Arc;

use event_feed_api::{
    error::{FetchError, SyncError},
    services::{sync::TickOutcome, EventStore, InMemoryEventStore},
};

use test_helpers::*;

const ALL: (&str, &str) = ("0000", "9999");

async fn snapshot(store: &InMemoryEventStore) -> Vec<event_feed_api::models::Event> {
    let mut events = store.query(ALL.0, ALL.1).await.unwrap();
    events.sort_by(|a, b| a.id.cmp(&b.id));
    events
}

#[tokio::test]
async fn same_payload_twice_is_idempotent() {
    let app = TestApp::new(feed_xml(&[
        FeedEvent::online("1", "A"),
        FeedEvent::online("2", "B"),
        FeedEvent::offline("3", "C"),
    ]));

    app.sync.run_cycle().await.unwrap();
    let once = snapshot(&app.store).await;

    app.sync.run_cycle().await.unwrap();
    let twice = snapshot(&app.store).await;

    assert_eq!(once.len(), 2);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn later_cycle_overwrites_same_id() {
    let app = TestApp::new(feed_xml(&[FeedEvent::online("E1", "A")]));
    app.sync.run_cycle().await.unwrap();

    app.feed.set(feed_xml(&[FeedEvent::online("E1", "B")]));
    app.sync.run_cycle().await.unwrap();

    let events = app.store.query("2024-01-01", "2024-01-31").await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "E1");
    assert_eq!(events[0].name, "B");
}

#[tokio::test]
async fn ids_missing_from_later_feed_are_retained() {
    let app = TestApp::new(feed_xml(&[
        FeedEvent::online("1", "A"),
        FeedEvent::online("2", "B"),
    ]));
    app.sync.run_cycle().await.unwrap();

    app.feed.set(feed_xml(&[FeedEvent::online("2", "B2")]));
    app.sync.run_cycle().await.unwrap();

    let events = snapshot(&app.store).await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, "A");
    assert_eq!(events[1].name, "B2");
}

#[tokio::test]
async fn event_going_offline_keeps_last_online_version() {
    let app = TestApp::new(feed_xml(&[FeedEvent::online("1", "A")]));
    app.sync.run_cycle().await.unwrap();

    app.feed.set(feed_xml(&[FeedEvent::offline("1", "A changed")]));
    let report = app.sync.run_cycle().await.unwrap();
    assert_eq!(report.skipped_offline, 1);

    let events = snapshot(&app.store).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "A");
}

#[tokio::test]
async fn one_malformed_record_among_nine_valid() {
    let ids: Vec<String> = (1..=9).map(|i| i.to_string()).collect();
    let mut xml: String = ids
        .iter()
        .map(|id| FeedEvent::online(id, "Show").to_xml())
        .collect();
    // No <name>
    xml.push_str("<event><id>10</id><start_date>2024-01-10</start_date><end_date>2024-01-12</end_date><sell_mode>online</sell_mode></event>");

    let app = TestApp::new(format!("<events>{}</events>", xml));
    let report = app.sync.run_cycle().await.unwrap();

    assert_eq!(report.fetched, 10);
    assert_eq!(report.stored, 9);
    assert_eq!(report.rejected, 1);
    assert_eq!(app.store.len().await.unwrap(), 9);
}

#[tokio::test]
async fn fetch_and_parse_failures_do_not_touch_store() {
    let app = TestApp::new(feed_xml(&[FeedEvent::online("1", "A")]));
    app.sync.run_cycle().await.unwrap();
    let before = snapshot(&app.store).await;

    app.feed.fail_with(502);
    let err = app.sync.run_cycle().await.unwrap_err();
    assert!(matches!(err, SyncError::Fetch(FetchError::Status(502))));

    app.feed.set("<events><event><id>1</id><name>Half");
    let err = app.sync.run_cycle().await.unwrap_err();
    assert!(matches!(err, SyncError::Parse(_)));

    assert_eq!(snapshot(&app.store).await, before);

    // Next good tick recovers
    app.feed.set(feed_xml(&[FeedEvent::online("1", "A2")]));
    assert!(matches!(app.sync.tick().await, TickOutcome::Completed(_)));
    assert_eq!(snapshot(&app.store).await[0].name, "A2");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_torn_records() {
    let store = Arc::new(InMemoryEventStore::new());
    store
        .upsert(online_event("E", "gen-000000", "2024-01-10T000000", "2024-01-12"))
        .await
        .unwrap();

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for n in 1..=2000u32 {
                let event = online_event(
                    "E",
                    &format!("gen-{:06}", n),
                    &format!("2024-01-10T{:06}", n),
                    "2024-01-12",
                );
                if n % 2 == 0 {
                    store.upsert(event).await.unwrap();
                } else {
                    store.upsert_many(vec![event]).await.unwrap();
                }
                tokio::task::yield_now().await;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..2000 {
                    let events = store.query("2024-01-01", "2024-01-31").await.unwrap();
                    assert_eq!(events.len(), 1);
                    let e = &events[0];
                    let generation = e.name.trim_start_matches("gen-");
                    assert!(
                        e.start_date.ends_with(generation),
                        "torn record: {:?}",
                        e
                    );
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
}

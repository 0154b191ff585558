use std::collections::HashSet;

use tokio::sync::broadcast::error::TryRecvError;

use plaza_feed::{FeedConfig, FeedError, NotificationHub, ReplaySummary, replay_lines};
use plaza_types::events::{FeedCommand, FeedUpdate};
use plaza_types::models::{NotificationKind, NotificationRecord, Timestamp};

fn record(id: &str, kind: NotificationKind) -> NotificationRecord {
    NotificationRecord {
        id: id.to_string(),
        title: format!("title {}", id),
        message: format!("message {}", id),
        kind,
        created_at: Timestamp::now(),
        read: false,
        payload: None,
    }
}

fn hub() -> NotificationHub {
    NotificationHub::new(&FeedConfig::default())
}

#[tokio::test]
async fn publishes_updates_in_mutation_order() {
    let hub = hub();
    let mut rx = hub.subscribe();

    assert!(hub.insert(record("a", NotificationKind::Mention)).await);
    assert!(hub.insert(record("b", NotificationKind::ReplyVote)).await);
    assert!(hub.mark_read("a").await);
    assert_eq!(hub.mark_all_read().await, 1);
    assert_eq!(hub.clear().await, 2);

    let expected = vec![
        FeedUpdate::Inserted { id: "a".into(), kind: NotificationKind::Mention },
        FeedUpdate::Inserted { id: "b".into(), kind: NotificationKind::ReplyVote },
        FeedUpdate::Read { id: "a".into() },
        FeedUpdate::AllRead { count: 1 },
        FeedUpdate::Cleared { count: 2 },
    ];
    for update in expected {
        assert_eq!(rx.recv().await.unwrap(), update);
    }
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn no_ops_publish_nothing() {
    let hub = hub();
    hub.insert(record("a", NotificationKind::Info)).await;
    let mut rx = hub.subscribe();

    assert!(!hub.insert(record("a", NotificationKind::PostVote)).await);
    assert!(!hub.mark_read("missing").await);
    hub.mark_read("a").await;
    assert!(!hub.mark_read("a").await);
    hub.mark_all_read().await;
    hub.clear().await;
    assert_eq!(hub.clear().await, 0);
    assert_eq!(hub.mark_all_read().await, 0);

    assert_eq!(rx.recv().await.unwrap(), FeedUpdate::Read { id: "a".into() });
    assert_eq!(rx.recv().await.unwrap(), FeedUpdate::Cleared { count: 1 });
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn snapshot_is_newest_first_and_first_write_wins() {
    let hub = hub();
    let mut first = record("dup", NotificationKind::PostReported);
    first.title = "original".into();
    let mut second = record("dup", NotificationKind::PostReported);
    second.title = "replacement".into();

    hub.insert(record("a", NotificationKind::Info)).await;
    hub.insert(first).await;
    hub.insert(record("c", NotificationKind::Info)).await;
    hub.insert(second).await;

    let feed = hub.snapshot().await;
    let ids: Vec<&str> = feed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "dup", "a"]);
    assert_eq!(feed[1].title, "original");
    assert_eq!(hub.unread_count().await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_keep_ids_unique() {
    let hub = hub();
    let mut rx = hub.subscribe();

    let mut tasks = Vec::new();
    for worker in 0..8 {
        let hub = hub.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..50 {
                // Every worker races on the same 50 ids
                let mut r = record(&format!("n{}", i), NotificationKind::ReplyCreated);
                r.title = format!("from worker {}", worker);
                hub.insert(r).await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let feed = hub.snapshot().await;
    assert_eq!(feed.len(), 50);
    let unique: HashSet<&str> = feed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(unique.len(), 50);

    let mut inserted = 0;
    while let Ok(update) = rx.try_recv() {
        assert!(matches!(update, FeedUpdate::Inserted { .. }));
        inserted += 1;
    }
    assert_eq!(inserted, 50);
}

#[tokio::test]
async fn applies_json_commands() {
    let hub = hub();

    let update = hub
        .apply_json(
            r#"{"type":"Insert","data":{"id":"j1","title":"Approved","message":"Your post is live","kind":"post_approved","createdAt":"2026-10-19T09:00:00Z","read":true}}"#,
        )
        .await
        .unwrap();
    assert_eq!(
        update,
        Some(FeedUpdate::Inserted { id: "j1".into(), kind: NotificationKind::PostApproved })
    );
    assert!(!hub.snapshot().await[0].read);

    let update = hub.apply_json(r#"{"type":"MarkRead","data":{"id":"j1"}}"#).await.unwrap();
    assert_eq!(update, Some(FeedUpdate::Read { id: "j1".into() }));

    let err = hub.apply_json(r#"{"type":"Insert","data":{"id":"j2"}}"#).await.unwrap_err();
    assert!(matches!(err, FeedError::Decode(_)));
    assert_eq!(hub.snapshot().await.len(), 1);
}

#[tokio::test]
async fn apply_clear_then_mark_read_is_harmless() {
    let hub = hub();
    hub.apply(FeedCommand::Insert(record("a", NotificationKind::ModerationDecisionOwner))).await;
    assert_eq!(hub.apply(FeedCommand::Clear).await, Some(FeedUpdate::Cleared { count: 1 }));
    assert_eq!(hub.apply(FeedCommand::MarkRead { id: "a".into() }).await, None);
    assert!(hub.snapshot().await.is_empty());
}

#[tokio::test]
async fn replays_lines_and_skips_malformed_ones() {
    let hub = hub();
    let input = concat!(
        r#"{"type":"Insert","data":{"id":"r1","title":"t","message":"m","kind":"post_vote","createdAt":"2026-10-19T08:00:00"}}"#,
        "\n\n",
        "this line is not json\n",
        r#"{"type":"Insert","data":{"id":"r2","title":"t","message":"m","kind":"mention","createdAt":"2026-10-19T10:05:00+02:00"}}"#,
        "\n",
        r#"{"type":"MarkRead","data":{"id":"r1"}}"#,
        "\n",
    );

    let summary = replay_lines(&hub, input.as_bytes()).await.unwrap();
    assert_eq!(summary, ReplaySummary { applied: 3, rejected: 1 });

    let feed = hub.snapshot().await;
    let ids: Vec<&str> = feed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r1"]);
    assert_eq!(feed[0].created_at.as_str(), "2026-10-19T10:05:00+02:00");
    assert!(feed[1].read);
}

#[tokio::test]
async fn replay_surfaces_unreadable_input() {
    let hub = hub();
    let input: &[u8] = b"\xff\xfe not utf-8\n";

    let err = replay_lines(&hub, input).await.unwrap_err();
    assert!(matches!(err, FeedError::Io(_)));
    assert!(hub.snapshot().await.is_empty());
}

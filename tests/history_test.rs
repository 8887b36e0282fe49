//! History store tests: download counting, deletion, listing and metrics.

mod common;

use std::time::Duration;

use common::*;
use deckgen::models::history::{self, HistoryError};
use deckgen::models::outline::{ContentDepth, DeckConfig, Style};

fn config(topic: &str) -> DeckConfig {
    DeckConfig::new(topic, 6).unwrap().with_depth(ContentDepth::Basic)
}

#[tokio::test]
async fn test_two_downloads_share_one_record() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let cfg = config("AI in Healthcare");

    let first = history::record_download(pool, &cfg, 6).await.unwrap();
    let second = history::record_download(pool, &cfg, 6).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.download_count, 2);
    assert!(second.downloaded);
    assert_eq!(second.actual_slides, 6);
    assert_eq!(history::list(pool).await.unwrap().len(), 1);
    assert_eq!(history::total_downloads(pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_topic_spelling_variants_share_one_record() {
    let db = setup_test_db().await;
    let pool = db.pool();

    history::record_download(pool, &config("AI in Healthcare"), 6).await.unwrap();
    let again = history::record_download(pool, &config("  ai   IN healthcare "), 6)
        .await
        .unwrap();

    assert_eq!(again.download_count, 2);
}

#[tokio::test]
async fn test_distinct_configurations_get_distinct_records() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let base = config("Rust at scale");

    let a = history::record_download(pool, &base, 6).await.unwrap();
    let b = history::record_download(pool, &base.clone().with_style(Style::PinkCreative), 6)
        .await
        .unwrap();
    let c = history::record_download(pool, &base.clone().with_images(true), 6)
        .await
        .unwrap();

    assert_ne!(a.id, b.id);
    assert_ne!(a.id, c.id);
    assert_eq!(history::list(pool).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_generate_then_download_updates_same_record() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let cfg = config("Quarterly review");

    let id = history::upsert_on_generate(pool, &cfg, 6).await.unwrap();
    let again = history::upsert_on_generate(pool, &cfg, 6).await.unwrap();
    assert_eq!(id, again);

    let pending = history::find_by_id(pool, id).await.unwrap().unwrap();
    assert!(!pending.downloaded);
    assert_eq!(pending.download_count, 0);

    let downloaded = history::record_download(pool, &cfg, 6).await.unwrap();
    assert_eq!(downloaded.id, id);
    assert_eq!(downloaded.download_count, 1);

    let by_id = history::record_download_by_id(pool, id).await.unwrap();
    assert_eq!(by_id.download_count, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_downloads_converge() {
    let db = setup_file_db().await;
    let pool = db.pool().clone();
    let cfg = config("Concurrency in practice");

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            let cfg = cfg.clone();
            tokio::spawn(async move { history::record_download(&pool, &cfg, 6).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let records = history::list(&pool).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].download_count, 8);
    assert_eq!(history::total_downloads(&pool).await.unwrap(), 8);
}

#[tokio::test]
async fn test_delete_missing_is_not_found_and_changes_nothing() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let record = history::record_download(pool, &config("Keep me"), 6).await.unwrap();

    let result = history::delete_one(pool, record.id + 100).await;
    assert!(matches!(result, Err(HistoryError::NotFound(id)) if id == record.id + 100));

    let records = history::list(pool).await.unwrap();
    assert_eq!(records, vec![record]);
}

#[tokio::test]
async fn test_delete_and_clear() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let a = history::record_download(pool, &config("First"), 6).await.unwrap();
    history::record_download(pool, &config("Second"), 6).await.unwrap();
    history::record_download(pool, &config("Third"), 6).await.unwrap();

    history::delete_one(pool, a.id).await.unwrap();
    assert!(history::find_by_id(pool, a.id).await.unwrap().is_none());
    assert_eq!(history::list(pool).await.unwrap().len(), 2);

    assert_eq!(history::clear_all(pool).await.unwrap(), 2);
    assert!(history::list(pool).await.unwrap().is_empty());
    assert_eq!(history::total_downloads(pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_is_most_recent_first() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let older = history::record_download(pool, &config("Older"), 6).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newer = history::record_download(pool, &config("Newer"), 6).await.unwrap();

    let ids: Vec<i64> = history::list(pool).await.unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    tokio::time::sleep(Duration::from_millis(5)).await;
    history::record_download(pool, &config("Older"), 6).await.unwrap();
    let ids: Vec<i64> = history::list(pool).await.unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![older.id, newer.id]);
}

#[tokio::test]
async fn test_metrics() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let empty = history::metrics(pool).await.unwrap();
    assert_eq!(empty.total_downloads, 0);
    assert_eq!(empty.total_presentations, 0);
    assert!(empty.content_depth_distribution.is_empty());

    let basic = config("Basics");
    history::record_download(pool, &basic, 6).await.unwrap();
    history::record_download(pool, &basic, 6).await.unwrap();
    history::record_download(pool, &config("More").with_depth(ContentDepth::Comprehensive), 6)
        .await
        .unwrap();
    history::upsert_on_generate(pool, &config("Preview only"), 6).await.unwrap();

    let metrics = history::metrics(pool).await.unwrap();
    assert_eq!(metrics.total_downloads, 3);
    assert_eq!(metrics.total_presentations, 3);
    assert_eq!(metrics.downloaded_presentations, 2);
    assert_eq!(metrics.content_depth_distribution.get("basic"), Some(&2));
    assert_eq!(metrics.content_depth_distribution.get("comprehensive"), Some(&1));
    assert_eq!(metrics.content_depth_distribution.get("detailed"), None);
}

use sqlx::SqlitePool;

use super::fingerprint::fingerprint;
use super::types::*;
use crate::models::outline::DeckConfig;

const RECORD_COLUMNS: &str = "id, topic, style, content_depth, background_color, include_images, \
     requested_slides, actual_slides, created_at, updated_at, downloaded, download_count";

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Record a generated (not yet downloaded) configuration. An existing record
/// with the same fingerprint only has its timestamp and slide count refreshed.
pub async fn upsert_on_generate(
    pool: &SqlitePool,
    config: &DeckConfig,
    actual_slides: usize,
) -> Result<i64, HistoryError> {
    let ts = now();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO presentations \
             (fingerprint, topic, style, content_depth, background_color, include_images, \
              requested_slides, actual_slides, created_at, updated_at, downloaded, download_count) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0) \
         ON CONFLICT(fingerprint) DO UPDATE SET \
             actual_slides = excluded.actual_slides, \
             updated_at = excluded.updated_at \
         RETURNING id",
    )
    .bind(fingerprint(config))
    .bind(&config.topic)
    .bind(config.style.as_str())
    .bind(config.content_depth.as_str())
    .bind(config.background_color.to_hex())
    .bind(config.include_images)
    .bind(config.slide_count as i64)
    .bind(actual_slides as i64)
    .bind(&ts)
    .bind(&ts)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Count one download of a configuration. Concurrent callers with the same
/// fingerprint converge on a single row through the unique index.
pub async fn record_download(
    pool: &SqlitePool,
    config: &DeckConfig,
    actual_slides: usize,
) -> Result<PresentationRecord, HistoryError> {
    let ts = now();
    let sql = format!(
        "INSERT INTO presentations \
             (fingerprint, topic, style, content_depth, background_color, include_images, \
              requested_slides, actual_slides, created_at, updated_at, downloaded, download_count) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 1) \
         ON CONFLICT(fingerprint) DO UPDATE SET \
             download_count = presentations.download_count + 1, \
             downloaded = 1, \
             actual_slides = excluded.actual_slides, \
             updated_at = excluded.updated_at \
         RETURNING {RECORD_COLUMNS}"
    );
    let record = sqlx::query_as::<_, PresentationRecord>(&sql)
        .bind(fingerprint(config))
        .bind(&config.topic)
        .bind(config.style.as_str())
        .bind(config.content_depth.as_str())
        .bind(config.background_color.to_hex())
        .bind(config.include_images)
        .bind(config.slide_count as i64)
        .bind(actual_slides as i64)
        .bind(&ts)
        .bind(&ts)
        .fetch_one(pool)
        .await?;

    log::info!(
        "Recorded download of presentation {} (count={})",
        record.id,
        record.download_count
    );
    Ok(record)
}

/// Count one download of an existing record.
pub async fn record_download_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<PresentationRecord, HistoryError> {
    let sql = format!(
        "UPDATE presentations \
         SET download_count = download_count + 1, downloaded = 1, updated_at = ? \
         WHERE id = ? \
         RETURNING {RECORD_COLUMNS}"
    );
    sqlx::query_as::<_, PresentationRecord>(&sql)
        .bind(now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(HistoryError::NotFound(id))
}

pub async fn find_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<PresentationRecord>, HistoryError> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM presentations WHERE id = ?");
    let record = sqlx::query_as::<_, PresentationRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// All records, most recently touched first.
pub async fn list(pool: &SqlitePool) -> Result<Vec<PresentationRecord>, HistoryError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM presentations ORDER BY updated_at DESC, id DESC"
    );
    let records = sqlx::query_as::<_, PresentationRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

pub async fn delete_one(pool: &SqlitePool, id: i64) -> Result<(), HistoryError> {
    let result = sqlx::query("DELETE FROM presentations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(HistoryError::NotFound(id));
    }
    log::info!("Deleted presentation {id}");
    Ok(())
}

/// Remove every record. Returns how many were deleted.
pub async fn clear_all(pool: &SqlitePool) -> Result<u64, HistoryError> {
    let result = sqlx::query("DELETE FROM presentations").execute(pool).await?;
    log::info!("Cleared {} presentation records", result.rows_affected());
    Ok(result.rows_affected())
}

/// Aggregate counters, read inside one transaction so they agree.
pub async fn metrics(pool: &SqlitePool) -> Result<MetricsSnapshot, HistoryError> {
    let mut tx = pool.begin().await?;

    let (total_downloads, total_presentations, downloaded_presentations) =
        sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COALESCE(SUM(download_count), 0), \
                    COUNT(*), \
                    COALESCE(SUM(CASE WHEN downloaded THEN 1 ELSE 0 END), 0) \
             FROM presentations",
        )
        .fetch_one(&mut *tx)
        .await?;

    let distribution = sqlx::query_as::<_, (String, i64)>(
        "SELECT content_depth, COUNT(*) FROM presentations GROUP BY content_depth",
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(MetricsSnapshot {
        total_downloads,
        total_presentations,
        downloaded_presentations,
        content_depth_distribution: distribution.into_iter().collect(),
    })
}

/// Sum of download counts; shown alongside the history list.
pub async fn total_downloads(pool: &SqlitePool) -> Result<i64, HistoryError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(download_count), 0) FROM presentations",
    )
    .fetch_one(pool)
    .await?;
    Ok(total)
}

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("presentation {0} not found")]
    NotFound(i64),
    #[error("history store error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PresentationRecord {
    pub id: i64,
    pub topic: String,
    pub style: String,
    pub content_depth: String,
    pub background_color: String,
    pub include_images: bool,
    pub requested_slides: i64,
    pub actual_slides: i64,
    pub created_at: String,
    pub updated_at: String,
    pub downloaded: bool,
    pub download_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_downloads: i64,
    pub total_presentations: i64,
    pub downloaded_presentations: i64,
    /// Depth key to number of records generated at that depth.
    pub content_depth_distribution: BTreeMap<String, i64>,
}

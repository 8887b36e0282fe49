//! Shared test infrastructure for history, pipeline and API tests.
//!
//! - `setup_test_db()` - in-memory SQLite with the schema applied
//! - `setup_file_db()` - temp-file SQLite behind the production pool settings
//! - Scripted text and image services standing in for the remote APIs

#![allow(dead_code)]

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use deckgen::db::MIGRATIONS;
use deckgen::deck::DeckAssembler;
use deckgen::generation::{GenerationError, OutlineRequester, TextService};
use deckgen::images::{ImageEnricher, ImageFetchError, ImageService};
use deckgen::pipeline::DeckPipeline;

// ============================================================================
// DATABASE SETUP
// ============================================================================

pub struct TestDb {
    pool: SqlitePool,
    // Keeps a file-backed database alive for the life of the test
    _dir: Option<tempfile::TempDir>,
}

impl TestDb {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// In-memory database with the schema applied.
///
/// A single connection that never expires, so every query sees the same
/// in-memory database.
pub async fn setup_test_db() -> TestDb {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb { pool, _dir: None }
}

/// File-backed database opened through `db::init_pool`, so several
/// connections write to it concurrently.
pub async fn setup_file_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("history.db").display());
    let pool = deckgen::db::init_pool(&url)
        .await
        .expect("Failed to open file database");
    deckgen::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb {
        pool,
        _dir: Some(dir),
    }
}

// ============================================================================
// FAKE COLLABORATORS
// ============================================================================

/// A 1x1 PNG.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Always answers with the same text and counts calls.
pub struct ScriptedTextService {
    response: String,
    calls: AtomicUsize,
}

impl ScriptedTextService {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextService for ScriptedTextService {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Every call fails as if the remote service were down.
pub struct FailingTextService;

#[async_trait]
impl TextService for FailingTextService {
    fn model(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Http {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

/// Returns `PNG_BYTES` unless the prompt mentions one of `fail_on`.
pub struct FakeImageService {
    fail_on: Vec<String>,
    calls: AtomicUsize,
}

impl FakeImageService {
    pub fn new() -> Self {
        Self::failing_on(&[])
    }

    pub fn failing_on(markers: &[&str]) -> Self {
        Self {
            fail_on: markers.iter().map(|m| m.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageService for FakeImageService {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.iter().any(|marker| prompt.contains(marker.as_str())) {
            return Err(ImageFetchError::Status(400));
        }
        Ok(PNG_BYTES.to_vec())
    }
}

pub fn test_pipeline(
    text: Arc<dyn TextService>,
    images: Arc<dyn ImageService>,
    image_dir: &Path,
) -> DeckPipeline {
    DeckPipeline::new(
        OutlineRequester::new(text, Duration::from_secs(5)),
        ImageEnricher::new(images, image_dir, Duration::from_secs(5), 2)
            .with_retry_backoff(Duration::from_millis(1)),
        DeckAssembler::new(),
    )
}

// ============================================================================
// OUTLINE AND DECK HELPERS
// ============================================================================

/// Structured model output: `slides` slides of `bullets` bullets, each bullet
/// `words` words long.
pub fn json_outline(slides: usize, bullets: usize, words: usize) -> String {
    let slides: Vec<serde_json::Value> = (1..=slides)
        .map(|n| {
            let bullets: Vec<String> = (1..=bullets)
                .map(|b| {
                    (1..=words)
                        .map(|w| format!("s{n}b{b}w{w}"))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            serde_json::json!({ "title": format!("Section {n}"), "bullets": bullets })
        })
        .collect();
    serde_json::Value::Array(slides).to_string()
}

pub fn slide_part_count(bytes: &[u8]) -> usize {
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");
    archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count()
}

pub fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");
    let mut file = archive.by_name(name).expect("part present");
    let mut out = String::new();
    file.read_to_string(&mut out).expect("utf-8 part");
    out
}

pub fn slide_xml(bytes: &[u8], n: usize) -> String {
    read_part(bytes, &format!("ppt/slides/slide{n}.xml"))
}

//! Framework-agnostic boundary operations. HTTP handlers are thin adapters
//! over these.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::AppConfig;
use crate::deck::{AssemblyError, DeckAssembler};
use crate::generation::{
    GeminiTextService, GenerationError, OutlineRequester, TextService, fallback, validator,
};
use crate::images::{FetchedImages, ImageEnricher, ImageService, PollinationsImageService};
use crate::models::history::{self, HistoryError, MetricsSnapshot, PresentationRecord};
use crate::models::outline::{DeckConfig, Outline, Slide};

static FILENAME_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("valid regex"));

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Where the slides of an outline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Generated,
    Fallback,
    Client,
}

#[derive(Debug, Clone)]
pub struct GeneratedOutline {
    pub outline: Outline,
    pub presentation_id: i64,
    pub source: ContentSource,
}

#[derive(Debug, Clone)]
pub struct GeneratedDeck {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub record: PresentationRecord,
    pub source: ContentSource,
    pub images_attached: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub model: String,
    pub status: String,
}

pub struct DeckPipeline {
    requester: OutlineRequester,
    enricher: ImageEnricher,
    assembler: DeckAssembler,
    fallback_on_unavailable: bool,
}

impl DeckPipeline {
    pub fn new(
        requester: OutlineRequester,
        enricher: ImageEnricher,
        assembler: DeckAssembler,
    ) -> Self {
        Self {
            requester,
            enricher,
            assembler,
            fallback_on_unavailable: true,
        }
    }

    /// Wire the production collaborators from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let text: Arc<dyn TextService> = Arc::new(
            GeminiTextService::new(config.gemini_api_key.clone(), config.gemini_model.clone())
                .with_client(client.clone()),
        );
        let images: Arc<dyn ImageService> = Arc::new(
            PollinationsImageService::new(config.image_service_url.clone()).with_client(client),
        );

        Ok(Self::new(
            OutlineRequester::new(text, config.text_timeout),
            ImageEnricher::new(
                images,
                config.image_dir.clone(),
                config.image_timeout,
                config.image_concurrency,
            ),
            DeckAssembler::new().with_bookend_slides(config.bookend_slides),
        )
        .with_fallback_on_unavailable(config.fallback_on_unavailable))
    }

    /// When enabled, an unavailable text service yields the deterministic
    /// fallback outline instead of an error.
    pub fn with_fallback_on_unavailable(mut self, enabled: bool) -> Self {
        self.fallback_on_unavailable = enabled;
        self
    }

    pub fn model(&self) -> &str {
        self.requester.model()
    }

    async fn outline_for(
        &self,
        config: &DeckConfig,
    ) -> Result<(Outline, ContentSource), GenerationError> {
        match self.requester.request(config).await {
            Ok(raw) => match validator::parse_usable(&raw, config) {
                Some(outline) => Ok((outline, ContentSource::Generated)),
                None => Ok((fallback::fallback_outline(config), ContentSource::Fallback)),
            },
            Err(e) if self.fallback_on_unavailable => {
                log::warn!("Text service unavailable, substituting fallback outline: {e}");
                Ok((fallback::fallback_outline(config), ContentSource::Fallback))
            }
            Err(e) => Err(e),
        }
    }

    /// GenerateOutline: preview content and record the configuration.
    pub async fn generate_outline(
        &self,
        pool: &SqlitePool,
        config: &DeckConfig,
    ) -> Result<GeneratedOutline, PipelineError> {
        let (outline, source) = self.outline_for(config).await?;
        let presentation_id =
            history::upsert_on_generate(pool, config, outline.slides.len()).await?;
        log::info!(
            "Outline ready: presentation={presentation_id} slides={} source={source:?}",
            outline.slides.len()
        );
        Ok(GeneratedOutline {
            outline,
            presentation_id,
            source,
        })
    }

    /// GeneratePresentation: build the deck and count the download. Slides
    /// supplied by the client skip the text call but are still normalized.
    pub async fn generate_presentation(
        &self,
        pool: &SqlitePool,
        config: &DeckConfig,
        client_slides: Option<Vec<Slide>>,
    ) -> Result<GeneratedDeck, PipelineError> {
        let (outline, source) = match client_slides {
            Some(slides) if !slides.is_empty() => {
                (validator::normalize(slides, config), ContentSource::Client)
            }
            _ => self.outline_for(config).await?,
        };

        let outline = self.enricher.enrich(outline, config.include_images).await;
        let fetched = FetchedImages::of(&outline);
        let images_attached = fetched.len();
        let actual_slides = outline.slides.len();

        let assembler = self.assembler;
        let assembled = tokio::task::spawn_blocking(move || assembler.assemble(&outline)).await;
        drop(fetched);
        let bytes = assembled.map_err(|e| AssemblyError::Worker(e.to_string()))??;

        let record = history::record_download(pool, config, actual_slides).await?;

        Ok(GeneratedDeck {
            bytes,
            filename: deck_filename(&config.topic),
            record,
            source,
            images_attached,
        })
    }

    pub async fn list_history(
        &self,
        pool: &SqlitePool,
    ) -> Result<(Vec<PresentationRecord>, i64), PipelineError> {
        let records = history::list(pool).await?;
        let total = history::total_downloads(pool).await?;
        Ok((records, total))
    }

    pub async fn delete_history_item(
        &self,
        pool: &SqlitePool,
        id: i64,
    ) -> Result<(), PipelineError> {
        history::delete_one(pool, id).await?;
        Ok(())
    }

    pub async fn clear_history(&self, pool: &SqlitePool) -> Result<u64, PipelineError> {
        Ok(history::clear_all(pool).await?)
    }

    pub async fn metrics(&self, pool: &SqlitePool) -> Result<MetricsSnapshot, PipelineError> {
        Ok(history::metrics(pool).await?)
    }

    /// HealthCheck: one short round trip to the text service.
    pub async fn health_check(&self) -> HealthStatus {
        let model = self.model().to_string();
        match self.requester.ping().await {
            Ok(_) => HealthStatus {
                ok: true,
                model,
                status: "ready".to_string(),
            },
            Err(e) => {
                log::warn!("Health check failed: {e}");
                HealthStatus {
                    ok: false,
                    model,
                    status: format!("unavailable: {e}"),
                }
            }
        }
    }
}

/// Download name derived from the topic: unsafe runs become `_`.
pub fn deck_filename(topic: &str) -> String {
    let stem = FILENAME_UNSAFE.replace_all(topic.trim(), "_");
    let stem = stem.trim_matches('_');
    let stem: String = stem.chars().take(80).collect();
    if stem.is_empty() {
        "ai_presentation.pptx".to_string()
    } else {
        format!("{stem}.pptx")
    }
}

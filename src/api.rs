//! JSON request and response shapes for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::models::history::PresentationRecord;
use crate::models::outline::{
    BackgroundColor, ContentDepth, DEFAULT_SLIDES, DeckConfig, InputError, Outline, Slide, Style,
};
use crate::pipeline::ContentSource;

fn default_slides() -> usize {
    DEFAULT_SLIDES
}

/// Body of `POST /api/outline` and `POST /api/generate-ppt`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePayload {
    pub topic: String,
    #[serde(default = "default_slides")]
    pub slides: usize,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub include_images: bool,
    #[serde(default)]
    pub content_depth: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Client-edited slides; only honored by `generate-ppt`.
    #[serde(default)]
    pub outline: Option<Vec<SlideInput>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl From<SlideInput> for Slide {
    fn from(input: SlideInput) -> Self {
        Slide::new(input.title, input.bullets)
    }
}

/// Treats missing and blank optional fields as "use the default".
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl GeneratePayload {
    pub fn to_config(&self) -> Result<DeckConfig, InputError> {
        let style = present(&self.style)
            .map(str::parse::<Style>)
            .transpose()?
            .unwrap_or_default();
        let depth = present(&self.content_depth)
            .map(str::parse::<ContentDepth>)
            .transpose()?
            .unwrap_or_default();
        let background = present(&self.background_color)
            .map(str::parse::<BackgroundColor>)
            .transpose()?
            .unwrap_or_default();

        Ok(DeckConfig::new(&self.topic, self.slides)?
            .with_style(style)
            .with_depth(depth)
            .with_background(background)
            .with_images(self.include_images)
            .with_notes(self.notes.clone()))
    }

    pub fn client_slides(&self) -> Option<Vec<Slide>> {
        self.outline
            .clone()
            .map(|slides| slides.into_iter().map(Slide::from).collect())
    }
}

#[derive(Debug, Serialize)]
pub struct OutlineResponse {
    pub presentation_id: i64,
    pub source: ContentSource,
    #[serde(flatten)]
    pub outline: Outline,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub presentations: Vec<PresentationRecord>,
    pub total_downloads: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BackgroundPreset {
    pub name: &'static str,
    pub value: &'static str,
}

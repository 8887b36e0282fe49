use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::depth_policy::UnknownDepth;

pub const MIN_SLIDES: usize = 3;
pub const MAX_SLIDES: usize = 20;
pub const DEFAULT_SLIDES: usize = 6;

/// Rejected request input, reported to the client before any outbound call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("slide count {0} is outside 3..=20")]
    SlideCount(usize),
    #[error("unknown style '{0}' (expected Pink-Creative or Blue-Professional)")]
    Style(String),
    #[error("invalid background color '{0}' (expected #RRGGBB)")]
    BackgroundColor(String),
    #[error(transparent)]
    Depth(#[from] UnknownDepth),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    #[serde(rename = "Pink-Creative")]
    PinkCreative,
    #[default]
    #[serde(rename = "Blue-Professional")]
    BlueProfessional,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::PinkCreative => "Pink-Creative",
            Style::BlueProfessional => "Blue-Professional",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pink-creative" | "pink" => Ok(Style::PinkCreative),
            "blue-professional" | "blue" => Ok(Style::BlueProfessional),
            _ => Err(InputError::Style(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentDepth {
    Basic,
    #[default]
    Detailed,
    Comprehensive,
}

impl ContentDepth {
    pub const ALL: [ContentDepth; 3] = [
        ContentDepth::Basic,
        ContentDepth::Detailed,
        ContentDepth::Comprehensive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentDepth::Basic => "basic",
            ContentDepth::Detailed => "detailed",
            ContentDepth::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for ContentDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentDepth {
    type Err = UnknownDepth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ContentDepth::ALL
            .into_iter()
            .find(|depth| depth.as_str() == wanted)
            .ok_or_else(|| UnknownDepth(s.to_string()))
    }
}

/// Slide background fill, kept as three RGB bytes and rendered as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor([u8; 3]);

impl BackgroundColor {
    pub const WHITE: BackgroundColor = BackgroundColor([0xFF, 0xFF, 0xFF]);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        BackgroundColor([r, g, b])
    }

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }

    /// `#RRGGBB`, uppercase.
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode_upper(self.0))
    }

    /// Perceived brightness on a 0-255 scale (ITU-R BT.601 weights).
    pub fn brightness(self) -> u32 {
        let [r, g, b] = self.0.map(u32::from);
        (r * 299 + g * 587 + b * 114) / 1000
    }

    pub fn is_dark(self) -> bool {
        self.brightness() < 128
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        BackgroundColor::WHITE
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for BackgroundColor {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::BackgroundColor(s.to_string());
        let digits = s.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };
        let bytes = hex::decode(&expanded).map_err(|_| invalid())?;
        let rgb: [u8; 3] = bytes.try_into().map_err(|_| invalid())?;
        Ok(BackgroundColor(rgb))
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackgroundColor> for String {
    fn from(color: BackgroundColor) -> Self {
        color.to_hex()
    }
}

/// Validated deck request: everything the pipeline needs to build one deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckConfig {
    pub topic: String,
    pub slide_count: usize,
    pub style: Style,
    pub content_depth: ContentDepth,
    pub background_color: BackgroundColor,
    pub include_images: bool,
    pub notes: Option<String>,
}

impl DeckConfig {
    pub fn new(topic: &str, slide_count: usize) -> Result<Self, InputError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(InputError::EmptyTopic);
        }
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&slide_count) {
            return Err(InputError::SlideCount(slide_count));
        }
        Ok(DeckConfig {
            topic: topic.to_string(),
            slide_count,
            style: Style::default(),
            content_depth: ContentDepth::default(),
            background_color: BackgroundColor::default(),
            include_images: false,
            notes: None,
        })
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_depth(mut self, depth: ContentDepth) -> Self {
        self.content_depth = depth;
        self
    }

    pub fn with_background(mut self, color: BackgroundColor) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_images(mut self, include_images: bool) -> Self {
        self.include_images = include_images;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub bullets: Vec<String>,
    /// Set only when image enrichment succeeded for this slide. Never read
    /// from or written to the wire.
    #[serde(skip)]
    pub image_path: Option<PathBuf>,
}

impl Slide {
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Slide {
            title: title.into(),
            bullets,
            image_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outline {
    pub topic: String,
    pub style: Style,
    pub content_depth: ContentDepth,
    pub background_color: BackgroundColor,
    pub requested_slide_count: usize,
    pub slides: Vec<Slide>,
}

impl Outline {
    pub fn for_config(config: &DeckConfig, slides: Vec<Slide>) -> Self {
        Outline {
            topic: config.topic.clone(),
            style: config.style,
            content_depth: config.content_depth,
            background_color: config.background_color,
            requested_slide_count: config.slide_count,
            slides,
        }
    }

    pub fn images_attached(&self) -> usize {
        self.slides.iter().filter(|s| s.image_path.is_some()).count()
    }
}

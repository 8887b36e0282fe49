//! PPTX assembly: outline in, `.pptx` bytes out.

pub mod image;
pub mod layout;
mod package;
pub mod slide;
pub mod theme;
mod xml;

use std::path::Path;

use thiserror::Error;

use crate::models::depth_policy::ContentDepthPolicy;
use crate::models::outline::{Outline, Slide};
use image::ImageFormat;
use layout::Rect;
use package::PackageWriter;
use slide::{Align, Paragraph, Shape, SlideImage, SlidePart};
use theme::{Palette, srgb};

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("failed to write deck package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write deck package: {0}")]
    Io(#[from] std::io::Error),
    #[error("unusable image {path}: {reason}")]
    Image { path: String, reason: String },
    #[error("assembly worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeckAssembler {
    bookend_slides: bool,
}

impl DeckAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cover slide and a closing "Thank You" slide around the content.
    pub fn with_bookend_slides(mut self, enabled: bool) -> Self {
        self.bookend_slides = enabled;
        self
    }

    pub fn assemble(&self, outline: &Outline) -> Result<Vec<u8>, AssemblyError> {
        let rule = ContentDepthPolicy::get(outline.content_depth);
        let palette = theme::palette(outline.style, outline.background_color);
        let background = srgb(outline.background_color.rgb());

        let mut parts = Vec::with_capacity(outline.slides.len() + 2);
        if self.bookend_slides {
            parts.push(cover_slide(outline, &palette, &background, rule.bullet_count));
        }
        for (index, slide) in outline.slides.iter().enumerate() {
            let image = slide.image_path.as_deref().and_then(|path| match load_image(path) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("Slide {} rendered without picture: {e}", index + 1);
                    None
                }
            });
            parts.push(content_slide(slide, &palette, &background, rule.bullet_count, image));
        }
        if self.bookend_slides {
            parts.push(closing_slide(outline, &palette, &background, rule.bullet_count));
        }

        let bytes = PackageWriter::new().write_deck(&outline.topic, &palette, &parts)?;
        log::info!(
            "Assembled deck: {} slides, {} pictures, {} bytes",
            parts.len(),
            parts.iter().filter(|p| p.has_picture()).count(),
            bytes.len()
        );
        Ok(bytes)
    }
}

fn load_image(path: &Path) -> Result<SlideImage, AssemblyError> {
    let image_error = |reason: String| AssemblyError::Image {
        path: path.display().to_string(),
        reason,
    };
    let data = std::fs::read(path).map_err(|e| image_error(e.to_string()))?;
    let format = ImageFormat::detect_from_bytes(&data)
        .ok_or_else(|| image_error("unrecognized image data".to_string()))?;
    Ok(SlideImage { data, format })
}

fn content_slide(
    slide: &Slide,
    palette: &Palette,
    background: &str,
    bullet_count: usize,
    image: Option<SlideImage>,
) -> SlidePart {
    let regions = layout::content_layout(image.is_some());
    let body_pt = layout::body_font_pt(bullet_count);
    let spacing_pt = layout::bullet_spacing_pt(bullet_count);
    let accent = srgb(palette.accent);

    let mut shapes = vec![
        Shape::Text {
            name: "Title",
            rect: regions.title,
            paragraphs: vec![Paragraph {
                text: slide.title.clone(),
                size_pt: layout::title_font_pt(&slide.title),
                bold: true,
                color: srgb(palette.title),
                bullet: None,
                space_after_pt: 0,
            }],
            align: Align::Left,
            font: palette.font,
        },
        Shape::Bar {
            rect: regions.accent_bar,
            color: accent.clone(),
        },
        Shape::Text {
            name: "Content",
            rect: regions.body,
            paragraphs: slide
                .bullets
                .iter()
                .map(|bullet| Paragraph {
                    text: bullet.clone(),
                    size_pt: body_pt,
                    bold: false,
                    color: srgb(palette.body),
                    bullet: Some(accent.clone()),
                    space_after_pt: spacing_pt,
                })
                .collect(),
            align: Align::Left,
            font: palette.font,
        },
    ];
    if let Some(rect) = regions.image {
        shapes.push(Shape::Picture {
            rect,
            description: slide.title.clone(),
        });
    }

    SlidePart {
        background: background.to_string(),
        shapes,
        image,
    }
}

fn bookend(
    palette: &Palette,
    background: &str,
    heading: &str,
    heading_pt: u32,
    lines: Vec<String>,
) -> SlidePart {
    let accent = srgb(palette.accent);
    let heading_rect = Rect::new(685_800, 2_011_680, layout::SLIDE_WIDTH - 2 * 685_800, 1_463_040);
    let bar_rect = Rect::new((layout::SLIDE_WIDTH - 2_743_200) / 2, 3_566_160, 2_743_200, 54_864);
    let sub_rect = Rect::new(685_800, 3_749_040, layout::SLIDE_WIDTH - 2 * 685_800, 1_188_720);

    SlidePart {
        background: background.to_string(),
        shapes: vec![
            Shape::Text {
                name: "Title",
                rect: heading_rect,
                paragraphs: vec![Paragraph {
                    text: heading.to_string(),
                    size_pt: heading_pt,
                    bold: true,
                    color: srgb(palette.title),
                    bullet: None,
                    space_after_pt: 0,
                }],
                align: Align::Center,
                font: palette.font,
            },
            Shape::Bar {
                rect: bar_rect,
                color: accent.clone(),
            },
            Shape::Text {
                name: "Subtitle",
                rect: sub_rect,
                paragraphs: lines
                    .into_iter()
                    .map(|text| Paragraph {
                        text,
                        size_pt: 18,
                        bold: false,
                        color: srgb(palette.body),
                        bullet: None,
                        space_after_pt: 6,
                    })
                    .collect(),
                align: Align::Center,
                font: palette.font,
            },
        ],
        image: None,
    }
}

fn depth_label(outline: &Outline) -> String {
    let depth = outline.content_depth.as_str();
    let mut chars = depth.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

fn cover_slide(outline: &Outline, palette: &Palette, background: &str, bullets: usize) -> SlidePart {
    bookend(
        palette,
        background,
        &outline.topic,
        layout::cover_title_font_pt(&outline.topic),
        vec![
            format!("{} Presentation", depth_label(outline)),
            format!(
                "{} content slides • {bullets} points per slide",
                outline.slides.len()
            ),
        ],
    )
}

fn closing_slide(outline: &Outline, palette: &Palette, background: &str, bullets: usize) -> SlidePart {
    bookend(
        palette,
        background,
        "Thank You",
        44,
        vec![
            "Questions & Discussion".to_string(),
            format!(
                "{} content • {} slides • {bullets} points per slide",
                depth_label(outline),
                outline.slides.len()
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::outline::{ContentDepth, DeckConfig};
    use std::io::Read;

    fn outline(slides: usize) -> Outline {
        let config = DeckConfig::new("AI in Healthcare", slides)
            .unwrap()
            .with_depth(ContentDepth::Basic);
        crate::generation::fallback::fallback_outline(&config)
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_assembles_one_slide_per_outline_slide() {
        let bytes = DeckAssembler::new().assemble(&outline(4)).unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(&bytes[..])).unwrap();
        let slide_parts = archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .count();
        assert_eq!(slide_parts, 4);

        let slide1 = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide1.contains("Introduction &amp; Overview: AI in Healthcare"));
        assert!(slide1.contains(r#"sz="2000""#));
        assert!(slide1.contains("Calibri"));
    }

    #[test]
    fn test_bookends_wrap_content() {
        let bytes = DeckAssembler::new()
            .with_bookend_slides(true)
            .assemble(&outline(3))
            .unwrap();
        let last = read_part(&bytes, "ppt/slides/slide5.xml");
        assert!(last.contains("Thank You"));
        let cover = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(cover.contains("Basic Presentation"));
    }

    #[test]
    fn test_unreadable_image_degrades_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let junk = dir.path().join("junk.img");
        std::fs::write(&junk, b"not an image").unwrap();

        let mut outline = outline(3);
        outline.slides[0].image_path = Some(junk);
        outline.slides[1].image_path = Some(dir.path().join("missing.img"));

        let bytes = DeckAssembler::new().assemble(&outline).unwrap();
        for n in 1..=3 {
            let xml = read_part(&bytes, &format!("ppt/slides/slide{n}.xml"));
            assert!(!xml.contains("<p:pic>"));
        }
    }

    #[test]
    fn test_dark_background_uses_light_text() {
        let mut outline = outline(3);
        outline.background_color = "#1E293B".parse().unwrap();
        let bytes = DeckAssembler::new().assemble(&outline).unwrap();
        let xml = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(xml.contains(r#"<a:srgbClr val="1E293B"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="FFFFFF"/>"#));
    }
}

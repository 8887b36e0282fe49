//! Turns raw text-service output into an `Outline` that satisfies the depth
//! rules. `parse` is total: whatever comes in, the result has exactly the
//! requested slide count and exactly `bullet_count` bullets per slide.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::models::depth_policy::ContentDepthPolicy;
use crate::models::outline::{ContentDepth, DeckConfig, Outline, Slide};

const TITLE_MAX_WORDS: usize = 15;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("valid regex")
});
static SLIDE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*slide\s*(\d+)\s*(?:\*\*|__)?\s*[:.)\-–—]?\s*(.*)$")
        .expect("valid regex")
});
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s+(.+?)\s*#*\s*$").expect("valid regex"));
static BOLD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\*\*|__)([^*_].*?)(?:\*\*|__)\s*:?\s*$").expect("valid regex")
});
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•·–]|\d{1,2}[.)])\s+(.*)$").expect("valid regex")
});
static INLINE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-–—]\s+").expect("valid regex"));

/// How the slides were recovered. Only used for logging; callers see the
/// normalized `Outline` regardless of path.
enum ParsePath {
    Structured(Vec<Slide>),
    Heuristic(Vec<Slide>),
    Fallback,
}

impl ParsePath {
    fn label(&self) -> &'static str {
        match self {
            ParsePath::Structured(_) => "structured",
            ParsePath::Heuristic(_) => "heuristic",
            ParsePath::Fallback => "fallback",
        }
    }

    fn into_slides(self) -> Vec<Slide> {
        match self {
            ParsePath::Structured(slides) | ParsePath::Heuristic(slides) => slides,
            ParsePath::Fallback => Vec::new(),
        }
    }
}

pub fn parse(raw: &str, config: &DeckConfig) -> Outline {
    let recovered = recover_logged(raw, config);
    normalize(recovered, config)
}

/// Like `parse`, but `None` when the reply yields fewer than
/// `min(3, slide_count)` usable slides (prose, refusals, garbage). Callers
/// substitute the fallback outline in that case.
pub fn parse_usable(raw: &str, config: &DeckConfig) -> Option<Outline> {
    let recovered = recover_logged(raw, config);
    let usable = recovered
        .iter()
        .filter(|s| {
            !clean_title(&s.title).is_empty() || s.bullets.iter().any(|b| has_content(b))
        })
        .count();
    let needed = config.slide_count.min(3);
    if usable < needed {
        log::warn!("Model reply yielded {usable} usable slides, need at least {needed}");
        return None;
    }
    Some(normalize(recovered, config))
}

fn recover_logged(raw: &str, config: &DeckConfig) -> Vec<Slide> {
    let path = recover(raw, config.slide_count);
    let label = path.label();
    let recovered = path.into_slides();
    log::info!(
        "Outline recovered via {label} path: {} of {} slides",
        recovered.len(),
        config.slide_count
    );
    recovered
}

/// Bring any slide list into shape: clean titles and bullets, enforce the
/// bullet count and word ceiling, then pad or truncate to the slide count.
pub fn normalize(slides: Vec<Slide>, config: &DeckConfig) -> Outline {
    let rule = ContentDepthPolicy::get(config.content_depth);

    let mut normalized: Vec<Slide> = slides
        .into_iter()
        .map(|slide| Slide {
            title: clean_title(&slide.title),
            bullets: slide
                .bullets
                .iter()
                .map(|b| clean_text(b))
                .filter(|b| has_content(b))
                .collect(),
            image_path: slide.image_path,
        })
        .filter(|slide| !slide.title.is_empty() || !slide.bullets.is_empty())
        .take(config.slide_count)
        .collect();

    while normalized.len() < config.slide_count {
        let n = normalized.len() + 1;
        normalized.push(Slide::new(format!("Additional Topic {n}"), Vec::new()));
    }

    for (index, slide) in normalized.iter_mut().enumerate() {
        if slide.title.is_empty() {
            slide.title = format!("Slide {}", index + 1);
        }
        slide.title = clamp_words(&slide.title, TITLE_MAX_WORDS);

        slide.bullets.truncate(rule.bullet_count);
        while slide.bullets.len() < rule.bullet_count {
            let filler = pad_bullet(config.content_depth, &slide.title, slide.bullets.len());
            slide.bullets.push(filler);
        }
        for bullet in slide.bullets.iter_mut() {
            *bullet = clamp_words(bullet, rule.max_words);
        }
    }

    Outline::for_config(config, normalized)
}

/// Keep at most `max_words` words; a cut bullet ends with `…`.
pub fn clamp_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    let mut clamped = words[..max_words].join(" ");
    let trimmed_len = clamped
        .trim_end_matches([',', ';', ':', '.', '-', '–', '—'])
        .len();
    clamped.truncate(trimmed_len);
    clamped.push('…');
    clamped
}

fn recover(raw: &str, requested: usize) -> ParsePath {
    let structured = match parse_structured(raw).filter(|slides| !slides.is_empty()) {
        Some(slides) if slides.len() == requested => return ParsePath::Structured(slides),
        other => other,
    };

    let heuristic = parse_heuristic(raw);
    let distance = |n: usize| n.abs_diff(requested);

    match structured {
        Some(slides) if heuristic.is_empty() || distance(slides.len()) <= distance(heuristic.len()) => {
            ParsePath::Structured(slides)
        }
        _ if !heuristic.is_empty() => ParsePath::Heuristic(heuristic),
        _ => ParsePath::Fallback,
    }
}

#[derive(Deserialize)]
struct JsonSlide {
    #[serde(default, alias = "heading", alias = "name")]
    title: String,
    #[serde(default, alias = "points", alias = "bullet_points", alias = "content")]
    bullets: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonOutline {
    Bare(Vec<JsonSlide>),
    Wrapped { slides: Vec<JsonSlide> },
}

fn parse_structured(raw: &str) -> Option<Vec<Slide>> {
    let body = CODE_FENCE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map_or(raw, |m| m.as_str())
        .trim();

    let candidates = [
        Some(body),
        slice_between(body, '[', ']'),
        slice_between(body, '{', '}'),
    ];

    let parsed = candidates
        .into_iter()
        .flatten()
        .find_map(|candidate| serde_json::from_str::<JsonOutline>(candidate).ok())?;

    let slides = match parsed {
        JsonOutline::Bare(slides) | JsonOutline::Wrapped { slides } => slides,
    };
    Some(
        slides
            .into_iter()
            .map(|s| Slide::new(s.title, s.bullets))
            .collect(),
    )
}

fn slice_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn parse_heuristic(raw: &str) -> Vec<Slide> {
    let mut slides: Vec<Slide> = Vec::new();
    let mut current: Option<Slide> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("```") {
            continue;
        }

        if let Some(title) = title_of(line) {
            slides.extend(current.take());
            current = Some(split_inline(&title));
            continue;
        }

        let Some(slide) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = BULLET.captures(line) {
            slide.bullets.push(caps[1].to_string());
        } else if slide.title.trim().is_empty() {
            slide.title = trimmed.to_string();
        } else if line.starts_with([' ', '\t']) || !is_label(trimmed) {
            slide.bullets.push(trimmed.to_string());
        }
    }
    slides.extend(current);

    slides
        .into_iter()
        .filter(|s| !clean_title(&s.title).is_empty() || !s.bullets.is_empty())
        .collect()
}

fn title_of(line: &str) -> Option<String> {
    if let Some(caps) = SLIDE_TITLE.captures(line) {
        return Some(caps.get(2).map_or("", |m| m.as_str()).to_string());
    }
    if let Some(caps) = HEADING.captures(line) {
        return Some(caps[1].to_string());
    }
    BOLD_LINE.captures(line).map(|caps| caps[1].to_string())
}

/// `Title - first - second` on one line becomes a title plus bullets.
fn split_inline(title: &str) -> Slide {
    let parts: Vec<&str> = INLINE_SEPARATOR.split(title).collect();
    if parts.len() >= 3 {
        Slide::new(
            parts[0].to_string(),
            parts[1..].iter().map(|p| p.to_string()).collect(),
        )
    } else {
        Slide::new(title.to_string(), Vec::new())
    }
}

/// Short lines like `Key points:` that introduce a list rather than carry
/// content.
fn is_label(line: &str) -> bool {
    line.ends_with(':') && line.split_whitespace().count() <= 3
}

/// Control characters other than tab and newlines are not allowed in XML
/// text; they become spaces.
fn strip_controls(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn clean_text(text: &str) -> String {
    let stripped = strip_controls(text)
        .replace("**", "")
        .replace("__", "")
        .replace('`', "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| matches!(c, '[' | ']' | '"' | '\'') || c.is_whitespace())
        .to_string()
}

fn clean_title(title: &str) -> String {
    let mut cleaned = clean_text(title);
    if let Some(caps) = SLIDE_TITLE.captures(&cleaned) {
        cleaned = clean_text(caps.get(2).map_or("", |m| m.as_str()));
    }
    cleaned
        .trim_start_matches('#')
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn has_content(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

fn pad_bullet(depth: ContentDepth, title: &str, index: usize) -> String {
    let templates: &[&str] = match depth {
        ContentDepth::Basic => &[
            "Key point about {t}",
            "Practical example of {t}",
            "Why {t} matters today",
        ],
        ContentDepth::Detailed => &[
            "Supporting analysis of {t} and its wider implications",
            "Practical examples showing how {t} applies in real settings",
            "Key considerations and trade-offs to weigh for {t}",
            "Open questions about {t} worth exploring with the team",
        ],
        ContentDepth::Comprehensive => &[
            "Strategic context linking {t} to broader organizational objectives and expected measurable outcomes",
            "Supporting evidence and data points that strengthen the overall case for {t}",
            "Implementation considerations for {t} covering resources, timelines, dependencies, and governance",
            "Risks and mitigation options that leadership should review before committing to {t}",
            "Recommended next steps for {t} with clear ownership, sequencing, and follow-up checkpoints",
        ],
    };
    templates[index % templates.len()].replace("{t}", &title.to_lowercase())
}

use std::collections::BTreeMap;

use thiserror::Error;

use super::outline::ContentDepth;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown content depth '{0}' (expected basic, detailed or comprehensive)")]
pub struct UnknownDepth(pub String);

/// Bullet shape for one depth level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthRule {
    pub depth: ContentDepth,
    pub bullet_count: usize,
    pub min_words: usize,
    pub max_words: usize,
    pub label: &'static str,
}

const RULES: [DepthRule; 3] = [
    DepthRule {
        depth: ContentDepth::Basic,
        bullet_count: 3,
        min_words: 5,
        max_words: 7,
        label: "Basic (3 bullets, 5-7 words each) - Foundational concepts",
    },
    DepthRule {
        depth: ContentDepth::Detailed,
        bullet_count: 4,
        min_words: 8,
        max_words: 12,
        label: "Detailed (4 bullets, 8-12 words each) - Strategic analysis",
    },
    DepthRule {
        depth: ContentDepth::Comprehensive,
        bullet_count: 5,
        min_words: 12,
        max_words: 18,
        label: "Comprehensive (5 bullets, 12-18 words each) - Executive insights",
    },
];

/// Process-wide, read-only table of depth rules.
pub struct ContentDepthPolicy;

impl ContentDepthPolicy {
    pub fn get(depth: ContentDepth) -> &'static DepthRule {
        match depth {
            ContentDepth::Basic => &RULES[0],
            ContentDepth::Detailed => &RULES[1],
            ContentDepth::Comprehensive => &RULES[2],
        }
    }

    pub fn lookup(name: &str) -> Result<&'static DepthRule, UnknownDepth> {
        let depth: ContentDepth = name.parse()?;
        Ok(Self::get(depth))
    }

    /// Depth key to display label, for the options endpoint.
    pub fn options() -> BTreeMap<&'static str, &'static str> {
        RULES.iter().map(|r| (r.depth.as_str(), r.label)).collect()
    }

    pub fn rules() -> &'static [DepthRule] {
        &RULES
    }
}

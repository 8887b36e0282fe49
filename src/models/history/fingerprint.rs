use sha2::{Digest, Sha256};

use crate::models::outline::DeckConfig;

/// Topic as it takes part in the fingerprint: trimmed, inner whitespace
/// collapsed, lowercased.
pub fn canonical_topic(topic: &str) -> String {
    topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Hex SHA-256 over the full configuration tuple. Notes do not take part.
pub fn fingerprint(config: &DeckConfig) -> String {
    let canonical = format!(
        "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
        canonical_topic(&config.topic),
        config.style.as_str(),
        config.content_depth.as_str(),
        config.background_color.to_hex(),
        config.slide_count,
        config.include_images,
    );
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

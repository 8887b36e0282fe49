use std::fmt::Write;

use crate::models::depth_policy::ContentDepthPolicy;
use crate::models::outline::{ContentDepth, DeckConfig, Style};

/// Tone and worked example given to the model for one depth level.
struct DepthVoice {
    register: &'static str,
    title_limit: &'static str,
    guidance: &'static [&'static str],
    example_title: &'static str,
    example_bullets: &'static [&'static str],
}

fn voice(depth: ContentDepth) -> DepthVoice {
    match depth {
        ContentDepth::Basic => DepthVoice {
            register: "a concise",
            title_limit: "SHORT, CLEAR titles (max 8-10 words)",
            guidance: &[
                "Focus on fundamental concepts and key takeaways",
                "Use simple, clear language suitable for beginners",
            ],
            example_title: "Introduction to {topic}",
            example_bullets: &[
                "Core concept definition and overview",
                "Main purpose and basic applications",
                "Key benefits and why it matters",
            ],
        },
        ContentDepth::Detailed => DepthVoice {
            register: "a detailed professional",
            title_limit: "CONCISE, MEANINGFUL titles (max 10-12 words)",
            guidance: &[
                "Include analysis, examples, and practical applications",
                "Provide deeper insights and strategic considerations",
            ],
            example_title: "{topic}: Strategic Analysis",
            example_bullets: &[
                "Market context and current relevance of the subject today",
                "Key industry trends and emerging patterns worth tracking",
                "Strategic importance and likely business impact for organizations",
                "Implementation challenges alongside practical and proven solutions",
            ],
        },
        ContentDepth::Comprehensive => DepthVoice {
            register: "an executive-level comprehensive",
            title_limit: "FOCUSED, STRATEGIC titles (max 12-15 words)",
            guidance: &[
                "Include data-driven insights and strategic frameworks",
                "Cover financial implications and long-term impact",
                "Ensure VARIED content across slides with no repetition",
            ],
            example_title: "Executive Strategic Overview of {topic}",
            example_bullets: &[
                "Market analysis covering current trends, competitive landscape, and the most relevant growth signals",
                "Business case development with ROI calculation, financial projections, and investment justification",
                "Implementation roadmap detailing a phased approach, resource allocation, and milestone tracking",
                "Stakeholder impact analysis covering change management, training requirements, and communication plans",
                "Performance measurement framework defining KPIs, success metrics, and continuous improvement processes",
            ],
        },
    }
}

fn style_tone(style: Style) -> &'static str {
    match style {
        Style::PinkCreative => "creative, energetic and audience-friendly",
        Style::BlueProfessional => "professional, structured and business-focused",
    }
}

/// Prompt text sent to the text service. Deterministic for a given config.
pub fn build_prompt(config: &DeckConfig) -> String {
    let rule = ContentDepthPolicy::get(config.content_depth);
    let voice = voice(config.content_depth);
    let topic = single_line(&config.topic);
    let n = config.slide_count;

    let mut prompt = String::with_capacity(2048);
    let _ = writeln!(
        prompt,
        "Create {} PowerPoint presentation outline about \"{topic}\" with EXACTLY {n} slides.",
        voice.register
    );
    let _ = writeln!(
        prompt,
        "Presentation style: {} ({}).",
        config.style,
        style_tone(config.style)
    );
    prompt.push('\n');
    prompt.push_str("CRITICAL REQUIREMENTS:\n");
    let _ = writeln!(prompt, "- Generate EXACTLY {n} slides - no more, no less");
    prompt.push_str("- Each slide must start with \"Slide X: [Title]\"\n");
    prompt.push_str("- Use bullet points starting with \"-\"\n");
    let _ = writeln!(
        prompt,
        "- Include EXACTLY {} bullet points per slide",
        rule.bullet_count
    );
    let _ = writeln!(
        prompt,
        "- Each bullet should be {}-{} words",
        rule.min_words, rule.max_words
    );
    let _ = writeln!(prompt, "- Create {}", voice.title_limit);
    for line in voice.guidance {
        let _ = writeln!(prompt, "- {line}");
    }
    prompt.push_str("- Ensure each bullet point is COMPLETE and doesn't get cut off\n");
    prompt.push_str("- Make each slide UNIQUE with different content\n");
    prompt.push_str("- Reply with the outline only, no introduction or closing remarks\n");

    prompt.push_str("\nFORMAT EXAMPLE:\n");
    let _ = writeln!(
        prompt,
        "Slide 1: {}",
        voice.example_title.replace("{topic}", &topic)
    );
    for bullet in voice.example_bullets {
        let _ = writeln!(prompt, "- {bullet}");
    }
    let _ = writeln!(
        prompt,
        "\nContinue this pattern for exactly {n} slides total."
    );

    if let Some(notes) = &config.notes {
        let _ = writeln!(
            prompt,
            "\nPresenter notes to take into account: {}",
            single_line(notes)
        );
    }

    prompt
}

fn single_line(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_depth_rules() {
        let config = DeckConfig::new("AI in Healthcare", 6)
            .unwrap()
            .with_depth(ContentDepth::Basic);
        let prompt = build_prompt(&config);
        assert!(prompt.contains("\"AI in Healthcare\" with EXACTLY 6 slides"));
        assert!(prompt.contains("EXACTLY 3 bullet points per slide"));
        assert!(prompt.contains("5-7 words"));
        assert!(prompt.contains("Blue-Professional"));
        assert!(prompt.contains("Slide 1: Introduction to AI in Healthcare"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let config = DeckConfig::new("Edge computing", 8)
            .unwrap()
            .with_depth(ContentDepth::Comprehensive)
            .with_style(Style::PinkCreative)
            .with_notes(Some("audience:\n  CTOs".into()));
        let first = build_prompt(&config);
        assert_eq!(first, build_prompt(&config));
        assert!(first.contains("12-18 words"));
        assert!(first.contains("Presenter notes to take into account: audience: CTOs"));
    }

    #[test]
    fn test_topic_is_flattened() {
        let config = DeckConfig::new("Quantum \"hype\"\nvs reality", 3).unwrap();
        let prompt = build_prompt(&config);
        assert!(prompt.contains("\"Quantum 'hype' vs reality\""));
    }
}

//! End-to-end pipeline tests with scripted text and image services.

mod common;

use std::sync::Arc;

use common::*;
use deckgen::models::history;
use deckgen::models::outline::{ContentDepth, DeckConfig, Slide};
use deckgen::pipeline::{ContentSource, PipelineError};

fn basic(topic: &str, slides: usize) -> DeckConfig {
    DeckConfig::new(topic, slides).unwrap().with_depth(ContentDepth::Basic)
}

#[tokio::test]
async fn test_end_to_end_basic_deck() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let images_dir = tempfile::tempdir().unwrap();
    let text = Arc::new(ScriptedTextService::new(json_outline(6, 3, 10)));
    let pipeline = test_pipeline(text.clone(), Arc::new(FakeImageService::new()), images_dir.path());
    let cfg = basic("AI in Healthcare", 6);

    let preview = pipeline.generate_outline(pool, &cfg).await.unwrap();
    assert_eq!(preview.source, ContentSource::Generated);
    assert_eq!(preview.outline.slides.len(), 6);
    for slide in &preview.outline.slides {
        assert_eq!(slide.bullets.len(), 3);
        for bullet in &slide.bullets {
            assert!(bullet.split_whitespace().count() <= 7, "too long: {bullet}");
        }
    }

    let first = pipeline.generate_presentation(pool, &cfg, None).await.unwrap();
    let second = pipeline.generate_presentation(pool, &cfg, None).await.unwrap();

    assert_eq!(slide_part_count(&first.bytes), 6);
    assert_eq!(first.filename, "AI_in_Healthcare.pptx");
    assert_eq!(first.record.id, preview.presentation_id);
    assert_eq!(second.record.id, preview.presentation_id);
    assert_eq!(second.record.download_count, 2);
    assert_eq!(second.record.actual_slides, 6);
    assert_eq!(text.calls(), 3);

    let records = history::list(pool).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].download_count, 2);
}

#[tokio::test]
async fn test_image_failure_on_one_slide_keeps_the_rest() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let images_dir = tempfile::tempdir().unwrap();
    let text = Arc::new(ScriptedTextService::new("unused"));
    let images = Arc::new(FakeImageService::failing_on(&["Broken Slide"]));
    let pipeline = test_pipeline(text.clone(), images.clone(), images_dir.path());
    let cfg = basic("Product launch", 5).with_images(true);

    let slides = ["Alpha", "Beta", "Broken Slide", "Delta", "Epsilon"]
        .into_iter()
        .map(|title| Slide::new(title, vec!["One point".to_string()]))
        .collect();
    let deck = pipeline
        .generate_presentation(pool, &cfg, Some(slides))
        .await
        .unwrap();

    assert_eq!(deck.source, ContentSource::Client);
    assert_eq!(text.calls(), 0);
    assert_eq!(images.calls(), 5);
    assert_eq!(deck.images_attached, 4);
    assert_eq!(slide_part_count(&deck.bytes), 5);
    for n in 1..=5 {
        let has_picture = slide_xml(&deck.bytes, n).contains("<p:pic>");
        assert_eq!(has_picture, n != 3, "slide {n}");
    }

    // Fetched files are removed once the deck is built
    let leftovers = std::fs::read_dir(images_dir.path()).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_client_slides_are_normalized() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let images_dir = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(
        Arc::new(ScriptedTextService::new("unused")),
        Arc::new(FakeImageService::new()),
        images_dir.path(),
    );
    let cfg = basic("Edited deck", 4);

    let slides = vec![Slide::new(
        "Only slide",
        vec!["a b c d e f g h i j k l".to_string(); 6],
    )];
    let deck = pipeline
        .generate_presentation(pool, &cfg, Some(slides))
        .await
        .unwrap();

    assert_eq!(slide_part_count(&deck.bytes), 4);
    assert!(slide_xml(&deck.bytes, 1).contains("Only slide"));
    assert!(slide_xml(&deck.bytes, 4).contains("Additional Topic 4"));
    assert_eq!(deck.record.actual_slides, 4);
}

#[tokio::test]
async fn test_unavailable_text_service_falls_back() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let images_dir = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(
        Arc::new(FailingTextService),
        Arc::new(FakeImageService::new()),
        images_dir.path(),
    );
    let cfg = basic("Offline planning", 6);

    let preview = pipeline.generate_outline(pool, &cfg).await.unwrap();
    assert_eq!(preview.source, ContentSource::Fallback);
    assert_eq!(preview.outline.slides.len(), 6);
    assert!(preview.outline.slides.iter().all(|s| s.bullets.len() == 3));

    let deck = pipeline.generate_presentation(pool, &cfg, None).await.unwrap();
    assert_eq!(deck.source, ContentSource::Fallback);
    assert_eq!(slide_part_count(&deck.bytes), 6);
}

#[tokio::test]
async fn test_unavailable_text_service_without_fallback_is_an_error() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let images_dir = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(
        Arc::new(FailingTextService),
        Arc::new(FakeImageService::new()),
        images_dir.path(),
    )
    .with_fallback_on_unavailable(false);
    let cfg = basic("Offline planning", 6);

    let outline = pipeline.generate_outline(pool, &cfg).await;
    assert!(matches!(outline, Err(PipelineError::Generation(e)) if e.is_retryable()));

    let deck = pipeline.generate_presentation(pool, &cfg, None).await;
    assert!(matches!(deck, Err(PipelineError::Generation(_))));

    assert!(history::list(pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_check_reports_model() {
    let images_dir = tempfile::tempdir().unwrap();
    let healthy = test_pipeline(
        Arc::new(ScriptedTextService::new("Yes, ready for presentation generation.")),
        Arc::new(FakeImageService::new()),
        images_dir.path(),
    );
    let status = healthy.health_check().await;
    assert!(status.ok);
    assert_eq!(status.model, "scripted");

    let down = test_pipeline(
        Arc::new(FailingTextService),
        Arc::new(FakeImageService::new()),
        images_dir.path(),
    );
    let status = down.health_check().await;
    assert!(!status.ok);
    assert_eq!(status.model, "offline");
    assert!(status.status.starts_with("unavailable"));
}

#[tokio::test]
async fn test_refusal_reply_uses_fallback_outline() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let images_dir = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(
        Arc::new(ScriptedTextService::new("I'm sorry, I can't help with that request.")),
        Arc::new(FakeImageService::new()),
        images_dir.path(),
    );
    let cfg = basic("Quarterly review", 5);

    let preview = pipeline.generate_outline(pool, &cfg).await.unwrap();
    assert_eq!(preview.source, ContentSource::Fallback);
    assert!(preview.outline.slides[0].title.starts_with("Introduction & Overview"));
    assert!(
        preview
            .outline
            .slides
            .iter()
            .all(|s| !s.title.starts_with("Additional Topic"))
    );

    let deck = pipeline.generate_presentation(pool, &cfg, None).await.unwrap();
    assert_eq!(deck.source, ContentSource::Fallback);
    assert_eq!(slide_part_count(&deck.bytes), 5);
    assert!(!slide_xml(&deck.bytes, 1).contains("sorry"));
}

#[tokio::test]
async fn test_control_characters_never_reach_slide_xml() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let images_dir = tempfile::tempdir().unwrap();
    let reply = "Slide 1: Bell\u{7}Title\n- ring\u{1b} the bell now\n\
                 Slide 2: Form\u{c}feed\n- page\u{0} break here\n\
                 Slide 3: Plain\n- nothing odd\n";
    let pipeline = test_pipeline(
        Arc::new(ScriptedTextService::new(reply)),
        Arc::new(FakeImageService::new()),
        images_dir.path(),
    );
    let cfg = basic("Escapes", 3);

    let deck = pipeline.generate_presentation(pool, &cfg, None).await.unwrap();

    assert_eq!(deck.source, ContentSource::Generated);
    assert!(slide_xml(&deck.bytes, 1).contains("Bell Title"));
    for n in 1..=3 {
        let xml = slide_xml(&deck.bytes, n);
        let bad = xml
            .chars()
            .find(|&c| c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r'));
        assert_eq!(bad, None, "slide {n}");
    }
}

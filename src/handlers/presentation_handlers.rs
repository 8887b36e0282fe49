use actix_web::{HttpResponse, http::header, web};
use sqlx::SqlitePool;

use crate::api::GeneratePayload;
use crate::errors::AppError;
use crate::pipeline::DeckPipeline;

pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// POST /api/generate-ppt - Build the deck and return it as a download
pub async fn generate_presentation(
    pool: web::Data<SqlitePool>,
    pipeline: web::Data<DeckPipeline>,
    body: web::Json<GeneratePayload>,
) -> Result<HttpResponse, AppError> {
    let config = body.to_config()?;
    log::info!(
        "Presentation requested: topic='{}' slides={} depth={} images={}",
        config.topic,
        config.slide_count,
        config.content_depth,
        config.include_images
    );

    let deck = pipeline
        .generate_presentation(&pool, &config, body.client_slides())
        .await?;

    let source = serde_json::to_value(deck.source)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    Ok(HttpResponse::Ok()
        .content_type(PPTX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", deck.filename),
        ))
        .insert_header(("X-Presentation-Id", deck.record.id.to_string()))
        .insert_header(("X-Content-Source", source))
        .insert_header(("X-Images-Attached", deck.images_attached.to_string()))
        .body(deck.bytes))
}

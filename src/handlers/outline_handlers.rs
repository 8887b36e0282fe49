use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

use crate::api::{GeneratePayload, OutlineResponse};
use crate::errors::AppError;
use crate::pipeline::DeckPipeline;

/// POST /api/outline - Preview slide content and record the configuration
pub async fn generate_outline(
    pool: web::Data<SqlitePool>,
    pipeline: web::Data<DeckPipeline>,
    body: web::Json<GeneratePayload>,
) -> Result<HttpResponse, AppError> {
    let config = body.to_config()?;
    log::info!(
        "Outline requested: topic='{}' slides={} depth={}",
        config.topic,
        config.slide_count,
        config.content_depth
    );

    let generated = pipeline.generate_outline(&pool, &config).await?;

    Ok(HttpResponse::Ok().json(OutlineResponse {
        presentation_id: generated.presentation_id,
        source: generated.source,
        outline: generated.outline,
    }))
}

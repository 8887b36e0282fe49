use actix_web::{HttpRequest, HttpResponse, web};

use crate::api::BackgroundPreset;
use crate::deck::theme::BACKGROUND_PRESETS;
use crate::errors::AppError;
use crate::models::depth_policy::ContentDepthPolicy;
use crate::pipeline::DeckPipeline;

/// GET /api/health - Probe the text service
pub async fn health(pipeline: web::Data<DeckPipeline>) -> HttpResponse {
    HttpResponse::Ok().json(pipeline.health_check().await)
}

/// GET /api/content-depths - Depth key to display label
pub async fn content_depths() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "content_depths": ContentDepthPolicy::options(),
    }))
}

/// GET /api/background-colors
pub async fn background_colors() -> HttpResponse {
    let presets: Vec<BackgroundPreset> = BACKGROUND_PRESETS
        .iter()
        .map(|&(name, value)| BackgroundPreset { name, value })
        .collect();
    HttpResponse::Ok().json(serde_json::json!({ "background_colors": presets }))
}

/// GET / - Service banner when no UI is being served
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "message": "AI presentation generator API",
    }))
}

/// Anything under `/api` without a route.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!("Route {}", req.path())))
}

use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

use crate::api::{HistoryResponse, MessageResponse};
use crate::errors::AppError;
use crate::pipeline::DeckPipeline;

/// GET /api/history - All records, most recently updated first
pub async fn list(
    pool: web::Data<SqlitePool>,
    pipeline: web::Data<DeckPipeline>,
) -> Result<HttpResponse, AppError> {
    let (presentations, total_downloads) = pipeline.list_history(&pool).await?;
    Ok(HttpResponse::Ok().json(HistoryResponse {
        presentations,
        total_downloads,
    }))
}

/// DELETE /api/history/{id}
pub async fn delete_one(
    pool: web::Data<SqlitePool>,
    pipeline: web::Data<DeckPipeline>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    pipeline.delete_history_item(&pool, id).await?;
    log::info!("Deleted presentation {id}");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Presentation {id} deleted"),
    }))
}

/// DELETE /api/history
pub async fn clear(
    pool: web::Data<SqlitePool>,
    pipeline: web::Data<DeckPipeline>,
) -> Result<HttpResponse, AppError> {
    let removed = pipeline.clear_history(&pool).await?;
    log::info!("Cleared history ({removed} records)");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Cleared {removed} presentations"),
    }))
}

/// GET /api/metrics
pub async fn metrics(
    pool: web::Data<SqlitePool>,
    pipeline: web::Data<DeckPipeline>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(pipeline.metrics(&pool).await?))
}

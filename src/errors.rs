use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::deck::AssemblyError;
use crate::generation::GenerationError;
use crate::models::depth_policy::UnknownDepth;
use crate::models::history::HistoryError;
use crate::models::outline::InputError;
use crate::pipeline::PipelineError;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    BadRequest(String),
    UnknownDepth(UnknownDepth),
    GenerationUnavailable(GenerationError),
    Assembly(AssemblyError),
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::BadRequest(msg) => write!(f, "{msg}"),
            AppError::UnknownDepth(e) => write!(f, "{e}"),
            AppError::GenerationUnavailable(e) => write!(f, "Generation unavailable: {e}"),
            AppError::Assembly(e) => write!(f, "Deck assembly failed: {e}"),
            AppError::NotFound(what) => write!(f, "{what} not found"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::UnknownDepth(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::GenerationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Db(_) | AppError::Assembly(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(_) | AppError::UnknownDepth(_) | AppError::NotFound(_) => {
                HttpResponse::build(self.status_code())
                    .json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::GenerationUnavailable(e) => {
                log::error!("{self}");
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "The text generation service is unavailable, please try again later",
                    "retryable": e.is_retryable(),
                }))
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "Internal Server Error" }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        match e {
            InputError::Depth(depth) => AppError::UnknownDepth(depth),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<UnknownDepth> for AppError {
    fn from(e: UnknownDepth) -> Self {
        AppError::UnknownDepth(e)
    }
}

impl From<HistoryError> for AppError {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::NotFound(id) => AppError::NotFound(format!("Presentation {id}")),
            HistoryError::Db(e) => AppError::Db(e),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::GenerationUnavailable(e)
    }
}

impl From<AssemblyError> for AppError {
    fn from(e: AssemblyError) -> Self {
        AppError::Assembly(e)
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Generation(e) => e.into(),
            PipelineError::Assembly(e) => e.into(),
            PipelineError::History(e) => e.into(),
        }
    }
}

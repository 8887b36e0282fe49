pub mod history_handlers;
pub mod meta_handlers;
pub mod outline_handlers;
pub mod presentation_handlers;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header},
    middleware::Next,
    web,
};

use crate::errors::AppError;

/// Open CORS for the browser UI, which may be served from another origin.
///
/// Preflight requests are answered here; every other response gets the
/// allow-origin header and exposes the download headers.
async fn cors(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if req.method() == Method::OPTIONS {
        let response = HttpResponse::NoContent()
            .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
            .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, DELETE, OPTIONS"))
            .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
            .insert_header((header::ACCESS_CONTROL_MAX_AGE, "3600"))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    let mut res = next.call(req).await?;
    let headers = res.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        header::HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        header::HeaderValue::from_static(
            "Content-Disposition, X-Presentation-Id, X-Content-Source, X-Images-Attached",
        ),
    );
    Ok(res.map_into_left_body())
}

/// Malformed JSON bodies become a 400 with the usual `{"error": ...}` shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid request body: {err}")).into())
}

/// Configure the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(
        web::scope("/api")
            .wrap(actix_web::middleware::from_fn(cors))
            .route("/outline", web::post().to(outline_handlers::generate_outline))
            .route("/generate-ppt", web::post().to(presentation_handlers::generate_presentation))
            .route("/history", web::get().to(history_handlers::list))
            .route("/history", web::delete().to(history_handlers::clear))
            .route("/history/{id}", web::delete().to(history_handlers::delete_one))
            .route("/metrics", web::get().to(history_handlers::metrics))
            .route("/content-depths", web::get().to(meta_handlers::content_depths))
            .route("/background-colors", web::get().to(meta_handlers::background_colors))
            .route("/health", web::get().to(meta_handlers::health))
            .default_service(web::to(meta_handlers::not_found)),
    );
}

//! `GeminiTextService` against a local stand-in for the REST endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

use deckgen::generation::{GeminiTextService, GenerationError, TextService};

/// Echoes `"<path segment> <prompt>"`, or fails as asked by the API key.
async fn generate_content(
    call: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    body: web::Json<Value>,
) -> HttpResponse {
    match query.get("key").map(String::as_str) {
        Some("rate-limited") => HttpResponse::TooManyRequests().json(json!({
            "error": { "code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED" }
        })),
        Some("silent") => HttpResponse::Ok().json(json!({ "candidates": [] })),
        _ => {
            let prompt = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default();
            HttpResponse::Ok().json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": format!("{call} {prompt}") }] }
                }]
            }))
        }
    }
}

fn start_stub() -> SocketAddr {
    let server = HttpServer::new(|| {
        App::new().route("/models/{call}", web::post().to(generate_content))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    addr
}

fn service(addr: SocketAddr, key: &str) -> GeminiTextService {
    GeminiTextService::new(Some(key.to_string()), "test-model")
        .with_base_url(format!("http://{addr}/models/"))
}

#[actix_rt::test]
async fn test_complete_posts_prompt_to_model_endpoint() {
    let addr = start_stub();

    let text = service(addr, "valid").complete("Outline a deck").await.unwrap();

    assert_eq!(text, "test-model:generateContent Outline a deck");
}

#[actix_rt::test]
async fn test_error_responses_are_mapped() {
    let addr = start_stub();

    let err = service(addr, "rate-limited").complete("hi").await.unwrap_err();
    assert!(matches!(err, GenerationError::Http { status: 429, .. }));
    assert!(err.is_retryable());
    assert!(err.to_string().contains("RESOURCE_EXHAUSTED: quota"));

    let err = service(addr, "silent").complete("hi").await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[actix_rt::test]
async fn test_unreachable_endpoint_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(addr, "valid").complete("hi").await.unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)));
}

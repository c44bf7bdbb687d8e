//! HTTP surface for the webhook service.
//!
//! Two routes: the amoCRM webhook endpoint and a health check. Processing
//! outcomes map onto the response contract: ignored/success are 200,
//! validation failures are a structured 422, everything else is a generic
//! 500 whose detail stays in the logs.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use crate::processor::{CatalogWebhookProcessor, WebhookOutcome};
use crate::webhook_parser::parse_form_body;

/// Shared application state.
#[derive(Clone)]
struct AppState {
    processor: Arc<CatalogWebhookProcessor>,
}

/// GET /health
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /amo/webhook/handle
async fn webhook_handler(State(state): State<AppState>, body: Bytes) -> Response {
    log::info!("Received amoCRM webhook ({} bytes)", body.len());

    let text = String::from_utf8_lossy(&body);
    let fields = parse_form_body(&text);

    match state.processor.process(&fields).await {
        Ok(WebhookOutcome::Ignored { reason }) => (
            StatusCode::OK,
            Json(json!({ "status": "ignored", "reason": reason })),
        )
            .into_response(),
        Ok(WebhookOutcome::Success {
            catalog_element_id,
            lead_id,
            platform_response,
        }) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "catalog_element_id": catalog_element_id.map(|id| id.to_string()),
                "lead_id": lead_id.to_string(),
                "platform_response": platform_response,
            })),
        )
            .into_response(),
        Err(e) if e.is_validation() => {
            log::error!("Webhook validation failed: {e}");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => {
            log::error!("Webhook processing failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

/// Builds the service router.
pub fn create_router(processor: Arc<CatalogWebhookProcessor>) -> Router {
    let state = AppState { processor };

    Router::new()
        .route("/health", get(health_handler))
        .route("/amo/webhook/handle", post(webhook_handler))
        .with_state(state)
}

/// Starts the HTTP server (async).
///
/// Binds to 0.0.0.0 (all interfaces) to work with Docker port mapping.
pub async fn serve(
    processor: Arc<CatalogWebhookProcessor>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(processor);
    let addr = format!("0.0.0.0:{port}");

    log::info!("Webhook service listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

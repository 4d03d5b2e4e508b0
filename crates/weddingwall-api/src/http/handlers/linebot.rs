//! LINE webhook endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use uuid::Uuid;

use weddingwall_core::ingest::service::IngestAck;
use weddingwall_types::line::SIGNATURE_HEADER;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/linebot - Receive a LINE webhook call.
///
/// The raw body is passed through untouched so the signature is checked
/// over exactly the bytes LINE signed.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let request_id = Uuid::now_v7().to_string();
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    tracing::info!(request_id = %request_id, bytes = body.len(), "webhook received");

    let ack = state.ingest.handle(&body, signature).await.inspect_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "webhook rejected");
    })?;

    Ok(Json(match ack {
        IngestAck::NoEvents => json!({ "success": true, "message": "no events to process" }),
        IngestAck::Processed(summary) => {
            tracing::debug!(request_id = %request_id, ?summary, "webhook handled");
            json!({ "success": true })
        }
    }))
}

/// GET /api/linebot - Liveness check for the webhook URL.
pub async fn webhook_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "LINE Bot webhook is active.",
    }))
}

use axum::Json;
use chrono::{SecondsFormat, Utc};

use postbox_types::api::HealthResponse;

/// GET /api/health — liveness check, never touches the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

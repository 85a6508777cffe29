use axum::Json;
use axum::response::IntoResponse;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    time: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(Health {
        status: "ok",
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

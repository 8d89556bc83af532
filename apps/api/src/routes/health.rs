use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "star-api"
    }))
}

/// GET /
/// Service banner with the current server time.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "STAR report generator API is running",
        "status": "online",
        "time": Utc::now().to_rfc3339()
    }))
}

//! Liveness endpoint.

use actix_web::HttpResponse;
use serde_json::json;

/// GET /api/health
///
/// Answers as long as the process is up; no database round trip.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

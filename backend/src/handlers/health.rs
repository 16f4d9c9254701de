//! Health check handler

use axum::Json;
use serde_json::json;

/// Health check endpoint, served at both `/health` and
/// `/api/v1/health`
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "sgm-backend"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_payload() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "sgm-backend");
    }
}

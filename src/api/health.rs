//! Liveness probe.

use axum::Json;

use crate::storage::StatusResponse;

/// Always answers `{"status": "Success"}`; it does not touch the store.
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse::success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_success() {
        let Json(body) = health_check().await;
        assert!(body.is_success());
        assert_eq!(body.errors, None);
    }
}

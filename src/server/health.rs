//! Liveness endpoint for the reader service.

use axum::http::StatusCode;

/// `GET /health` - answers 200 with a plain "OK" body.
///
/// Says only that the process is up and serving. Reachability of the content
/// gateway is not probed here; gateway trouble surfaces as stage errors in
/// session snapshots instead.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_200_ok() {
        let (status, body) = health_handler().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }
}

//! Fallback handler

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Handle 404 Not Found, logging the sender at debug level
pub async fn handle_404(req: Request) -> impl IntoResponse {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let application_name = req
            .headers()
            .get(crate::core::constants::APPLICATION_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        let user_agent = req
            .headers()
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::debug!(
            method = %req.method(),
            uri = %req.uri(),
            application_name,
            user_agent,
            "[404] No route"
        );
    }
    StatusCode::NOT_FOUND
}

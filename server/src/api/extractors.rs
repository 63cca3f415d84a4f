//! Header and body extractors for the collector routes

use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use crate::core::constants::APPLICATION_NAME_HEADER;

/// Value of the `Application-Name` header.
///
/// Only presence and encoding are checked here. The naming rules are
/// enforced together with the payload so every problem is reported at once.
#[derive(Debug, Clone)]
pub struct ApplicationName(pub String);

impl Deref for ApplicationName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ApplicationName
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(APPLICATION_NAME_HEADER)
            .ok_or(ValidationRejection::MissingApplicationName)?;
        let name = value
            .to_str()
            .map_err(|_| ValidationRejection::InvalidApplicationName)?;
        Ok(Self(name.trim().to_string()))
    }
}

/// JSON body extractor whose rejections use the API error shape
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationRejection::Json)?;
        Ok(Self(value))
    }
}

/// Extractor rejection with structured error response
#[derive(Debug)]
pub enum ValidationRejection {
    /// `Application-Name` header absent
    MissingApplicationName,
    /// `Application-Name` header is not visible ASCII
    InvalidApplicationName,
    /// Failed to parse JSON body
    Json(JsonRejection),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::MissingApplicationName => (
                StatusCode::BAD_REQUEST,
                "MISSING_APPLICATION_NAME",
                format!("Missing {} header", APPLICATION_NAME_HEADER),
            ),
            Self::InvalidApplicationName => (
                StatusCode::BAD_REQUEST,
                "INVALID_APPLICATION_NAME",
                format!("{} header must be visible ASCII", APPLICATION_NAME_HEADER),
            ),
            Self::Json(rejection) => (
                rejection.status(),
                "JSON_PARSE_ERROR",
                rejection.body_text(),
            ),
        };
        tracing::debug!(code, message = %message, "Request rejected");
        (
            status,
            Json(serde_json::json!({
                "error": "bad_request",
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;

    async fn extract_name(request: axum::http::Request<Body>) -> Result<ApplicationName, ValidationRejection> {
        let (mut parts, _) = request.into_parts();
        ApplicationName::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_application_name_present() {
        let request = axum::http::Request::builder()
            .header(APPLICATION_NAME_HEADER, " billing-api ")
            .body(Body::empty())
            .unwrap();
        let name = extract_name(request).await.unwrap();
        assert_eq!(&*name, "billing-api");
    }

    #[tokio::test]
    async fn test_application_name_missing() {
        let request = axum::http::Request::builder().body(Body::empty()).unwrap();
        let rejection = extract_name(request).await.unwrap_err();
        assert!(matches!(rejection, ValidationRejection::MissingApplicationName));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_application_name_not_ascii() {
        let value = axum::http::HeaderValue::from_bytes(&[0xE2, 0x82, 0xAC]).unwrap();
        let request = axum::http::Request::builder()
            .header(APPLICATION_NAME_HEADER, value)
            .body(Body::empty())
            .unwrap();
        let rejection = extract_name(request).await.unwrap_err();
        assert!(matches!(rejection, ValidationRejection::InvalidApplicationName));
    }

    #[tokio::test]
    async fn test_json_body_malformed() {
        let request = axum::http::Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let result = JsonBody::<serde_json::Value>::from_request(request, &()).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

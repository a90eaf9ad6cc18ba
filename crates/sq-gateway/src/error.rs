//! Unified API error type with Axum `IntoResponse` support.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::catalog::CatalogError;
use crate::inference::InferenceError;

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("completion upstream error: {0}")]
    UpstreamCompletion(String),

    #[error("model output error: {0}")]
    ModelOutput(String),

    #[error("catalog upstream error: {0}")]
    UpstreamCatalog(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamCompletion(_) => StatusCode::BAD_GATEWAY,
            ApiError::ModelOutput(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamCatalog(_) => StatusCode::BAD_GATEWAY,
        };

        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Parse(_) => ApiError::ModelOutput(err.to_string()),
            InferenceError::Request(_) | InferenceError::Status { .. } => {
                ApiError::UpstreamCompletion(err.to_string())
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::UpstreamCatalog(err.to_string())
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn bad_request_response() {
        let err = ApiError::BadRequest("missing query".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 400);
        assert!(json["error"].as_str().unwrap().contains("missing query"));
    }

    #[tokio::test]
    async fn completion_status_maps_to_bad_gateway() {
        let err: ApiError = InferenceError::Status {
            status: 500,
            body: "model 'mistral' not found".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("model 'mistral' not found"));
    }

    #[tokio::test]
    async fn parse_error_maps_to_internal() {
        let err: ApiError = InferenceError::Parse("no JSON object".into()).into();
        assert!(matches!(err, ApiError::ModelOutput(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn catalog_error_maps_to_bad_gateway() {
        let err: ApiError = CatalogError::Status(503).into();
        assert!(matches!(err, ApiError::UpstreamCatalog(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}

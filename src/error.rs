use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm::UpstreamError;

/// Message returned when the request body carries no usable `text` field.
pub const MISSING_TEXT: &str = "Missing 'text' in request body";

/// Startup failure. Never caught: it aborts process initialization.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration unavailable: {0}")]
    ConfigurationUnavailable(String),
}

impl ConfigError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ConfigurationUnavailable(message.into())
    }
}

/// Per-request failure, converted to an HTTP response at the handler boundary.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("{0}")]
    BadRequest(String),

    #[error("OpenAI API error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Invalid JSON from model: {0}")]
    MalformedModelOutput(#[from] serde_json::Error),

    #[error("Response schema validation failed: {}", errors.join("; "))]
    SchemaValidation { errors: Vec<String> },
}

impl TranslateError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Client input problems are 400, everything caused by the model is 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::MalformedModelOutput(_) | Self::SchemaValidation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Upstream(_) => "upstream_error",
            Self::MalformedModelOutput(_) => "malformed_model_output",
            Self::SchemaValidation { .. } => "schema_validation_error",
        }
    }
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        let body = json!({ "description": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let err = TranslateError::bad_request(MISSING_TEXT);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), MISSING_TEXT);
    }

    #[test]
    fn model_failures_map_to_500() {
        let upstream = TranslateError::from(UpstreamError::EmptyResponse);
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(upstream.to_string().starts_with("OpenAI API error: "));

        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let malformed = TranslateError::from(parse_err);
        assert_eq!(malformed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(malformed.to_string().starts_with("Invalid JSON from model: "));

        let schema = TranslateError::SchemaValidation {
            errors: vec!["a".into(), "b".into()],
        };
        assert_eq!(schema.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(schema.to_string(), "Response schema validation failed: a; b");
    }

    #[test]
    fn unavailable_config_message() {
        let err = ConfigError::unavailable("MODEL_WEIGHTS is not set");
        assert_eq!(
            err.to_string(),
            "configuration unavailable: MODEL_WEIGHTS is not set"
        );
    }
}

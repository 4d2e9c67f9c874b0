//! Error taxonomy for the web surface.
//!
//! Missing prerequisite state never lands here (handlers redirect instead);
//! what does land here maps onto a small set of status codes: bad plan
//! selections to 400, everything else to a generic 500 with the detail kept
//! server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use planfit_providers::ProviderError;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid plan selection: {0:?}")]
    InvalidPlanSelection(String),

    #[error("template render failed: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("server error: {0}")]
    Server(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::InvalidPlanSelection(value) => {
                tracing::warn!(value = %value, "rejected plan selection");
                (StatusCode::BAD_REQUEST, "Invalid plan selection").into_response()
            }
            WebError::Provider(error) => {
                tracing::error!("error generating content: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error generating content.").into_response()
            }
            other => {
                tracing::error!("request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selection_is_400() {
        let response = WebError::InvalidPlanSelection("banana".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_failure_is_500() {
        let error = WebError::Provider(ProviderError::Unavailable {
            provider: "gemini".to_string(),
        });
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

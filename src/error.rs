use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::completion::CompletionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Server is not configured: missing AI_API_KEY")]
    MissingCredential,

    /// Non-success reply from the completion endpoint. Status and body are
    /// handed back to the caller unchanged.
    #[error("Upstream error: {status}")]
    Upstream { status: u16, body: String },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::NotConfigured => AppError::MissingCredential,
            CompletionError::Upstream { status, body } => AppError::Upstream {
                status: status.as_u16(),
                body,
            },
            CompletionError::Network(err) => AppError::InternalError(anyhow::Error::new(err)),
            CompletionError::Decode(err) => AppError::InternalError(anyhow::Error::new(err)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            detail: Option<String>,
        }

        let (status, error_message, detail) = match self {
            AppError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server is not configured: missing AI_API_KEY".to_string(),
                None,
            ),
            AppError::Upstream { status, body } => {
                let error_message = if body.is_empty() {
                    "upstream_error".to_string()
                } else {
                    body
                };
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    error_message,
                    None,
                )
            }
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error".to_string(),
                Some(err.to_string()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                detail,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_credential_is_a_500_with_a_stable_message() {
        let (status, body) = response_parts(AppError::MissingCredential).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({ "error": "Server is not configured: missing AI_API_KEY" })
        );
    }

    #[tokio::test]
    async fn upstream_error_keeps_status_and_body() {
        let (status, body) = response_parts(AppError::Upstream {
            status: 429,
            body: "rate limited".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body, serde_json::json!({ "error": "rate limited" }));
    }

    #[tokio::test]
    async fn empty_upstream_body_gets_a_placeholder() {
        let (status, body) = response_parts(AppError::Upstream {
            status: 502,
            body: String::new(),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, serde_json::json!({ "error": "upstream_error" }));
    }

    #[tokio::test]
    async fn internal_error_carries_detail() {
        let (status, body) =
            response_parts(AppError::InternalError(anyhow::anyhow!("connection reset"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "server_error");
        assert_eq!(body["detail"], "connection reset");
    }
}

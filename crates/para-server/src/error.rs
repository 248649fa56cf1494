use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use para_core::openai::ChatClientError;
use para_core::{AnalysisError, RemoteError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] ChatClientError),

    #[error("{0}")]
    RateLimited(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Analysis(AnalysisError::Remote(RemoteError::Client(e))) if e.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::Analysis(AnalysisError::Remote(_)) => StatusCode::BAD_GATEWAY,
            Self::Analysis(_) | Self::Config(_) | Self::Client(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::RateLimited("slow down".into()).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::from(AnalysisError::Remote(RemoteError::MissingContent)).status(),
            StatusCode::BAD_GATEWAY
        );
        let upstream = ChatClientError::Upstream {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".into(),
        };
        assert_eq!(
            AppError::from(AnalysisError::Remote(RemoteError::Client(upstream))).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(AnalysisError::Internal("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

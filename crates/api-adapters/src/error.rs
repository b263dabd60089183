//! HTTP error mapping.
//!
//! Response bodies carry only the status reason; details go to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domains::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or replayed one-time token, malformed form, unsupported method
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No caller identity from the upstream authenticator
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidToken => ApiError::BadRequest(err.to_string()),
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
            DomainError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        let body = status.canonical_reason().unwrap_or("Error");
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::PostId;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = [
            (DomainError::InvalidToken, StatusCode::BAD_REQUEST),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::NotFound(PostId(1)), StatusCode::NOT_FOUND),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_details_stay_out_of_response() {
        let resp = ApiError::Internal("db password is hunter2".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Internal Server Error");
    }
}

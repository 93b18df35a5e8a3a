use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Application error taxonomy. Every failure funnels through this type so
/// clients always receive the same `{"success": false, "message": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} already exists, please Login to continue")]
    Duplicate(String),
    /// Server-side failure with a client-safe message (e.g. OTP delivery).
    #[error("{0}")]
    Server(String),
    /// Failure talking to the model service. Carries the upstream status and
    /// message when the upstream responded, otherwise a generic 502.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Duplicate(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Server(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn service_unavailable() -> Self {
        ApiError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            message: "Model service unavailable".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            error!(error = %e, "internal error");
        }
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                // constraint names look like "users_email_key"
                let field = db
                    .constraint()
                    .and_then(|c| c.split('_').nth(1))
                    .unwrap_or("record")
                    .to_string();
                ApiError::Duplicate(field)
            }
            _ => ApiError::Internal(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn error_body_has_uniform_shape() {
        let (status, json) = body_json(ApiError::BadRequest("Email is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Email is required");
    }

    #[tokio::test]
    async fn duplicate_mentions_field_and_maps_to_400() {
        let (status, json) = body_json(ApiError::Duplicate("email".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "email already exists, please Login to continue"
        );
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let (status, json) = body_json(ApiError::Internal(anyhow::anyhow!("pg down"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn upstream_passes_through_status() {
        let (status, json) = body_json(ApiError::service_unavailable()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["message"], "Model service unavailable");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, instrument};

use crate::error::ApiError;

// Scoring and analytics calls can take a long time on the model side.
const FORWARD_TIMEOUT: Duration = Duration::from_secs(120);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the external model service. Owns transport details only:
/// timeouts, error mapping and JSON decoding. Responses are relayed verbatim.
#[derive(Clone)]
pub struct ModelClient {
    client: Client,
    base_url: String,
}

impl ModelClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET the model service health endpoint with a short timeout.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/v1/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "model health check failed");
                ApiError::service_unavailable()
            })?;
        if !response.status().is_success() {
            return Err(ApiError::service_unavailable());
        }
        response
            .json()
            .await
            .map_err(|_| ApiError::service_unavailable())
    }

    /// POST a payload to the model service and relay the JSON response.
    /// Transport failures and timeouts become a generic 502; upstream error
    /// bodies pass their own status and detail/message through.
    #[instrument(skip(self, body))]
    pub async fn forward_post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .timeout(FORWARD_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, path, "model service request failed");
                ApiError::service_unavailable()
            })?;

        let status = response.status();
        if !status.is_success() {
            let upstream: Option<serde_json::Value> = response.json().await.ok();
            return Err(upstream_error(status, upstream.as_ref()));
        }

        response.json().await.map_err(|e| {
            error!(error = %e, path, "model service returned invalid JSON");
            ApiError::service_unavailable()
        })
    }
}

/// Maps a non-2xx upstream response to the local taxonomy: pass the
/// upstream's own `detail` or `message` through when present, otherwise
/// fall back to a generic unavailability error.
fn upstream_error(status: reqwest::StatusCode, body: Option<&serde_json::Value>) -> ApiError {
    let message = body
        .and_then(|b| {
            b.get("detail")
                .or_else(|| b.get("message"))
                .and_then(|v| v.as_str())
        })
        .map(str::to_string);

    match message {
        Some(message) => ApiError::Upstream {
            status: StatusCode::from_u16(status.as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            message,
        },
        None => ApiError::service_unavailable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upstream_detail_is_passed_through() {
        let body = json!({ "detail": "scoring engine exploded" });
        let err = upstream_error(reqwest::StatusCode::UNPROCESSABLE_ENTITY, Some(&body));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "scoring engine exploded");
    }

    #[test]
    fn upstream_message_is_used_when_detail_missing() {
        let body = json!({ "message": "bad payload" });
        let err = upstream_error(reqwest::StatusCode::BAD_REQUEST, Some(&body));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "bad payload");
    }

    #[test]
    fn missing_detail_falls_back_to_generic_502() {
        let body = json!({ "unexpected": true });
        let err = upstream_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, Some(&body));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Model service unavailable");
    }

    #[test]
    fn missing_body_falls_back_to_generic_502() {
        let err = upstream_error(reqwest::StatusCode::BAD_GATEWAY, None);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Model service unavailable");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ModelClient::new("http://model:8000/").unwrap();
        assert_eq!(client.base_url, "http://model:8000");
    }
}

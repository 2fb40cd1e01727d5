// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the delivery notification webhook.

use std::time::Duration;

use async_trait::async_trait;
use proofline_core::{NotificationChannel, NotificationRequest, NotificationResponse, ProoflineError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

/// Posts notification requests to a configured endpoint.
///
/// The channel never retries; the dispatcher treats every failure as final.
#[derive(Debug, Clone)]
pub struct HttpNotificationChannel {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotificationChannel {
    /// Creates a channel for `endpoint`.
    ///
    /// # Arguments
    /// * `endpoint` - Absolute http(s) URL of the webhook
    /// * `secret` - Optional bearer token sent in `Authorization`
    /// * `timeout` - Per-request timeout, covering connect and body
    pub fn new(
        endpoint: impl Into<String>,
        secret: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ProoflineError> {
        let endpoint = endpoint.into();
        reqwest::Url::parse(&endpoint)
            .map_err(|e| ProoflineError::Config(format!("invalid notification endpoint: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(secret) = secret {
            let mut value = HeaderValue::from_str(&format!("Bearer {secret}")).map_err(|e| {
                ProoflineError::Config(format!("invalid notification secret header value: {e}"))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ProoflineError::Notification {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationChannel for HttpNotificationChannel {
    async fn notify(
        &self,
        request: &NotificationRequest,
    ) -> Result<NotificationResponse, ProoflineError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ProoflineError::Notification {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProoflineError::Notification {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(status, order_id = %request.order_id, "notification response received");
        Ok(interpret_response(status, &body))
    }
}

/// Interprets a webhook reply.
///
/// A JSON object is taken as `{ok, status, error}`; a missing `status` is
/// filled from the HTTP status and `ok` is forced false for non-2xx replies.
/// Anything else becomes `{ok: false, status, body}`.
pub fn interpret_response(status: u16, body: &str) -> NotificationResponse {
    let http_ok = (200..300).contains(&status);
    match serde_json::from_str::<NotificationResponse>(body) {
        Ok(mut parsed) => {
            if parsed.status == 0 {
                parsed.status = status;
            }
            parsed.ok = parsed.ok && http_ok;
            parsed
        }
        Err(_) => NotificationResponse {
            ok: false,
            status,
            error: None,
            body: Some(body.to_string()),
        },
    }
}

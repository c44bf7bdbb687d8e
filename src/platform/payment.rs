//! Payment delivery to the platform callback endpoint.

use log::{debug, error, info, warn};
use reqwest::StatusCode;

use super::{sign_body, PlatformApi};
use crate::error::{ProcessError, Result};
use crate::models::PlatformPayload;
use crate::retry::{backoff_delay, is_transient};

impl PlatformApi {
    /// Serializes the payload once, signs those exact bytes and POSTs them.
    ///
    /// The serialized form is canonical (compact separators, declaration
    /// field order), so signing and transmission can never drift apart.
    pub async fn send_payment(&self, payload: &PlatformPayload) -> Result<serde_json::Value> {
        let body = serde_json::to_string(payload)?;
        let signature = sign_body(&self.secret_key, &body);
        let endpoint = format!("{}/api/amo/payment/callback", self.base_url);

        info!("Sending POST {endpoint}");
        debug!("Request body: {body}");
        debug!("Signature: {signature}");

        let mut attempt = 1u32;
        loop {
            let result = self
                .client
                .post(&endpoint)
                .header("X-API-KEY", &signature)
                .header("Content-Type", "application/json")
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        info!("Platform response: {status}");
                        let text = response.text().await.unwrap_or_default();
                        debug!("Response body: {text}");
                        if text.trim().is_empty() {
                            return Ok(serde_json::json!({ "status": "success" }));
                        }
                        return Ok(serde_json::from_str(&text)?);
                    }

                    let text = response.text().await.unwrap_or_default();
                    error!("Platform API error {status}: {text}");
                    if !is_transient(status) || attempt >= self.max_retry_attempts {
                        return Err(ProcessError::HttpStatus(status));
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!("Platform rate limit exceeded, retrying...");
                    }
                }
                Err(e) => {
                    error!("Platform request failed: {e}");
                    if attempt >= self.max_retry_attempts {
                        return Err(ProcessError::Network(e));
                    }
                }
            }

            tokio::time::sleep(backoff_delay(attempt)).await;
            attempt += 1;
        }
    }
}

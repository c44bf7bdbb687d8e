//! Learning platform client module.
//!
//! Sends the payment callback with an HMAC-SHA256 signature over the exact
//! serialized body.

mod payment;
mod signature;

pub use signature::sign_body;

use reqwest::Client;
use std::time::Duration;

use crate::settings::Settings;

/// Platform API client.
pub struct PlatformApi {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) secret_key: String,
    pub(crate) max_retry_attempts: u32,
}

impl PlatformApi {
    pub fn new(settings: &Settings) -> Self {
        log::info!("Creating platform API client for {}", settings.platform_url);
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            base_url: settings.platform_url.clone(),
            secret_key: settings.api_secret_key.clone(),
            max_retry_attempts: settings.max_retry_attempts,
        }
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

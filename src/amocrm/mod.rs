//! amoCRM API client module.
//!
//! Fetches leads and contacts over the v4 REST API and flattens amoCRM's
//! custom-field representation into plain id -> value lookups.

mod custom_fields;
mod leads;

pub use custom_fields::{extract_deal_data, flatten_custom_fields};
pub use leads::LeadWithContact;

use reqwest::Client;
use std::time::Duration;

use crate::settings::Settings;

/// amoCRM API client, bearer-token authenticated.
pub struct AmoCrmApi {
    pub(crate) client: Client,
    pub(crate) access_token: String,
    pub(crate) base_url: String,
    pub(crate) max_retry_attempts: u32,
}

impl AmoCrmApi {
    pub fn new(settings: &Settings) -> Self {
        log::info!("Creating amoCRM API client for {}", settings.amo_base_url);
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            access_token: settings.amo_long_live_token.clone(),
            base_url: settings.amo_base_url.clone(),
            max_retry_attempts: settings.max_retry_attempts,
        }
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

//! Lead and contact retrieval with the bounded retry policy.

use log::{debug, error, info, warn};
use reqwest::StatusCode;

use super::AmoCrmApi;
use crate::error::{ProcessError, Result};
use crate::models::{Contact, Lead};
use crate::retry::{backoff_delay, is_transient};

/// A lead together with its first linked contact.
#[derive(Debug)]
pub struct LeadWithContact {
    pub lead: Lead,
    pub contact: Contact,
}

impl AmoCrmApi {
    /// Fetches the lead with its embedded contact list, then the first
    /// contact's full record.
    pub async fn get_lead_with_contact(&self, lead_id: u64) -> Result<LeadWithContact> {
        info!("Fetching lead {lead_id} with contact data");

        let lead: Lead = self
            .get(&format!("/api/v4/leads/{lead_id}"), &[("with", "contacts")])
            .await
            .map_err(|e| match e {
                ProcessError::HttpStatus(status) if status == StatusCode::NOT_FOUND => {
                    ProcessError::LeadNotFound(lead_id)
                }
                other => other,
            })?;

        let contact_id = lead
            .embedded
            .as_ref()
            .and_then(|embedded| embedded.contacts.first())
            .map(|contact| contact.id)
            .ok_or(ProcessError::NoContactsForLead(lead_id))?;

        info!("Found contact {contact_id} for lead {lead_id}");

        let contact: Contact = self
            .get(&format!("/api/v4/contacts/{contact_id}"), &[])
            .await
            .map_err(|e| match e {
                ProcessError::HttpStatus(status) if status == StatusCode::NOT_FOUND => {
                    ProcessError::ContactNotFound(contact_id)
                }
                other => other,
            })?;

        Ok(LeadWithContact { lead, contact })
    }

    /// GET an API endpoint, retrying rate limits and server errors up to the
    /// configured ceiling with exponential backoff.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        info!("amoCRM API request: GET {url}");

        let mut attempt = 1u32;
        loop {
            let result = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.access_token))
                .header("Content-Type", "application/json")
                .query(params)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        info!("amoCRM API response: {status}");
                        let text = response.text().await?;
                        debug!("Response body: {text}");
                        return Ok(serde_json::from_str(&text)?);
                    }

                    let body = response.text().await.unwrap_or_default();
                    error!("amoCRM API error {status}: {body}");
                    if !is_transient(status) || attempt >= self.max_retry_attempts {
                        return Err(ProcessError::HttpStatus(status));
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!("amoCRM rate limit exceeded, retrying...");
                    }
                }
                Err(e) => {
                    error!("amoCRM request failed: {e}");
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

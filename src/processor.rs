//! Processor for the amoCRM "Invoices/purchases" catalog webhook.
//!
//! One invocation runs classification -> enrichment -> mapping -> delivery,
//! synchronously and exactly once. Irrelevant events terminate early as
//! [`WebhookOutcome::Ignored`]; real failures travel as `ProcessError`.

use std::collections::HashMap;

use log::{info, warn};
use serde_json::Value;

use crate::amocrm::{extract_deal_data, AmoCrmApi};
use crate::error::Result;
use crate::mapping::{EnumTables, PaymentPayloadMapper};
use crate::models::InvoiceLine;
use crate::platform::PlatformApi;
use crate::settings::Settings;
use crate::webhook_parser::CatalogEventParser;

/// Terminal outcome of a single webhook invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// Event is not relevant; reported as a soft "ignored" status.
    Ignored { reason: &'static str },
    /// Payment forwarded to the platform.
    Success {
        catalog_element_id: Option<u64>,
        lead_id: u64,
        platform_response: Value,
    },
}

/// Webhook processor wiring the parser, both API clients and the mapping
/// tables together.
pub struct CatalogWebhookProcessor {
    settings: Settings,
    amo_client: AmoCrmApi,
    platform_client: PlatformApi,
    tables: EnumTables,
}

impl CatalogWebhookProcessor {
    pub fn new(settings: Settings) -> Self {
        let amo_client = AmoCrmApi::new(&settings);
        let platform_client = PlatformApi::new(&settings);
        let tables = EnumTables::new(&settings);
        Self {
            settings,
            amo_client,
            platform_client,
            tables,
        }
    }

    /// Processes one decoded webhook body end to end.
    pub async fn process(&self, fields: &HashMap<String, Vec<String>>) -> Result<WebhookOutcome> {
        let Some(parser) = CatalogEventParser::detect(fields) else {
            warn!("Webhook is not a catalog event");
            return Ok(WebhookOutcome::Ignored {
                reason: "not_catalog_event",
            });
        };
        info!("Detected catalog event: {}", parser.event_type().as_str());

        if !parser.is_paid(self.settings.amo_bill_status_paid) {
            info!("Invoice is not paid, skipping");
            return Ok(WebhookOutcome::Ignored { reason: "not_paid" });
        }

        let catalog_element_id = parser.catalog_element_id();
        let lead_id = parser.lead_id();
        let items = parser.items();
        let amount = parser.total_amount();

        let Some(lead_id) = lead_id else {
            warn!("Could not extract lead_id from webhook");
            return Ok(WebhookOutcome::Ignored {
                reason: "missing_lead_id",
            });
        };
        if items.is_empty() {
            warn!("Could not extract invoice items from webhook");
            return Ok(WebhookOutcome::Ignored {
                reason: "missing_items",
            });
        }

        info!(
            "Detected payment: catalog_element_id={catalog_element_id:?}, lead_id={lead_id}, items_count={}, amount={amount}",
            items.len()
        );

        let line_total: i64 = items.iter().map(|item| item.unit_price).sum();
        if line_total != amount {
            warn!(
                "Invoice total {amount} differs from item price sum {line_total}; keeping the invoice total"
            );
        }

        let platform_response = self.forward_payment(lead_id, &items, amount).await?;

        Ok(WebhookOutcome::Success {
            catalog_element_id,
            lead_id,
            platform_response,
        })
    }

    /// Loads the client data from amoCRM, maps it and delivers the payment.
    async fn forward_payment(
        &self,
        lead_id: u64,
        items: &[InvoiceLine],
        amount: i64,
    ) -> Result<Value> {
        info!("Processing payment for lead_id={lead_id}");

        let lead_with_contact = self.amo_client.get_lead_with_contact(lead_id).await?;
        let deal = extract_deal_data(
            &lead_with_contact.lead,
            &lead_with_contact.contact,
            &self.settings,
        );
        info!("Client data loaded: {:?}", deal.contact_email);

        let mapper = PaymentPayloadMapper::new(&self.tables);
        let payload = mapper.map_to_platform_payload(items, amount, &deal)?;

        let response = self.platform_client.send_payment(&payload).await?;
        info!("Payment forwarded to platform: {response}");

        Ok(response)
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;

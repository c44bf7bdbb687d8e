//! amoCRM Payment Webhook service.
//!
//! Receives the amoCRM "Invoices/purchases" catalog webhook, detects paid
//! invoices, enriches them with lead and contact data from the amoCRM API
//! and forwards a signed payment payload to the learning platform.

pub mod amocrm;
pub mod error;
pub mod mapping;
pub mod models;
pub mod note_parser;
pub mod platform;
pub mod processor;
mod retry;
pub mod settings;
pub mod web;
pub mod webhook_parser;

pub use error::{ProcessError, Result};
pub use models::{CatalogEvent, InvoiceLine, PlatformPayload};
pub use processor::{CatalogWebhookProcessor, WebhookOutcome};
pub use settings::Settings;

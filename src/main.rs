//! amoCRM Payment Webhook service binary.
//!
//! Reads the configuration from the environment, wires the processor and
//! serves the webhook endpoint.

use std::sync::Arc;

use amo_payment_webhook::{CatalogWebhookProcessor, Settings};
use clap::Parser;

/// amoCRM payment webhook service - forwards paid invoices to the platform
#[derive(Parser, Debug)]
#[command(name = "amo_payment_webhook")]
#[command(version, about, long_about = None)]
struct Args {
    /// Port for the HTTP server
    #[arg(short, long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            log::error!("Configuration error: {e:#}");
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.clone()),
    )
    .init();

    log::info!("Starting amoCRM payment webhook service...");
    log::info!("AMO_BASE_URL: {}", settings.amo_base_url);
    log::info!("PLATFORM_URL: {}", settings.platform_url);
    log::info!("LOG_LEVEL: {}", settings.log_level);

    let processor = Arc::new(CatalogWebhookProcessor::new(settings));

    if let Err(e) = amo_payment_webhook::web::serve(processor, args.port).await {
        log::error!("Server error: {e}");
        std::process::exit(1);
    }
}

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reconciliation_cell::{build_reconciler, Reconciler, TriggerEvent};
use shared_config::AppConfig;
use shared_database::RestStore;

/// One invocation reconciles one triggering event: the event JSON comes
/// from the path given as the first argument, or stdin when none is
/// given. Any failure exits non-zero so the host scheduler retries the
/// whole run.
#[tokio::main]
async fn main() -> ExitCode {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting reconciliation invocation");

    let raw_event = match read_event() {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to read event payload: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let payload: serde_json::Value = match serde_json::from_str(&raw_event) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Event payload is not valid JSON: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(event) = TriggerEvent::from_json(&payload) else {
        info!("Event not recognized as a reconciliation trigger, nothing to do");
        return ExitCode::SUCCESS;
    };

    let config = AppConfig::from_env();
    let store = Arc::new(RestStore::new(&config));
    let reconciler = match build_reconciler(&config, store) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("Failed to build reconciler: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match reconciler.handle(event).await {
        Ok(()) => {
            info!("Reconciliation invocation complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Reconciliation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn read_event() -> anyhow::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

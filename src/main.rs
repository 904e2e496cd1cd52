use module_events::{
    bind_registry, config::RegistryConfig, ConsumerDescriptor, DelayOptions, EventOptions,
    RegistryError, SharedRegistry,
};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), RegistryError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "module_events=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting event registry demo");

    let config = RegistryConfig::new();
    let shared: SharedRegistry<Value> = SharedRegistry::from_config(&config);

    shared.on(EventOptions::new("Header", "title"), |payload: &Value| {
        info!(payload = %payload, "Header received title");
        Ok(())
    });

    let sidebar = bind_registry::<Value>(&ConsumerDescriptor::function("Sidebar"));
    sidebar.on("toggle", |payload: &Value| {
        info!(payload = %payload, "Sidebar toggled");
        Ok(())
    });

    shared.emit(EventOptions::new("Header", "title"), json!("Dashboard"))?;
    shared.emit(EventOptions::new("Footer", "title"), json!("nobody listens"))?;
    sidebar.emit("toggle", json!({ "open": true }))?;

    sidebar.emit_delay(
        DelayOptions::new(EventOptions::new("ignored", "toggle").once()).with_timeout(50),
        json!({ "open": false }),
    )?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    shared.off_by_module(vec!["Header"])?;
    info!(modules = ?shared.module_names(), "Demo finished");

    Ok(())
}

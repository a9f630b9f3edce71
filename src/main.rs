//! Device mapping service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use device_mapping::api::{create_router, AppState};
use device_mapping::config::Config;
use device_mapping::handler::DeviceMappingService;
use device_mapping::mapping::{InMemoryMappingStore, MappingStore};
use device_mapping::metrics;
use device_mapping::notify::{Notifier, WebhookNotifier};
use device_mapping::utils::shutdown_signal;

/// Device to phone number mapping service.
#[derive(Parser, Debug)]
#[command(name = "device-mapping")]
#[command(about = "Stores device to phone number mappings and announces new ones")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("device_mapping=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        None => cmd_serve(args.port).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DEVICE MAPPING SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Store: {}", InMemoryMappingStore::new(&config.dynamodb_table).backend());
    println!("  Table: {}", config.dynamodb_table);
    match config.topic() {
        Some(topic) => {
            println!("  Notifications: Enabled");
            println!("  Topic: {}", topic);
            if let Some(url) = &config.notify_webhook_url {
                println!("  Webhook: {}", url);
            }
            println!("  Publish Timeout: {}ms", config.notify_timeout_ms);
        }
        None => println!("  Notifications: Disabled"),
    }
    println!("  Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let store: Arc<dyn MappingStore> = Arc::new(InMemoryMappingStore::new(&config.dynamodb_table));
    info!("Mapping store: {}, table {}", store.backend(), store.table_name());

    let notifier = WebhookNotifier::from_config(&config)?;
    match &notifier {
        Some(n) => info!("Notifications: topic {} via {}", n.topic(), n.url()),
        None => info!("Notifications: disabled"),
    }
    let notifier = notifier.map(|n| Arc::new(n) as Arc<dyn Notifier>);

    let service = DeviceMappingService::new(store, notifier);
    let mut app_state = AppState::new(service);

    match metrics::init_metrics() {
        Ok(handle) => app_state = app_state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

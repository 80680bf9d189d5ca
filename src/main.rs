//! Status board entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use status_board::api::{serve, AppState};
use status_board::config::Config;
use status_board::metrics;
use status_board::probe::HealthProbe;
use status_board::process::{LiveProcessMetrics, ProcessMetrics};
use status_board::service::{HealthReport, RuntimeStatus};
use status_board::utils::shutdown_signal;

/// Diagnostic status service.
#[derive(Parser, Debug)]
#[command(name = "status-board")]
#[command(about = "Health, status and dashboard pages for a running service")]
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
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print one process metrics sample as JSON.
    Snapshot,

    /// Query the health check of a running instance.
    Probe {
        /// Base URL of the instance.
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("status_board=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Snapshot) => cmd_snapshot(),
        Some(Command::Probe { url }) => cmd_probe(&url).await,
        None => cmd_serve(args.port).await,
    }
}

/// Run the HTTP server until Ctrl-C or SIGTERM.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    let mut app_state = AppState::from_config(&config).map_err(|e| {
        error!("Failed to initialize: {}", e);
        e
    })?;

    // Initialize metrics
    match metrics::install_prometheus() {
        Ok(handle) => app_state = app_state.with_prometheus(handle),
        Err(e) => warn!("Prometheus recorder not installed: {}", e),
    }

    info!(
        service = %config.service_name,
        version = %config.app_version,
        environment = %config.app_env,
        "Configuration loaded successfully"
    );

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    serve(addr, app_state, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("STATUS BOARD - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
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

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Check templates compile
    print!("Compiling templates... ");
    match status_board::views::ViewRenderer::new() {
        Ok(_) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Template compilation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Service: {} v{}", config.service_name, config.app_version);
    println!("  Environment: {}", config.app_env);
    println!("  Port: {}", config.port);
    println!("  Set Status Delay: {}ms", config.set_status_delay_ms);
    println!("  Health Memory Limit: {} MiB", config.health_memory_limit_mb);
    println!("  Log Level: {}", config.rust_log);
    println!("  Verbose: {}", config.verbose);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print one metrics sample of this process.
fn cmd_snapshot() -> anyhow::Result<()> {
    let config = Config::load()?;
    let snapshot = LiveProcessMetrics::new().sample()?;

    let output = json!({
        "runtime": RuntimeStatus::from_snapshot(&snapshot, &config.app_version),
        "health": HealthReport::evaluate(&snapshot, config.health_memory_limit_bytes()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Probe a running instance; fails when it reports unhealthy.
async fn cmd_probe(url: &str) -> anyhow::Result<()> {
    let probe = HealthProbe::new(url)?;
    let outcome = probe.check().await?;

    println!("{}", serde_json::to_string_pretty(&outcome.body)?);

    if outcome.is_healthy() {
        info!("{} is healthy", url);
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} is unhealthy (HTTP {}): {}",
            url,
            outcome.status.as_u16(),
            outcome.body["message"].as_str().unwrap_or("no message")
        ))
    }
}

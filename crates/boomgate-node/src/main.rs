//! Parking lane access node.
//!
//! One barrier gate, one credential reader, three monitored spots, one
//! status panel. The node authorizes scans against a configured allow
//! list, opens and closes the gate around passing vehicles, and reports
//! spot availability on the panel and over telemetry.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use boomgate_node::config::NodeConfig;
use boomgate_node::cycle::{ControlCycle, Peripherals};
use boomgate_node::sim;
use boomgate_telemetry::TelemetryClient;

/// Parking lane access and occupancy node
#[derive(Parser, Debug)]
#[command(name = "boomgate-node", version, about)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the control cycle period from the config file
    #[arg(long, value_name = "MS")]
    period_ms: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the lane node
    Run,

    /// Drive the node from an interactive stdin script
    Simulate,
}

/// Initialize structured logging. `RUST_LOG` wins over the `-v` flags.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };
    if let Some(period_ms) = cli.period_ms {
        config.cycle.period_ms = period_ms;
    }
    info!(
        close_threshold_cm = config.gate.close_threshold_cm,
        open_settle_ms = config.gate.open_settle_ms,
        close_delay_ms = config.gate.close_delay_ms,
        period_ms = config.cycle.period_ms,
        credentials = config.access.allowed.len(),
        telemetry = config.telemetry.is_some(),
        "config_loaded"
    );

    match cli.command {
        Commands::Run => run(config).await,
        Commands::Simulate => simulate(config).await,
    }
}

/// Connect the telemetry client if the config asks for one. An unreachable
/// endpoint downgrades to running without publishing; it is not fatal.
async fn attach_telemetry(cycle: ControlCycle, config: &NodeConfig) -> ControlCycle {
    let Some(client_config) = config.telemetry_client_config() else {
        return cycle;
    };

    let mut client = TelemetryClient::new(client_config);
    match client.connect().await {
        Ok(()) => cycle.with_telemetry(client),
        Err(e) => {
            warn!(
                "Telemetry endpoint unreachable: {} - running without publishing",
                e
            );
            cycle
        }
    }
}

async fn run(config: NodeConfig) -> anyhow::Result<()> {
    // Mock peripherals stand in until the GPIO and I2C backends land
    warn!("Hardware backends not wired yet - running against mock peripherals");
    let (peripherals, _handles) = Peripherals::mock();

    let cycle = ControlCycle::new(peripherals, &config)?;
    let mut cycle = attach_telemetry(cycle, &config).await;
    cycle.bring_up().await?;

    tokio::select! {
        _ = cycle.run() => {}
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    cycle.shutdown().await;
    info!("Lane node stopped");
    Ok(())
}

async fn simulate(config: NodeConfig) -> anyhow::Result<()> {
    let (peripherals, handles) = Peripherals::mock();

    let cycle = ControlCycle::new(peripherals, &config)?;
    let mut cycle = attach_telemetry(cycle, &config).await;
    cycle.bring_up().await?;

    sim::run(cycle, handles).await
}

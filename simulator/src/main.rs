//! Lockstep Simulator
//!
//! Load generator and invariant checker for the in-memory transfer ledger.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod controller;
mod metrics;
mod scenario;

use controller::{SimulationConfig, SimulationController};
use scenario::Scenario;

/// Lockstep simulator CLI.
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(
    about = "Drives concurrent transfers against an in-memory ledger and verifies its invariants"
)]
struct Args {
    /// Number of accounts to create
    #[arg(short, long, default_value = "8")]
    accounts: usize,

    /// Number of concurrent workers
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Transfers per worker
    #[arg(short, long, default_value = "1000")]
    transfers: usize,

    /// Initial balance minted into every account
    #[arg(long, default_value = "10000")]
    initial_balance: u64,

    /// Maximum random transfer amount (inclusive)
    #[arg(long, default_value = "100")]
    max_amount: u64,

    /// Scenario to run: random, cycle or hot-pair
    #[arg(short, long, default_value = "random")]
    scenario: String,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let scenario = Scenario::load(&args.scenario)?;
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = SimulationConfig {
        accounts: args.accounts,
        workers: args.workers,
        transfers_per_worker: args.transfers,
        initial_balance: args.initial_balance,
        max_amount: args.max_amount,
        scenario,
        seed,
    };
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!("Starting Lockstep simulator");
    info!("Scenario: {} ({})", scenario.name(), scenario.description());
    info!("Accounts: {}", args.accounts);
    info!("Workers: {}", args.workers);
    info!("Seed: {}", seed);

    let controller = SimulationController::new(config);
    let report = controller.run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!("Simulation complete");
        info!("Attempted: {}", report.metrics.transfers_attempted);
        info!("Committed: {}", report.metrics.transfers_committed);
        info!(
            "Rejected (insufficient funds): {}",
            report.metrics.rejected_insufficient_funds
        );
        info!(
            "Notifications delivered: {}",
            report.metrics.notifications_delivered
        );
        info!("Success rate: {:.1}%", report.metrics.success_rate() * 100.0);
        info!("Total balance: {}", report.total_balance);
        info!("Elapsed: {}ms", report.elapsed_ms);
        info!("Throughput: {:.0} transfers/sec", report.throughput_per_sec);
    }

    Ok(())
}

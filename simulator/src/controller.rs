//! Simulation controller.

use std::sync::Arc;
use std::time::Instant;

use anyhow::ensure;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use lockstep_common::AccountId;
use lockstep_ledger::{
    Account, AccountStore, NotificationError, NotificationPort, SharedAccountStore, TransferEngine,
};

use crate::metrics::{MetricsSnapshot, SharedTransferMetrics, TransferMetrics};
use crate::scenario::Scenario;

/// Simulation shape.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of accounts to create.
    pub accounts: usize,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Transfers each worker performs.
    pub transfers_per_worker: usize,
    /// Initial balance minted into every account.
    pub initial_balance: u64,
    /// Upper bound (inclusive) for random transfer amounts.
    pub max_amount: u64,
    /// Load shape.
    pub scenario: Scenario,
    /// Base seed; worker k derives its rng from seed + k.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            accounts: 8,
            workers: 4,
            transfers_per_worker: 1000,
            initial_balance: 10_000,
            max_amount: 100,
            scenario: Scenario::Random,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.accounts < 2 {
            return Err("At least 2 accounts are required".to_string());
        }
        if self.workers == 0 {
            return Err("At least 1 worker is required".to_string());
        }
        if self.transfers_per_worker == 0 {
            return Err("At least 1 transfer per worker is required".to_string());
        }
        if self.max_amount == 0 {
            return Err("Maximum transfer amount cannot be 0".to_string());
        }
        Ok(())
    }
}

/// Port adapter that counts deliveries into the shared metrics.
struct MetricsNotifier {
    metrics: SharedTransferMetrics,
}

#[async_trait]
impl NotificationPort for MetricsNotifier {
    async fn notify(&self, _account: &Account, _message: &str) -> Result<(), NotificationError> {
        self.metrics.notification_delivered();
        Ok(())
    }
}

/// Final report of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub scenario: &'static str,
    pub accounts: usize,
    pub workers: usize,
    pub transfers_per_worker: usize,
    pub seed: u64,
    pub elapsed_ms: u64,
    pub throughput_per_sec: f64,
    pub total_balance: Decimal,
    pub metrics: MetricsSnapshot,
}

/// Drives concurrent transfers against one store/engine pair and verifies
/// the ledger invariants afterwards.
pub struct SimulationController {
    config: SimulationConfig,
    store: SharedAccountStore,
    engine: Arc<TransferEngine>,
    metrics: SharedTransferMetrics,
}

impl SimulationController {
    /// Create a controller with a fresh store, engine and metrics.
    pub fn new(config: SimulationConfig) -> Self {
        let store: SharedAccountStore = Arc::new(AccountStore::with_capacity(config.accounts));
        let metrics: SharedTransferMetrics = Arc::new(TransferMetrics::new());
        let notifier = Arc::new(MetricsNotifier {
            metrics: Arc::clone(&metrics),
        });
        let engine = Arc::new(TransferEngine::new(Arc::clone(&store), notifier));

        Self {
            config,
            store,
            engine,
            metrics,
        }
    }

    /// Run the configured simulation and verify the end state.
    pub async fn run(&self) -> anyhow::Result<SimulationReport> {
        let account_ids = self.create_accounts()?;
        let minted =
            Decimal::from(self.config.initial_balance) * Decimal::from(self.config.accounts as u64);

        info!(
            accounts = self.config.accounts,
            workers = self.config.workers,
            transfers_per_worker = self.config.transfers_per_worker,
            scenario = self.config.scenario.name(),
            seed = self.config.seed,
            "Simulation starting"
        );

        let start = Instant::now();

        let mut handles = Vec::with_capacity(self.config.workers);
        for worker in 0..self.config.workers {
            let engine = Arc::clone(&self.engine);
            let metrics = Arc::clone(&self.metrics);
            let ids = account_ids.clone();
            let config = self.config.clone();
            handles.push(tokio::spawn(async move {
                run_worker(worker, engine, metrics, ids, config).await;
            }));
        }
        for handle in handles {
            handle.await?;
        }

        let elapsed = start.elapsed();
        self.verify(minted)?;

        let snapshot = self.metrics.snapshot();
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            snapshot.transfers_attempted as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Ok(SimulationReport {
            scenario: self.config.scenario.name(),
            accounts: self.config.accounts,
            workers: self.config.workers,
            transfers_per_worker: self.config.transfers_per_worker,
            seed: self.config.seed,
            elapsed_ms: elapsed.as_millis() as u64,
            throughput_per_sec: throughput,
            total_balance: self.store.total_balance(),
            metrics: snapshot,
        })
    }

    // --- Private methods ---

    fn create_accounts(&self) -> anyhow::Result<Vec<AccountId>> {
        let initial = Decimal::from(self.config.initial_balance);
        let ids: Vec<AccountId> = (0..self.config.accounts)
            .map(|index| AccountId::new(format!("ACC-{index:03}")))
            .collect();

        for id in &ids {
            self.store
                .create(Account::with_balance(id.clone(), initial))?;
        }

        info!(accounts = ids.len(), initial_balance = %initial, "Accounts created");
        Ok(ids)
    }

    /// Invariant checks over the quiescent store.
    fn verify(&self, minted: Decimal) -> anyhow::Result<()> {
        let snapshot = self.metrics.snapshot();
        let total = self.store.total_balance();

        ensure!(
            total == minted,
            "conservation violated: minted {minted}, ledger now holds {total}"
        );
        ensure!(
            snapshot.rejected_not_found == 0 && snapshot.rejected_invalid_amount == 0,
            "simulation produced rejections that indicate a driver bug: {snapshot:?}"
        );
        ensure!(
            snapshot.failed_other == 0,
            "simulation hit non-business failures: {snapshot:?}"
        );
        ensure!(
            snapshot.notifications_delivered == 2 * snapshot.transfers_committed,
            "expected two notifications per committed transfer, got {} for {} commits",
            snapshot.notifications_delivered,
            snapshot.transfers_committed
        );

        info!(total_balance = %total, "Ledger invariants verified");
        Ok(())
    }
}

/// One worker's transfer loop.
async fn run_worker(
    worker: usize,
    engine: Arc<TransferEngine>,
    metrics: SharedTransferMetrics,
    ids: Vec<AccountId>,
    config: SimulationConfig,
) {
    let mut rng = StdRng::seed_from_u64(config.seed + worker as u64);

    for iteration in 0..config.transfers_per_worker {
        let (from, to) = config
            .scenario
            .pick_pair(&mut rng, worker, iteration, ids.len());
        let amount = Decimal::from(rng.gen_range(1..=config.max_amount));

        metrics.transfer_attempted();
        match engine.transfer(amount, &ids[from], &ids[to]).await {
            Ok(_) => metrics.transfer_committed(),
            Err(error) => metrics.transfer_rejected(&error),
        }
    }
}

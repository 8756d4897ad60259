//! Simulation orchestrator — drives the round loop for one run

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

use chrono::Utc;
use dl_rules::{GameConfiguration, GameRules, PayoutSchedule, RulesResult, SimulationConfig};
use log::{info, warn};
use portable_atomic::AtomicF64;
use uuid::Uuid;

use crate::funding::PoolLedger;
use crate::results::{RoundResult, RunStatus, SimulationProgress, SimulationResult};
use crate::rng::DrawSource;
use crate::round::simulate_round;
use crate::summary::SimulationSummary;

/// Rounds between cooperative yields and progress reports
pub const YIELD_CADENCE_ROUNDS: u64 = 10;

/// Primitive state shared between the running loop and concurrent readers.
struct SharedState {
    stop: AtomicBool,
    running: AtomicBool,
    current_round: AtomicU64,
    jackpot_pool: AtomicF64,
    total_sales: AtomicF64,
    total_returned: AtomicF64,
    jackpot_hits: AtomicU64,
}

/// Cheap cloneable view of a running simulation.
///
/// Safe to poll from any thread while the loop runs: every accessor reads a
/// single primitive field, and `request_stop` only sets a flag the loop
/// checks at the next round boundary.
#[derive(Clone)]
pub struct EngineHandle {
    shared: Arc<SharedState>,
}

impl EngineHandle {
    /// Ask the run to stop at the next round boundary
    pub fn request_stop(&self) {
        self.shared.stop.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested
    pub fn stop_requested(&self) -> bool {
        self.shared.stop.load(Ordering::Relaxed)
    }

    /// Whether the round loop is currently executing
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Relaxed)
    }

    /// Rounds completed so far
    pub fn current_round(&self) -> u64 {
        self.shared.current_round.load(Ordering::Relaxed)
    }

    /// Live jackpot pool balance
    pub fn jackpot_pool(&self) -> f64 {
        self.shared.jackpot_pool.load(Ordering::Relaxed)
    }

    /// Live cumulative net sales
    pub fn total_sales_amount(&self) -> f64 {
        self.shared.total_sales.load(Ordering::Relaxed)
    }

    /// Live cumulative seller return
    pub fn total_returned_amount(&self) -> f64 {
        self.shared.total_returned.load(Ordering::Relaxed)
    }

    /// Live cumulative top-tier winners
    pub fn jackpot_hits(&self) -> u64 {
        self.shared.jackpot_hits.load(Ordering::Relaxed)
    }
}

/// Monte Carlo engine for one simulation run.
///
/// Owns every piece of mutable run state: the draw source, the funding
/// ledger, and the growing round-result list. The engine performs no I/O;
/// hosts watch a run through an [`EngineHandle`] and receive everything else
/// in the terminal [`SimulationResult`].
pub struct SimulationEngine {
    simulation_id: String,
    rules: GameRules,
    schedule: PayoutSchedule,
    config: SimulationConfig,
    rng: DrawSource,
    ledger: PoolLedger,
    round_results: Vec<RoundResult>,
    status: RunStatus,
    shared: Arc<SharedState>,
}

impl SimulationEngine {
    /// Build an engine from validated inputs.
    ///
    /// Both the rules and the run configuration are (re)validated here and
    /// the payout schedule is resolved, so every configuration error
    /// surfaces before the first round.
    pub fn new(rules: GameRules, config: SimulationConfig) -> RulesResult<Self> {
        config.validate()?;
        let schedule = PayoutSchedule::resolve(&rules)?;
        let ledger = PoolLedger::new(&rules.jackpot);
        let rng = DrawSource::new(config.seed);

        let shared = Arc::new(SharedState {
            stop: AtomicBool::new(false),
            running: AtomicBool::new(false),
            current_round: AtomicU64::new(0),
            jackpot_pool: AtomicF64::new(ledger.jackpot_pool()),
            total_sales: AtomicF64::new(0.0),
            total_returned: AtomicF64::new(0.0),
            jackpot_hits: AtomicU64::new(0),
        });

        Ok(Self {
            simulation_id: Uuid::new_v4().to_string(),
            rules,
            schedule,
            config,
            rng,
            ledger,
            round_results: Vec::new(),
            status: RunStatus::Created,
            shared,
        })
    }

    /// Build an engine from a stored configuration document
    pub fn from_configuration(config: GameConfiguration) -> RulesResult<Self> {
        Self::new(config.game_rules, config.simulation_config)
    }

    /// Run identifier
    pub fn simulation_id(&self) -> &str {
        &self.simulation_id
    }

    /// The game being simulated
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// The run parameters
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current lifecycle status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Rounds completed so far
    pub fn current_round(&self) -> u64 {
        self.shared.current_round.load(Ordering::Relaxed)
    }

    /// Every completed round, in order
    pub fn round_results(&self) -> &[RoundResult] {
        &self.round_results
    }

    /// The run's funding ledger
    pub fn ledger(&self) -> &PoolLedger {
        &self.ledger
    }

    /// Shareable view for concurrent progress polling and cancellation
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Ask the run to stop at the next round boundary
    pub fn request_stop(&self) {
        self.shared.stop.store(true, Ordering::Relaxed);
    }

    /// Export the full configuration as a JSON document
    pub fn export_config(&self) -> String {
        GameConfiguration {
            id: None,
            game_rules: self.rules.clone(),
            simulation_config: self.config.clone(),
        }
        .to_json()
    }

    /// Run every configured round to completion, cancellation, or error
    pub fn run(&mut self) -> SimulationResult {
        self.run_internal(None)
    }

    /// Run with a progress callback invoked on the yield cadence and at the
    /// final round
    pub fn run_with_progress<F>(&mut self, mut on_progress: F) -> SimulationResult
    where
        F: FnMut(&SimulationProgress),
    {
        self.run_internal(Some(&mut on_progress))
    }

    fn run_internal(
        &mut self,
        mut on_progress: Option<&mut dyn FnMut(&SimulationProgress)>,
    ) -> SimulationResult {
        let started_at = Utc::now();
        let clock = Instant::now();
        let total_rounds = self.config.rounds;

        self.status = RunStatus::Running;
        self.shared.stop.store(false, Ordering::Relaxed);
        self.shared.running.store(true, Ordering::Relaxed);
        info!(
            "simulation {} started: '{}', {} rounds",
            self.simulation_id, self.rules.name, total_rounds
        );

        let mut error_message = None;
        for round_number in 1..=total_rounds {
            if self.shared.stop.load(Ordering::Relaxed) {
                self.status = RunStatus::Stopped;
                info!(
                    "simulation {} stopped before round {round_number}",
                    self.simulation_id
                );
                break;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                simulate_round(
                    round_number,
                    &self.rules,
                    &self.schedule,
                    &self.config,
                    &mut self.rng,
                    &mut self.ledger,
                )
            }));

            match outcome {
                Ok(round) => {
                    self.round_results.push(round);
                    self.shared.current_round.store(round_number, Ordering::Relaxed);
                    self.publish_gauges();

                    if round_number % YIELD_CADENCE_ROUNDS == 0 || round_number == total_rounds {
                        if let Some(callback) = on_progress.as_deref_mut() {
                            callback(&self.progress_snapshot(
                                round_number,
                                total_rounds,
                                clock.elapsed().as_secs_f64(),
                            ));
                        }
                        if round_number != total_rounds {
                            thread::yield_now();
                        }
                    }
                }
                Err(payload) => {
                    let message = panic_message(payload);
                    warn!(
                        "simulation {} aborted in round {round_number}: {message}",
                        self.simulation_id
                    );
                    error_message = Some(message);
                    self.status = RunStatus::Error;
                    break;
                }
            }
        }

        if self.status == RunStatus::Running {
            self.status = RunStatus::Completed;
        }
        self.shared.running.store(false, Ordering::Relaxed);

        let summary = SimulationSummary::aggregate(
            &self.rules,
            &self.schedule,
            &self.round_results,
            &self.ledger,
        );
        let finished_at = Utc::now();
        let duration_secs = clock.elapsed().as_secs_f64();
        info!(
            "simulation {} {}: {} of {} rounds in {:.3}s",
            self.simulation_id,
            self.status.as_str(),
            self.round_results.len(),
            total_rounds,
            duration_secs
        );

        SimulationResult {
            simulation_id: self.simulation_id.clone(),
            game_name: self.rules.name.clone(),
            status: self.status,
            started_at,
            finished_at,
            duration_secs,
            rounds_requested: total_rounds,
            summary,
            round_results: self.round_results.clone(),
            error_message,
        }
    }

    fn progress_snapshot(
        &self,
        current_round: u64,
        total_rounds: u64,
        elapsed_secs: f64,
    ) -> SimulationProgress {
        let progress_percentage = current_round as f64 / total_rounds as f64 * 100.0;
        let estimated_remaining_secs = (current_round > 0).then(|| {
            elapsed_secs / current_round as f64 * (total_rounds - current_round) as f64
        });
        SimulationProgress {
            current_round,
            total_rounds,
            progress_percentage,
            elapsed_secs,
            estimated_remaining_secs,
            status: self.status,
        }
    }

    fn publish_gauges(&self) {
        self.shared
            .jackpot_pool
            .store(self.ledger.jackpot_pool(), Ordering::Relaxed);
        self.shared
            .total_sales
            .store(self.ledger.total_sales_amount(), Ordering::Relaxed);
        self.shared
            .total_returned
            .store(self.ledger.total_returned_amount(), Ordering::Relaxed);
        self.shared
            .jackpot_hits
            .store(self.ledger.jackpot_hits(), Ordering::Relaxed);
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic in round loop".to_string()
    }
}

//! Speculative orchestrator.
//!
//! Launches the oracle and both branches at once, blocks only on the oracle,
//! cancels the losing branch, collects the winner under a timeout, and makes
//! one non-blocking attempt to salvage the loser.
//!
//! Phases, in order:
//! `Launching -> RacingForDecision -> Arbitrating -> CollectingWinner ->
//! SalvagingLoser -> Closing`.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::BenchConfig;
use crate::core::{CancelScope, CancelSignal};
use crate::domain::{Annotation, Branch, RunMode, RunRecord};
use crate::error::{BenchError, BenchResult};
use crate::workloads::oracle::oracle_rng;
use crate::workloads::{commitment, enumeration, oracle};
use crate::workloads::{CommitmentOutcome, EnumerationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Launching,
    RacingForDecision,
    Arbitrating,
    CollectingWinner,
    SalvagingLoser,
    Closing,
}

/// Cancels the wrapped scope when dropped, so early returns still tear the
/// run down.
struct TeardownGuard(CancelScope);

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

enum Collected<T> {
    Ready(T),
    TimedOut,
    Lost,
}

/// Winner outcome reduced to what the record needs.
struct BranchReport {
    elapsed: Duration,
    annotation: Annotation,
}

impl From<CommitmentOutcome> for BranchReport {
    fn from(outcome: CommitmentOutcome) -> Self {
        let annotation = match outcome.counter {
            Some(counter) => Annotation::Counter(counter),
            None => Annotation::Cancelled(Branch::A),
        };
        Self {
            elapsed: outcome.elapsed,
            annotation,
        }
    }
}

impl From<EnumerationOutcome> for BranchReport {
    fn from(outcome: EnumerationOutcome) -> Self {
        let annotation = if outcome.completed {
            Annotation::Found(outcome.found_count())
        } else {
            Annotation::Cancelled(Branch::B)
        };
        Self {
            elapsed: outcome.elapsed,
            annotation,
        }
    }
}

/// Run `work` on the blocking pool and hand its output to `tx`.
///
/// Dropping the returned handle detaches the task; if the receiver is gone by
/// the time the work finishes, the output is discarded.
fn spawn_workload<T, F>(scope: CancelScope, tx: oneshot::Sender<T>, work: F) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnOnce(&CancelScope) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let output = work(&scope);
        let _ = tx.send(output);
    })
}

async fn collect<T>(rx: &mut oneshot::Receiver<T>, timeout: Duration) -> Collected<T> {
    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(value)) => Collected::Ready(value),
        Ok(Err(_)) => Collected::Lost,
        Err(_) => Collected::TimedOut,
    }
}

pub struct SpeculativeOrchestrator {
    config: Arc<BenchConfig>,
    parent: CancelScope,
}

impl SpeculativeOrchestrator {
    /// `parent` is the process-level scope; cancelling it interrupts every
    /// run derived from it.
    pub fn new(config: Arc<BenchConfig>, parent: CancelScope) -> Self {
        Self { config, parent }
    }

    pub async fn run(&self, run_id: u32) -> BenchResult<RunRecord> {
        let config = Arc::clone(&self.config);

        tracing::debug!(run_id, phase = ?Phase::Launching, "speculative run");
        let root = self.parent.derive_child();
        let _teardown = TeardownGuard(root.clone());
        let oracle_scope = root.derive_child();
        let a_scope = root.derive_child();
        let b_scope = root.derive_child();
        let launched_at = Instant::now();

        let (oracle_tx, oracle_rx) = oneshot::channel();
        let (a_tx, mut a_rx) = oneshot::channel::<CommitmentOutcome>();
        let (b_tx, mut b_rx) = oneshot::channel::<EnumerationOutcome>();

        let _oracle_task = {
            let config = Arc::clone(&config);
            spawn_workload(oracle_scope.clone(), oracle_tx, move |scope| {
                let mut rng = oracle_rng(config.rng_seed.map(|s| s.wrapping_add(run_id as u64)));
                oracle::compute(
                    config.oracle_dimension,
                    config.oracle_entry_bound,
                    &mut rng,
                    config.poll.oracle_rows,
                    scope,
                )
            })
        };
        let a_task = {
            let config = Arc::clone(&config);
            spawn_workload(a_scope.clone(), a_tx, move |scope| {
                commitment::search(
                    &config.commitment_seed,
                    config.commitment_difficulty,
                    config.poll.commitment,
                    scope,
                )
            })
        };
        let b_task = {
            let config = Arc::clone(&config);
            spawn_workload(b_scope.clone(), b_tx, move |scope| {
                enumeration::enumerate(config.enumeration_bound, config.poll.enumeration, scope)
            })
        };

        tracing::debug!(run_id, phase = ?Phase::RacingForDecision, "waiting for oracle");
        let decision = oracle_rx
            .await
            .map_err(|_| BenchError::TaskJoin("oracle ended without a result".into()))?;

        tracing::debug!(run_id, phase = ?Phase::Arbitrating, scalar = decision.scalar);
        let chosen = Branch::choose(decision.scalar, config.threshold);
        match chosen {
            Branch::A => b_scope.cancel(),
            Branch::B => a_scope.cancel(),
        }
        tracing::info!(
            run_id,
            scalar = decision.scalar,
            threshold = config.threshold,
            chosen = %chosen,
            "branch arbitrated"
        );
        if !decision.completed {
            tracing::warn!(
                run_id,
                scalar = decision.scalar,
                "oracle interrupted before finishing; arbitrated on a partial trace"
            );
        }

        tracing::debug!(run_id, phase = ?Phase::CollectingWinner, branch = %chosen);
        let timeout = config.collect_timeout();
        let winner = match chosen {
            Branch::A => Self::settle(run_id, chosen, collect(&mut a_rx, timeout).await, &a_task),
            Branch::B => Self::settle(run_id, chosen, collect(&mut b_rx, timeout).await, &b_task),
        };

        tracing::debug!(run_id, phase = ?Phase::SalvagingLoser, branch = %chosen.other());
        let salvaged = match chosen {
            Branch::A => b_rx.try_recv().ok().map(|outcome| outcome.elapsed),
            Branch::B => a_rx.try_recv().ok().map(|outcome| outcome.elapsed),
        };
        if let Some(elapsed) = salvaged {
            tracing::debug!(run_id, branch = %chosen.other(), ?elapsed, "loser salvaged");
        }

        let total_elapsed = launched_at.elapsed();

        let winner_elapsed = winner.elapsed;
        let loser_elapsed = salvaged.unwrap_or_default();
        let (branch_a_elapsed, branch_b_elapsed) = match chosen {
            Branch::A => (winner_elapsed, loser_elapsed),
            Branch::B => (loser_elapsed, winner_elapsed),
        };

        let record = RunRecord {
            run_id,
            mode: RunMode::Speculative,
            oracle_scalar: decision.scalar,
            chosen,
            oracle_elapsed: decision.elapsed,
            branch_a_elapsed,
            branch_b_elapsed,
            total_elapsed,
            annotation: winner.annotation,
        };

        tracing::debug!(run_id, phase = ?Phase::Closing);
        oracle_scope.cancel();
        a_scope.cancel();
        b_scope.cancel();
        root.cancel();
        let grace = config.grace_period();
        if !grace.is_zero() {
            tokio::time::sleep(grace).await;
        }

        Ok(record)
    }

    fn settle<T: Into<BranchReport>>(
        run_id: u32,
        branch: Branch,
        collected: Collected<T>,
        task: &JoinHandle<()>,
    ) -> BranchReport {
        match collected {
            Collected::Ready(outcome) => outcome.into(),
            Collected::TimedOut => {
                tracing::warn!(
                    run_id,
                    branch = %branch,
                    still_running = !task.is_finished(),
                    "timed out waiting for chosen branch; abandoning it"
                );
                BranchReport {
                    elapsed: Duration::ZERO,
                    annotation: Annotation::Timeout(branch),
                }
            }
            Collected::Lost => {
                tracing::warn!(
                    run_id,
                    branch = %branch,
                    "chosen branch ended without delivering a result"
                );
                BranchReport {
                    elapsed: Duration::ZERO,
                    annotation: Annotation::Lost(branch),
                }
            }
        }
    }
}

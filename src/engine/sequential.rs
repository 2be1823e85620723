//! Sequential baseline: oracle first, then only the chosen branch.

use std::time::{Duration, Instant};

use crate::config::BenchConfig;
use crate::core::Interrupt;
use crate::domain::{Annotation, Branch, RunMode, RunRecord};
use crate::workloads::oracle::oracle_rng;
use crate::workloads::{commitment, enumeration, oracle};

/// Blocking; callers on an async runtime should move it to the blocking pool.
///
/// Nothing in the run itself cancels `interrupt`; it only carries process
/// shutdown. Pass [`NeverCancel`](crate::core::NeverCancel) to run to completion
/// unconditionally.
pub fn run_sequential<I: Interrupt + ?Sized>(
    run_id: u32,
    config: &BenchConfig,
    interrupt: &I,
) -> RunRecord {
    let started_at = Instant::now();

    let mut rng = oracle_rng(config.rng_seed.map(|s| s.wrapping_add(run_id as u64)));
    let decision = oracle::compute(
        config.oracle_dimension,
        config.oracle_entry_bound,
        &mut rng,
        config.poll.oracle_rows,
        interrupt,
    );
    let chosen = Branch::choose(decision.scalar, config.threshold);
    tracing::info!(
        run_id,
        scalar = decision.scalar,
        threshold = config.threshold,
        chosen = %chosen,
        "branch decided"
    );
    if !decision.completed {
        tracing::warn!(run_id, scalar = decision.scalar, "oracle returned a partial trace");
    }

    let mut branch_a_elapsed = Duration::ZERO;
    let mut branch_b_elapsed = Duration::ZERO;
    let annotation = match chosen {
        Branch::A => {
            let outcome = commitment::search(
                &config.commitment_seed,
                config.commitment_difficulty,
                config.poll.commitment,
                interrupt,
            );
            branch_a_elapsed = outcome.elapsed;
            match outcome.counter {
                Some(counter) => Annotation::Counter(counter),
                None => Annotation::Cancelled(Branch::A),
            }
        }
        Branch::B => {
            let outcome =
                enumeration::enumerate(config.enumeration_bound, config.poll.enumeration, interrupt);
            branch_b_elapsed = outcome.elapsed;
            if outcome.completed {
                Annotation::Found(outcome.found_count())
            } else {
                Annotation::Cancelled(Branch::B)
            }
        }
    };

    RunRecord {
        run_id,
        mode: RunMode::Sequential,
        oracle_scalar: decision.scalar,
        chosen,
        oracle_elapsed: decision.elapsed,
        branch_a_elapsed,
        branch_b_elapsed,
        total_elapsed: started_at.elapsed(),
        annotation,
    }
}

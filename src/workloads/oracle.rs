//! Decision oracle: trace of a random matrix product.
//!
//! The product matrix is never materialized; only the diagonal terms
//! `sum_k a[i][k] * b[k][i]` are accumulated.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use crate::core::Interrupt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleOutcome {
    /// Trace, or the partial sum over the rows visited before cancellation.
    pub scalar: i64,
    pub completed: bool,
    pub elapsed: Duration,
}

/// Dense row-major square matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareMatrix {
    dim: usize,
    cells: Vec<i64>,
}

impl SquareMatrix {
    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<i64>>) -> Self {
        let dim = rows.len();
        let cells: Vec<i64> = rows.into_iter().flatten().collect();
        assert_eq!(cells.len(), dim * dim, "matrix must be square");
        Self { dim, cells }
    }

    /// Entries drawn uniformly from `[0, entry_bound)`.
    pub fn random(dim: usize, entry_bound: i64, rng: &mut impl Rng) -> Self {
        let entry_bound = entry_bound.max(1);
        let cells = (0..dim * dim).map(|_| rng.gen_range(0..entry_bound)).collect();
        Self { dim, cells }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.cells[row * self.dim + col]
    }
}

/// Largest trace two `dim x dim` matrices with entries in `[0, entry_bound)`
/// can produce, or `None` if it does not fit in an `i64`.
pub fn max_trace(dim: usize, entry_bound: i64) -> Option<i64> {
    let top = entry_bound.max(1) - 1;
    let dim = i64::try_from(dim).ok()?;
    top.checked_mul(top)?.checked_mul(dim)
}

/// Generator for one oracle invocation. A fixed seed makes the run reproducible.
pub fn oracle_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Trace of `a * b`, checking `interrupt` before every `poll_rows`-th row.
/// Returns the accumulated sum and whether every row was visited.
pub fn trace_of_product<I: Interrupt + ?Sized>(
    a: &SquareMatrix,
    b: &SquareMatrix,
    poll_rows: u64,
    interrupt: &I,
) -> (i64, bool) {
    debug_assert_eq!(a.dim(), b.dim());
    let poll_rows = poll_rows.max(1);
    let n = a.dim();
    let mut trace = 0i128;
    for i in 0..n {
        if i as u64 % poll_rows == 0 && interrupt.is_cancelled() {
            return (saturate(trace), false);
        }
        let row: i128 = (0..n)
            .map(|k| i128::from(a.get(i, k)) * i128::from(b.get(k, i)))
            .fold(0, i128::saturating_add);
        trace = trace.saturating_add(row);
    }
    (saturate(trace), true)
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Materialize two `dim x dim` matrices from `rng` and compute their product trace.
pub fn compute<I: Interrupt + ?Sized>(
    dim: usize,
    entry_bound: i64,
    rng: &mut impl Rng,
    poll_rows: u64,
    interrupt: &I,
) -> OracleOutcome {
    let start = Instant::now();
    let a = SquareMatrix::random(dim, entry_bound, rng);
    let b = SquareMatrix::random(dim, entry_bound, rng);
    let (scalar, completed) = trace_of_product(&a, &b, poll_rows, interrupt);
    OracleOutcome {
        scalar,
        completed,
        elapsed: start.elapsed(),
    }
}

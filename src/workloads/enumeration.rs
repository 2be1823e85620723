//! Workload B: prime enumeration by trial division.
//!
//! Deliberately O(m * sqrt(m)); no sieve.

use std::time::{Duration, Instant};

use crate::core::Interrupt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationOutcome {
    /// Primes found so far, ascending. A prefix of the full list when cancelled.
    pub primes: Vec<u64>,
    pub completed: bool,
    pub elapsed: Duration,
}

impl EnumerationOutcome {
    pub fn found_count(&self) -> usize {
        self.primes.len()
    }
}

pub fn is_prime(candidate: u64) -> bool {
    if candidate < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor <= candidate / divisor {
        if candidate % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

/// Collect the primes in `[2, bound]`, checking `interrupt` once every
/// `poll_every` candidates (starting with the first).
pub fn enumerate<I: Interrupt + ?Sized>(
    bound: u64,
    poll_every: u64,
    interrupt: &I,
) -> EnumerationOutcome {
    let start = Instant::now();
    let poll_every = poll_every.max(1);
    let mut primes = Vec::new();

    for (examined, candidate) in (2..=bound).enumerate() {
        if examined as u64 % poll_every == 0 && interrupt.is_cancelled() {
            return EnumerationOutcome {
                primes,
                completed: false,
                elapsed: start.elapsed(),
            };
        }
        if is_prime(candidate) {
            primes.push(candidate);
        }
    }

    EnumerationOutcome {
        primes,
        completed: true,
        elapsed: start.elapsed(),
    }
}

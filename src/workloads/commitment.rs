//! Workload A: commitment search.
//!
//! Hashes `seed ++ counter` with SHA-256 for increasing counters until the
//! hex digest starts with `difficulty` zero characters. Difficulties above 64
//! can never match, so such a search only ends through cancellation.

use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::time::{Duration, Instant};

use crate::core::Interrupt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitmentOutcome {
    /// Hex digest of the first matching candidate, `None` if cancelled first.
    pub digest: Option<String>,
    /// Counter that produced `digest`.
    pub counter: Option<u64>,
    pub elapsed: Duration,
}

impl CommitmentOutcome {
    pub fn is_found(&self) -> bool {
        self.counter.is_some()
    }
}

/// Hex SHA-256 of the candidate built from `seed` and `counter`.
pub fn candidate_digest(seed: &str, counter: u64) -> String {
    let mut candidate = String::with_capacity(seed.len() + 20);
    candidate.push_str(seed);
    let _ = write!(candidate, "{}", counter);
    hex::encode(Sha256::digest(candidate.as_bytes()))
}

/// Run the search, checking `interrupt` once every `poll_every` counters
/// (starting with counter 0).
pub fn search<I: Interrupt + ?Sized>(
    seed: &str,
    difficulty: usize,
    poll_every: u64,
    interrupt: &I,
) -> CommitmentOutcome {
    let start = Instant::now();
    let poll_every = poll_every.max(1);
    let prefix = "0".repeat(difficulty);
    let mut candidate = String::with_capacity(seed.len() + 20);
    let mut counter: u64 = 0;

    loop {
        if counter % poll_every == 0 && interrupt.is_cancelled() {
            return CommitmentOutcome {
                digest: None,
                counter: None,
                elapsed: start.elapsed(),
            };
        }

        candidate.clear();
        candidate.push_str(seed);
        let _ = write!(candidate, "{}", counter);
        let digest = hex::encode(Sha256::digest(candidate.as_bytes()));
        if digest.starts_with(&prefix) {
            return CommitmentOutcome {
                digest: Some(digest),
                counter: Some(counter),
                elapsed: start.elapsed(),
            };
        }
        counter = counter.wrapping_add(1);
    }
}

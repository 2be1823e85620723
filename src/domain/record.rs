//! Run records — the one immutable output of every run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Execution mode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunMode {
    #[serde(rename = "spec")]
    Speculative,
    #[serde(rename = "seq")]
    Sequential,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Speculative => "spec",
            RunMode::Sequential => "seq",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spec" | "speculative" => Ok(RunMode::Speculative),
            "seq" | "sequential" => Ok(RunMode::Sequential),
            other => Err(format!("unknown run mode: {}", other)),
        }
    }
}

/// One of the two mutually exclusive branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    A,
    B,
}

impl Branch {
    /// Arbitration rule: `scalar >= threshold` keeps A, anything else keeps B.
    pub fn choose(scalar: i64, threshold: i64) -> Branch {
        if scalar >= threshold {
            Branch::A
        } else {
            Branch::B
        }
    }

    pub fn other(self) -> Branch {
        match self {
            Branch::A => Branch::B,
            Branch::B => Branch::A,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::A => "A",
            Branch::B => "B",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to the chosen branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    /// Branch A matched at this counter.
    Counter(u64),
    /// Branch B finished with this many primes.
    Found(usize),
    /// The branch observed cancellation before finishing.
    Cancelled(Branch),
    /// The collection timeout elapsed first.
    Timeout(Branch),
    /// The branch's result channel closed without a value.
    Lost(Branch),
}

impl Annotation {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Annotation::Timeout(_))
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Counter(counter) => write!(f, "nonce={}", counter),
            Annotation::Found(count) => write!(f, "primes={}", count),
            Annotation::Cancelled(branch) => write!(f, "{}_cancelled", branch),
            Annotation::Timeout(branch) => write!(f, "timeout_waiting_{}", branch),
            Annotation::Lost(branch) => write!(f, "lost_{}", branch),
        }
    }
}

/// Arbitrated outcome of one run.
///
/// Branch elapsed times are zero when the branch never ran or its result
/// never arrived before arbitration closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: u32,
    pub mode: RunMode,
    pub oracle_scalar: i64,
    pub chosen: Branch,
    pub oracle_elapsed: Duration,
    pub branch_a_elapsed: Duration,
    pub branch_b_elapsed: Duration,
    pub total_elapsed: Duration,
    pub annotation: Annotation,
}

impl RunRecord {
    pub fn branch_elapsed(&self, branch: Branch) -> Duration {
        match branch {
            Branch::A => self.branch_a_elapsed,
            Branch::B => self.branch_b_elapsed,
        }
    }

    pub fn chosen_elapsed(&self) -> Duration {
        self.branch_elapsed(self.chosen)
    }
}

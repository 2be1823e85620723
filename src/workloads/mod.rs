//! CPU-bound workloads.
//!
//! Each workload is a plain blocking function that polls an
//! [`Interrupt`](crate::core::Interrupt) at a bounded iteration interval and
//! returns whatever it has accumulated when cancelled.
//!
//! - [`commitment`] — branch A, hash-prefix search.
//! - [`enumeration`] — branch B, prime enumeration.
//! - [`oracle`] — the decision computation.

pub mod commitment;
pub mod enumeration;
pub mod oracle;

pub use commitment::CommitmentOutcome;
pub use enumeration::EnumerationOutcome;
pub use oracle::{OracleOutcome, SquareMatrix};

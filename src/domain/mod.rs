//! Domain types shared by the engine, sinks, and reports.

pub mod record;

pub use record::{Annotation, Branch, RunMode, RunRecord};

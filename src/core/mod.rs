pub mod cancel;

pub use cancel::{CancelScope, CancelSignal, Interrupt, NeverCancel};

//! Run engine — the single entry point collaborators call.
//!
//! [`Engine::run`] dispatches to the [`SpeculativeOrchestrator`] or the
//! sequential baseline and returns one [`RunRecord`]. [`Engine::run_and_record`]
//! additionally appends it to a [`RecordSink`].

pub mod sequential;
pub mod speculative;

use std::future::Future;
use std::sync::Arc;

use crate::config::BenchConfig;
use crate::core::{CancelScope, CancelSignal, Interrupt};
use crate::domain::{RunMode, RunRecord};
use crate::error::{BenchError, BenchResult};
use crate::sink::RecordSink;

pub use sequential::run_sequential;
pub use speculative::{Phase, SpeculativeOrchestrator};

pub struct Engine {
    config: Arc<BenchConfig>,
    shutdown: CancelScope,
}

impl Engine {
    pub fn new(config: BenchConfig) -> BenchResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            shutdown: CancelScope::new(),
        })
    }

    /// Use `shutdown` as the ancestor of every run's cancellation tree.
    pub fn with_shutdown(mut self, shutdown: CancelScope) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn shutdown_scope(&self) -> &CancelScope {
        &self.shutdown
    }

    /// Fails with [`BenchError::Cancelled`] once the shutdown scope is cancelled.
    pub async fn run(&self, run_id: u32, mode: RunMode) -> BenchResult<RunRecord> {
        if self.shutdown.is_cancelled() {
            return Err(BenchError::Cancelled);
        }
        match mode {
            RunMode::Speculative => {
                SpeculativeOrchestrator::new(Arc::clone(&self.config), self.shutdown.clone())
                    .run(run_id)
                    .await
            }
            RunMode::Sequential => {
                let config = Arc::clone(&self.config);
                let shutdown = self.shutdown.clone();
                let record = tokio::task::spawn_blocking(move || {
                    run_sequential(run_id, &config, &shutdown)
                })
                .await?;
                Ok(record)
            }
        }
    }

    /// Run once and append the record. A sink failure aborts this run only.
    ///
    /// A run cut short by shutdown is not appended.
    pub async fn run_and_record(
        &self,
        run_id: u32,
        mode: RunMode,
        sink: &mut dyn RecordSink,
    ) -> BenchResult<RunRecord> {
        let record = self.run(run_id, mode).await?;
        if self.shutdown.is_cancelled() {
            tracing::warn!(run_id, mode = %mode, "run interrupted by shutdown; record dropped");
            return Err(BenchError::Cancelled);
        }
        sink.append(&record)?;
        Ok(record)
    }
}

/// Drive `work` until it finishes or `signal` fires. On the signal, `shutdown`
/// is cancelled and [`BenchError::Cancelled`] returned without waiting for
/// `work`.
pub async fn until_signal<F, S>(work: F, signal: S, shutdown: &CancelScope) -> BenchResult<F::Output>
where
    F: Future,
    S: Future<Output = ()>,
{
    tokio::select! {
        output = work => Ok(output),
        _ = signal => {
            shutdown.cancel();
            Err(BenchError::Cancelled)
        }
    }
}

/// One-shot convenience over [`Engine`].
pub async fn run(run_id: u32, mode: RunMode, config: BenchConfig) -> BenchResult<RunRecord> {
    Engine::new(config)?.run(run_id, mode).await
}

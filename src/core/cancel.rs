//! Hierarchical cooperative cancellation.
//!
//! A [`CancelScope`] wraps a [`tokio_util::sync::CancellationToken`]. Scopes
//! form a tree: cancelling a node cancels its whole subtree, never its
//! parent or siblings. Workloads only see the narrower [`Interrupt`]
//! capability and poll it at bounded intervals.

use tokio_util::sync::CancellationToken;

/// Read-only cancellation capability handed to a running workload.
pub trait Interrupt: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

/// A node in a cancellation tree.
pub trait CancelSignal: Interrupt {
    /// Derive a child that is cancelled whenever `self` is.
    fn derive_child(&self) -> Self
    where
        Self: Sized;

    /// Request cancellation. Idempotent and irreversible.
    fn cancel(&self);
}

#[derive(Clone, Debug)]
pub struct CancelScope {
    token: Option<CancellationToken>,
}

impl CancelScope {
    /// A fresh root scope.
    pub fn new() -> Self {
        Self {
            token: Some(CancellationToken::new()),
        }
    }

    /// A scope that is never cancelled, for callers that must run to completion.
    pub fn never() -> Self {
        Self { token: None }
    }

    pub fn is_cancellable(&self) -> bool {
        self.token.is_some()
    }

    /// Resolves when the scope is cancelled. Pends forever for [`CancelScope::never`].
    pub async fn cancelled(&self) {
        match &self.token {
            Some(token) => token.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Interrupt for CancelScope {
    fn is_cancelled(&self) -> bool {
        self.token
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }
}

impl CancelSignal for CancelScope {
    fn derive_child(&self) -> Self {
        Self {
            token: self.token.as_ref().map(CancellationToken::child_token),
        }
    }

    fn cancel(&self) {
        if let Some(token) = &self.token {
            token.cancel();
        }
    }
}

/// Always-active capability; zero-sized alternative to [`CancelScope::never`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl Interrupt for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let scope = CancelScope::new();
        assert!(!scope.is_cancelled());
        scope.cancel();
        scope.cancel();
        assert!(scope.is_cancelled());
    }

    #[test]
    fn test_parent_cancels_subtree() {
        let root = CancelScope::new();
        let child = root.derive_child();
        let grandchild = child.derive_child();
        root.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_child_does_not_cancel_parent_or_sibling() {
        let root = CancelScope::new();
        let a = root.derive_child();
        let b = root.derive_child();
        a.cancel();
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
        assert!(!root.is_cancelled());
    }

    #[test]
    fn test_child_of_cancelled_parent_starts_cancelled() {
        let root = CancelScope::new();
        root.cancel();
        assert!(root.derive_child().is_cancelled());
    }

    #[test]
    fn test_never_scope_ignores_cancel() {
        let scope = CancelScope::never();
        scope.cancel();
        assert!(!scope.is_cancelled());
        assert!(!scope.derive_child().is_cancelled());
        assert!(!scope.is_cancellable());
        assert!(!NeverCancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let root = CancelScope::new();
        let child = root.derive_child();
        let waiter = tokio::spawn(async move { child.cancelled().await });
        root.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("cancellation not observed")
            .unwrap();
    }
}

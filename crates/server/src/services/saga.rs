//! Explicit multi-step transactions with per-step compensation.
//!
//! A [`Compensations`] value is threaded through a multi-step flow. After
//! each side effect succeeds, the flow records an undo action for it; if
//! a later step fails, [`Compensations::unwind`] runs the recorded undos
//! in reverse order. Undo failures are logged and swallowed — unwinding
//! is best-effort by design, and a crash mid-unwind can leave partial
//! state behind (the same gap the manual cleanup always had).
//!
//! Keeping the stack explicit (rather than hiding it in a framework)
//! means flows can be unit-tested with in-memory steps and no database.

use std::future::Future;
use std::pin::Pin;

type UndoFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// A stack of recorded undo actions for the steps completed so far.
pub struct Compensations {
    stack: Vec<(&'static str, UndoFuture)>,
}

impl Compensations {
    /// Create an empty compensation stack.
    #[must_use]
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Record an undo action for a step that just completed.
    ///
    /// The future must own everything it needs (clone pools/ids into it);
    /// it runs only if a later step fails.
    pub fn record<F, E>(&mut self, label: &'static str, undo: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: std::fmt::Display,
    {
        self.stack.push((
            label,
            Box::pin(async move { undo.await.map_err(|e| e.to_string()) }),
        ));
    }

    /// Number of undo actions currently recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether no undo actions have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Run all recorded undo actions in reverse order.
    ///
    /// Each failure is logged and swallowed so the remaining actions
    /// still get their chance to run.
    pub async fn unwind(mut self) {
        while let Some((label, undo)) = self.stack.pop() {
            match undo.await {
                Ok(()) => tracing::info!(step = label, "compensated"),
                Err(e) => tracing::warn!(step = label, error = %e, "compensation failed"),
            }
        }
    }

    /// Discard the recorded undo actions: the flow completed.
    pub fn commit(mut self) {
        self.stack.clear();
    }
}

impl Default for Compensations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_unwind_runs_in_reverse_order() {
        let log = recorder();
        let mut saga = Compensations::new();

        for label in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            saga.record(label, async move {
                log.lock().expect("lock").push(label);
                Ok::<_, String>(())
            });
        }

        saga.unwind().await;

        assert_eq!(*log.lock().expect("lock"), vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_failed_undo_does_not_stop_the_rest() {
        let log = recorder();
        let mut saga = Compensations::new();

        {
            let log = Arc::clone(&log);
            saga.record("keep", async move {
                log.lock().expect("lock").push("keep");
                Ok::<_, String>(())
            });
        }
        saga.record("broken", async move { Err("boom".to_string()) });

        saga.unwind().await;

        // "broken" failed (and was swallowed); "keep" still ran after it.
        assert_eq!(*log.lock().expect("lock"), vec!["keep"]);
    }

    #[tokio::test]
    async fn test_commit_discards_undos() {
        let log = recorder();
        let mut saga = Compensations::new();

        {
            let log = Arc::clone(&log);
            saga.record("never", async move {
                log.lock().expect("lock").push("never");
                Ok::<_, String>(())
            });
        }

        assert_eq!(saga.len(), 1);
        saga.commit();

        assert!(log.lock().expect("lock").is_empty());
    }
}

//! Shutdown callbacks
//!
//! The host application owns a [`ShutdownHooks`] registry and runs it once at
//! the end of a request or of the process. Callbacks run in registration
//! order; a callback that fails or panics is discarded so the rest of the
//! host's shutdown sequence is never blocked by logging.

use super::error::Result;
use parking_lot::Mutex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

type ShutdownCallback = Arc<dyn Fn() -> Result<()> + Send + Sync>;

#[derive(Default)]
pub struct ShutdownHooks {
    callbacks: Mutex<Vec<(String, ShutdownCallback)>>,
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_shutdown<F>(&self, name: impl Into<String>, callback: F)
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.callbacks.lock().push((name.into(), Arc::new(callback)));
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.lock().is_empty()
    }

    /// Run every callback, discarding errors and panics.
    ///
    /// Returns the number of callbacks that completed successfully. Callbacks
    /// run without the registry locked; ones registered meanwhile wait for the
    /// next `run`.
    pub fn run(&self) -> usize {
        let callbacks: Vec<ShutdownCallback> = self
            .callbacks
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        callbacks
            .iter()
            .filter(|callback| run_discarding(|| callback()))
            .count()
    }

    pub fn names(&self) -> Vec<String> {
        self.callbacks
            .lock()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Run `f` at a shutdown boundary: errors and panics are swallowed.
///
/// Returns whether `f` completed successfully.
pub fn run_discarding<F>(f: F) -> bool
where
    F: Fn() -> Result<()>,
{
    matches!(catch_unwind(AssertUnwindSafe(&f)), Ok(Ok(())))
}

impl fmt::Debug for ShutdownHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownHooks")
            .field("callbacks", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_failures_do_not_block_later_callbacks() {
        let hooks = ShutdownHooks::new();
        let calls = Arc::new(AtomicUsize::new(0));

        hooks.on_shutdown("failing", || Err(LoggerError::other("flush failed")));
        hooks.on_shutdown("panicking", || panic!("boom"));
        let counter = calls.clone();
        hooks.on_shutdown("counting", move || {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });

        assert_eq!(hooks.run(), 1);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(hooks.names(), vec!["failing", "panicking", "counting"]);
    }

    #[test]
    fn test_callback_may_register_another() {
        let hooks = Arc::new(ShutdownHooks::new());
        let registry = Arc::clone(&hooks);
        hooks.on_shutdown("registering", move || {
            registry.on_shutdown("late", || Ok(()));
            Ok(())
        });

        assert_eq!(hooks.run(), 1);
        assert_eq!(hooks.names(), vec!["registering", "late"]);
    }
}

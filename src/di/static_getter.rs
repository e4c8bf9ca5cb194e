//! Process-wide logger access
//!
//! For code that cannot receive a logger through its constructor. Reading a
//! getter before it was set fails instead of silently falling back to a
//! default logger.

use super::container::ServiceLocator;
use crate::core::{Logger, LoggerError, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

static LOGGER: Lazy<RwLock<Option<Arc<dyn Logger>>>> = Lazy::new(|| RwLock::new(None));

static SERVICE: Lazy<RwLock<ServiceState>> = Lazy::new(|| RwLock::new(ServiceState::default()));

#[derive(Default)]
struct ServiceState {
    source: Option<(String, Arc<dyn ServiceLocator>)>,
    logger: Option<Arc<dyn Logger>>,
}

fn not_set(getter: &str) -> LoggerError {
    LoggerError::invalid_state(format!(
        "Context: Trying to get logger from {}.\n\
         Problem: Logger is not set.\n\
         Solution: Enable getter via 'staticGetter' option of LoggingExtension.",
        getter
    ))
}

/// Holds a logger instance set explicitly by the host
pub struct LoggerGetter;

impl LoggerGetter {
    pub fn set(logger: Arc<dyn Logger>) {
        *LOGGER.write() = Some(logger);
    }

    pub fn get() -> Result<Arc<dyn Logger>> {
        LOGGER.read().clone().ok_or_else(|| not_set("LoggerGetter"))
    }
}

/// Resolves the logger from a service locator on first access
pub struct StaticLoggerGetter;

impl StaticLoggerGetter {
    pub fn set(service_key: impl Into<String>, locator: Arc<dyn ServiceLocator>) {
        let mut state = SERVICE.write();
        state.source = Some((service_key.into(), locator));
        state.logger = None;
    }

    /// The global lock is not held while the service is resolved.
    pub fn get() -> Result<Arc<dyn Logger>> {
        let (key, locator) = {
            let state = SERVICE.read();
            if let Some(logger) = &state.logger {
                return Ok(logger.clone());
            }
            state
                .source
                .clone()
                .ok_or_else(|| not_set("StaticLoggerGetter"))?
        };

        let logger = locator.resolve(&key)?.require_logger(&key)?;

        let mut state = SERVICE.write();
        if let Some(cached) = &state.logger {
            return Ok(cached.clone());
        }
        // a `set` in the meantime points at another service
        let unchanged = matches!(
            &state.source,
            Some((current, source)) if *current == key && Arc::ptr_eq(source, &locator)
        );
        if unchanged {
            state.logger = Some(logger.clone());
        }
        Ok(logger)
    }
}

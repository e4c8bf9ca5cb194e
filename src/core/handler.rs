//! Handler traits for log record consumers

use super::error::Result;
use super::log_level::Level;
use super::processor::{Processor, ProcessorStack};
use super::record::LogRecord;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A consumer of log records (file, network, memory buffer, ...).
///
/// `handle` returns `Ok(true)` when the record must not be passed to the
/// handlers registered after this one in the same channel.
pub trait Handler: Send + Sync {
    fn is_handling(&self, record: &LogRecord) -> bool;

    fn handle(&self, record: &LogRecord) -> Result<bool>;

    fn handle_batch(&self, records: &[LogRecord]) -> Result<()> {
        for record in records {
            self.handle(record)?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()>;

    /// Release per-request state. Handlers without such state keep the default.
    fn reset(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;

    /// Level/bubble/processor configuration capability, if the handler has it
    fn as_configurable(&self) -> Option<&dyn ConfigurableHandler> {
        None
    }
}

/// Handlers that carry their own level threshold and bubble flag and can
/// therefore be configured in place instead of being wrapped in a
/// [`HandlerAdapter`](super::handler_adapter::HandlerAdapter).
pub trait ConfigurableHandler {
    fn set_level(&self, level: Level);

    fn set_bubble(&self, bubble: bool);

    fn supports_processors(&self) -> bool;

    fn push_processor(&self, processor: Arc<dyn Processor>);
}

/// Level, bubble flag and processors shared by the built-in handlers
#[derive(Debug)]
pub struct HandlerOptions {
    level: RwLock<Level>,
    bubble: AtomicBool,
    processors: ProcessorStack,
}

impl HandlerOptions {
    pub fn new(level: Level, bubble: bool) -> Self {
        Self {
            level: RwLock::new(level),
            bubble: AtomicBool::new(bubble),
            processors: ProcessorStack::new(),
        }
    }

    pub fn level(&self) -> Level {
        *self.level.read()
    }

    pub fn bubble(&self) -> bool {
        self.bubble.load(Ordering::Relaxed)
    }

    pub fn processors(&self) -> &ProcessorStack {
        &self.processors
    }

    #[inline]
    pub fn is_handling(&self, record: &LogRecord) -> bool {
        self.level().includes(record.level)
    }

    /// Run the common handling steps and pass the processed record to `write`.
    ///
    /// Returns the value `Handler::handle` should return.
    pub fn handle_with<F>(&self, record: &LogRecord, write: F) -> Result<bool>
    where
        F: FnOnce(LogRecord) -> Result<()>,
    {
        if !self.is_handling(record) {
            return Ok(false);
        }

        let record = if self.processors.is_empty() {
            record.clone()
        } else {
            self.processors.process(record.clone())
        };
        write(record)?;

        Ok(!self.bubble())
    }
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self::new(Level::Debug, true)
    }
}

impl ConfigurableHandler for HandlerOptions {
    fn set_level(&self, level: Level) {
        *self.level.write() = level;
    }

    fn set_bubble(&self, bubble: bool) {
        self.bubble.store(bubble, Ordering::Relaxed);
    }

    fn supports_processors(&self) -> bool {
        true
    }

    fn push_processor(&self, processor: Arc<dyn Processor>) {
        self.processors.push_processor(processor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_level_and_bubble() {
        let options = HandlerOptions::new(Level::Warning, true);
        let mut written = Vec::new();

        let stop = options
            .handle_with(&LogRecord::new("app", Level::Info, "info"), |r| {
                written.push(r);
                Ok(())
            })
            .unwrap();
        assert!(!stop);
        assert!(written.is_empty());

        options.set_bubble(false);
        let stop = options
            .handle_with(&LogRecord::new("app", Level::Error, "error"), |r| {
                written.push(r);
                Ok(())
            })
            .unwrap();
        assert!(stop);
        assert_eq!(written.len(), 1);

        options.set_level(Level::Debug);
        assert!(options.is_handling(&LogRecord::new("app", Level::Debug, "debug")));
    }
}

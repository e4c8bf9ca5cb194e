//! Named log channels
//!
//! A [`Channel`] is one logical log stream: an ordered list of handlers plus
//! an ordered stack of processors. Both lists are set up once while the
//! service graph is assembled and only read afterwards.

use super::{
    error::Result,
    handler::Handler,
    log_context::LogContext,
    log_level::Level,
    logger::Logger,
    metrics::ChannelMetrics,
    processor::{Processor, ProcessorStack},
    record::LogRecord,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

pub struct Channel {
    name: String,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
    processors: ProcessorStack,
    metrics: ChannelMetrics,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: RwLock::new(Vec::new()),
            processors: ProcessorStack::new(),
            metrics: ChannelMetrics::new(),
        }
    }

    /// Create a channel with handlers and processors, both in execution order
    pub fn with_parts(
        name: impl Into<String>,
        handlers: Vec<Arc<dyn Handler>>,
        processors: Vec<Arc<dyn Processor>>,
    ) -> Self {
        Self {
            name: name.into(),
            handlers: RwLock::new(handlers),
            processors: ProcessorStack::from_ordered(processors),
            metrics: ChannelMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the whole handler list, keeping the given order
    pub fn set_handlers(&self, handlers: Vec<Arc<dyn Handler>>) {
        *self.handlers.write() = handlers;
    }

    pub fn push_handler(&self, handler: Arc<dyn Handler>) {
        self.handlers.write().push(handler);
    }

    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.handlers.read().clone()
    }

    /// Put a processor on top of the channel's processor stack.
    ///
    /// The most recently pushed processor runs first; to register processors
    /// declared as `[p1, p2]` so that `p1` runs first, push `p2` then `p1`.
    pub fn push_processor(&self, processor: Arc<dyn Processor>) {
        self.processors.push_processor(processor);
    }

    /// Processors in execution order
    pub fn processors(&self) -> Vec<Arc<dyn Processor>> {
        self.processors.processors()
    }

    pub fn metrics(&self) -> &ChannelMetrics {
        &self.metrics
    }

    /// Whether any handler would accept a record of the given level
    pub fn is_handling(&self, level: Level) -> bool {
        let probe = LogRecord::new(self.name.as_str(), level, "");
        self.handlers.read().iter().any(|h| h.is_handling(&probe))
    }

    /// Emit a record on this channel.
    ///
    /// Handlers run in registration order until one returns `true`. A failing
    /// handler aborts propagation of this record and its error is returned.
    pub fn log(&self, level: Level, message: impl Into<String>, context: LogContext) -> Result<()> {
        let record = LogRecord::new(self.name.as_str(), level, message).with_context(context);
        self.add_record(record)
    }

    /// Dispatch a prepared record
    pub fn add_record(&self, record: LogRecord) -> Result<()> {
        let handlers = self.handlers.read();

        // avoid running processors when nobody is going to look at the record
        let Some(first) = handlers.iter().position(|h| h.is_handling(&record)) else {
            self.metrics.record_skipped();
            return Ok(());
        };

        let record = self.processors.process(record);
        self.metrics.record_logged(record.level);

        for handler in &handlers[first..] {
            if handler.handle(&record)? {
                self.metrics.record_stopped();
                break;
            }
        }

        Ok(())
    }

    /// Reset every handler in order, then the channel's processors
    pub fn reset(&self) -> Result<()> {
        for handler in self.handlers.read().iter() {
            handler.reset()?;
        }
        self.processors.reset();
        Ok(())
    }

    /// Close every handler in order; processors are left untouched
    pub fn close(&self) -> Result<()> {
        for handler in self.handlers.read().iter() {
            handler.close()?;
        }
        Ok(())
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(Level::Debug, message, LogContext::new())
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(Level::Info, message, LogContext::new())
    }

    #[inline]
    pub fn notice(&self, message: impl Into<String>) -> Result<()> {
        self.log(Level::Notice, message, LogContext::new())
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) -> Result<()> {
        self.log(Level::Warning, message, LogContext::new())
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(Level::Error, message, LogContext::new())
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) -> Result<()> {
        self.log(Level::Critical, message, LogContext::new())
    }

    #[inline]
    pub fn alert(&self, message: impl Into<String>) -> Result<()> {
        self.log(Level::Alert, message, LogContext::new())
    }

    #[inline]
    pub fn emergency(&self, message: impl Into<String>) -> Result<()> {
        self.log(Level::Emergency, message, LogContext::new())
    }
}

impl Logger for Channel {
    fn log(&self, level: Level, message: &str, context: &LogContext) -> Result<()> {
        Channel::log(self, level, message, context.clone())
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("handlers", &self.handlers.read().len())
            .field("processors", &self.processors.len())
            .finish()
    }
}

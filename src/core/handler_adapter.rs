//! Level, bubble and processor support for arbitrary sinks
//!
//! [`HandlerAdapter`] lets any [`Handler`] be wired into a channel with a
//! configured minimum level, bubble flag and handler-local processors, even if
//! the sink itself knows nothing about those concepts.

use super::error::Result;
use super::handler::Handler;
use super::log_level::Level;
use super::processor::{Processor, ProcessorStack};
use super::record::LogRecord;
use std::sync::Arc;

pub struct HandlerAdapter {
    handler: Arc<dyn Handler>,
    level: Level,
    bubble: bool,
    processors: ProcessorStack,
}

impl HandlerAdapter {
    /// `processors` are given in execution order.
    pub fn new(
        handler: Arc<dyn Handler>,
        level: Level,
        bubble: bool,
        processors: Vec<Arc<dyn Processor>>,
    ) -> Self {
        Self {
            handler,
            level,
            bubble,
            processors: ProcessorStack::from_ordered(processors),
        }
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn processors(&self) -> Vec<Arc<dyn Processor>> {
        self.processors.processors()
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn bubble(&self) -> bool {
        self.bubble
    }
}

impl Handler for HandlerAdapter {
    fn is_handling(&self, record: &LogRecord) -> bool {
        self.level.includes(record.level)
    }

    fn handle(&self, record: &LogRecord) -> Result<bool> {
        if !self.is_handling(record) {
            return Ok(false);
        }

        let record = self.processors.process(record.clone());

        // a sink that declines never stops propagation, whatever our bubble flag says
        if !self.handler.handle(&record)? {
            return Ok(false);
        }

        Ok(!self.bubble)
    }

    fn handle_batch(&self, records: &[LogRecord]) -> Result<()> {
        for record in records {
            self.handle(record)?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.handler.close()
    }

    fn reset(&self) -> Result<()> {
        self.handler.reset()?;
        self.processors.reset();
        Ok(())
    }

    fn name(&self) -> &str {
        self.handler.name()
    }
}

//! Handler forwarding records to another [`Logger`]

use crate::core::{ConfigurableHandler, Handler, HandlerOptions, Level, LogRecord, Logger, Result};
use std::sync::Arc;

/// Re-emits each accepted record through a [`Logger`].
///
/// The channel name and `extra` fields are not forwarded; the target logger
/// receives the level, message and context.
pub struct LoggerHandler {
    logger: Arc<dyn Logger>,
    options: HandlerOptions,
}

impl LoggerHandler {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_options(logger, Level::Debug, true)
    }

    pub fn with_options(logger: Arc<dyn Logger>, level: Level, bubble: bool) -> Self {
        Self {
            logger,
            options: HandlerOptions::new(level, bubble),
        }
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }
}

impl Handler for LoggerHandler {
    fn is_handling(&self, record: &LogRecord) -> bool {
        self.options.is_handling(record)
    }

    fn handle(&self, record: &LogRecord) -> Result<bool> {
        self.options.handle_with(record, |record| {
            self.logger
                .log(record.level, &record.message, &record.context)
        })
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.options.processors().reset();
        Ok(())
    }

    fn name(&self) -> &str {
        "logger"
    }

    fn as_configurable(&self) -> Option<&dyn ConfigurableHandler> {
        Some(&self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Channel, LogContext};
    use crate::handlers::TestHandler;

    #[test]
    fn test_forwards_level_message_and_context() {
        let sink = Arc::new(TestHandler::new());
        let target = Arc::new(Channel::new("target"));
        target.push_handler(sink.clone());

        let handler = LoggerHandler::with_options(target, Level::Notice, false);
        let record = LogRecord::new("source", Level::Error, "failed")
            .with_context(LogContext::new().with_field("code", 17));

        assert!(handler.handle(&record).unwrap());
        assert!(!handler
            .handle(&LogRecord::new("source", Level::Info, "quiet"))
            .unwrap());

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].channel, "target");
        assert_eq!(records[0].message, "failed");
        assert!(records[0].context.get("code").is_some());
    }
}

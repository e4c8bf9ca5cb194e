//! `log` crate integration
//!
//! Records emitted through `log::info!` and friends are forwarded to a
//! [`Logger`], usually a [`Channel`](crate::core::Channel). The record target
//! and module path end up in the context.

use crate::core::{Level, LogContext, Logger};
use std::sync::Arc;

pub struct LogFacadeBridge {
    logger: Arc<dyn Logger>,
    level: Level,
}

impl LogFacadeBridge {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            level: Level::Debug,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    fn max_level(&self) -> log::LevelFilter {
        match self.level {
            Level::Debug => log::LevelFilter::Trace,
            Level::Info | Level::Notice => log::LevelFilter::Info,
            Level::Warning => log::LevelFilter::Warn,
            _ => log::LevelFilter::Error,
        }
    }

    /// Install this bridge as the `log` crate's global logger.
    ///
    /// # Errors
    ///
    /// Fails if a global logger was already installed.
    pub fn try_install(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.max_level();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for LogFacadeBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.level.includes(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut context = LogContext::new().with_field("target", record.target());
        if let Some(module) = record.module_path() {
            context.add_field("module", module);
        }

        // the facade has no way to report failures
        let _ = self.logger.log(
            Level::from(record.level()),
            &record.args().to_string(),
            &context,
        );
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Channel;
    use crate::handlers::TestHandler;
    use log::Log;

    #[test]
    fn test_records_reach_channel() {
        let sink = Arc::new(TestHandler::new());
        let channel = Arc::new(Channel::new("facade"));
        channel.push_handler(sink.clone());
        let bridge = LogFacadeBridge::new(channel).with_level(Level::Info);

        bridge.log(
            &log::Record::builder()
                .args(format_args!("hidden"))
                .level(log::Level::Debug)
                .target("app")
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .args(format_args!("listening on {}", 8080))
                .level(log::Level::Warn)
                .target("app::server")
                .build(),
        );

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Warning);
        assert_eq!(records[0].message, "listening on 8080");
        assert_eq!(
            records[0].context.get("target").and_then(|v| v.as_str()),
            Some("app::server")
        );
    }
}

//! Adapters between the record-oriented and value-oriented logger shapes

use super::value::{LogValue, ValueLevel, ValueLogger};
use crate::core::processor::interpolate;
use crate::core::{Level, LogContext, Logger, Result};
use std::sync::Arc;

/// Lets a value-oriented caller log into a [`Logger`].
///
/// Messages pass through unchanged with an empty context. Exceptions are
/// logged as `"Class: message"` and carry the class in the `exception`
/// context field.
pub struct ValueToLoggerAdapter {
    logger: Arc<dyn Logger>,
}

impl ValueToLoggerAdapter {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }
}

impl ValueLogger for ValueToLoggerAdapter {
    fn log(&self, value: &LogValue, level: ValueLevel) -> Result<()> {
        match value {
            LogValue::Message(message) => {
                self.logger.log(level.to_level(), message, &LogContext::new())
            }
            LogValue::Exception { class, .. } => {
                let context = LogContext::new().with_field("exception", class.as_str());
                self.logger
                    .log(level.to_level(), &value.to_string(), &context)
            }
        }
    }
}

/// Lets record-oriented callers log into a [`ValueLogger`].
///
/// `{key}` placeholders are replaced with context values before the message
/// is forwarded; the rest of the context is dropped.
pub struct LoggerToValueAdapter {
    logger: Arc<dyn ValueLogger>,
}

impl LoggerToValueAdapter {
    pub fn new(logger: Arc<dyn ValueLogger>) -> Self {
        Self { logger }
    }
}

impl Logger for LoggerToValueAdapter {
    fn log(&self, level: Level, message: &str, context: &LogContext) -> Result<()> {
        let message = if context.is_empty() {
            message.to_string()
        } else {
            interpolate(message, context)
        };

        self.logger
            .log(&LogValue::Message(message), ValueLevel::from_level(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Channel;
    use crate::handlers::TestHandler;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingValueLogger {
        entries: Mutex<Vec<(String, ValueLevel)>>,
    }

    impl ValueLogger for RecordingValueLogger {
        fn log(&self, value: &LogValue, level: ValueLevel) -> Result<()> {
            self.entries.lock().push((value.to_string(), level));
            Ok(())
        }
    }

    #[test]
    fn test_value_to_logger_formats_exceptions() {
        let sink = Arc::new(TestHandler::new());
        let channel = Arc::new(Channel::new("app"));
        channel.push_handler(sink.clone());
        let adapter = ValueToLoggerAdapter::new(channel);

        adapter.log(&LogValue::from("plain"), ValueLevel::Info).unwrap();
        adapter
            .log(&LogValue::exception("IoError", "disk full"), ValueLevel::Exception)
            .unwrap();

        let records = sink.records();
        assert_eq!(records[0].level, Level::Info);
        assert!(records[0].context.is_empty());
        assert_eq!(records[1].level, Level::Error);
        assert_eq!(records[1].message, "IoError: disk full");
        assert_eq!(
            records[1].context.get("exception").and_then(|v| v.as_str()),
            Some("IoError")
        );
    }

    #[test]
    fn test_logger_to_value_interpolates_and_maps_levels() {
        let target = Arc::new(RecordingValueLogger::default());
        let adapter = LoggerToValueAdapter::new(target.clone());

        adapter
            .notice(
                "user {user} logged in",
                &LogContext::new().with_field("user", "alice"),
            )
            .unwrap();
        adapter.emergency("down", &LogContext::new()).unwrap();

        let entries = target.entries.lock();
        assert_eq!(
            entries[0],
            ("user alice logged in".to_string(), ValueLevel::Info)
        );
        assert_eq!(entries[1], ("down".to_string(), ValueLevel::Critical));
    }

    #[test]
    fn test_logger_to_value_interpolates_in_one_pass() {
        let target = Arc::new(RecordingValueLogger::default());
        let adapter = LoggerToValueAdapter::new(target.clone());

        let context = LogContext::new()
            .with_field("name", "{token}")
            .with_field("token", "hunter2");
        adapter.info("hello {name}", &context).unwrap();

        assert_eq!(target.entries.lock()[0].0, "hello {token}");
    }
}

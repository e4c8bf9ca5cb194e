//! Log record structure

use super::log_context::LogContext;
use super::log_level::Level;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single log event as it travels through processors and handlers.
///
/// Processors consume a record and return the next one; handlers only ever
/// see a shared reference, so a record handed to a sink is never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub datetime: DateTime<Utc>,
    pub channel: String,
    pub level: Level,
    pub message: String,
    pub context: LogContext,
    pub extra: LogContext,
}

impl LogRecord {
    pub fn new(channel: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            datetime: Utc::now(),
            channel: channel.into(),
            level,
            message: message.into(),
            context: LogContext::new(),
            extra: LogContext::new(),
        }
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_extra(mut self, extra: LogContext) -> Self {
        self.extra = extra;
        self
    }

    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = datetime;
        self
    }

    /// ISO-8601 timestamp with seconds precision and an explicit offset
    pub fn formatted_datetime(&self) -> String {
        self.datetime.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// JSON object shipped to remote services: the timestamp is exported
    /// under `dt` as an ISO-8601 string and no `datetime` key is emitted.
    pub fn to_shipping_value(&self) -> serde_json::Value {
        serde_json::json!({
            "message": self.message,
            "context": self.context.to_json_value(),
            "level": self.level.to_str(),
            "level_value": self.level.value(),
            "channel": self.channel,
            "extra": self.extra.to_json_value(),
            "dt": self.formatted_datetime(),
        })
    }
}

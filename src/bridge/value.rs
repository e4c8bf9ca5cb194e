//! Value-oriented logger interface
//!
//! Debugger-style loggers take a single value (a message or an error) and a
//! coarse level name instead of a message plus structured context. Error
//! reporting tools in a host application usually speak this shape; the
//! adapters in [`super::adapters`] translate between it and
//! [`Logger`](crate::core::Logger).

use crate::core::{Level, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Levels understood by value-oriented loggers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Exception,
    Critical,
}

impl ValueLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueLevel::Debug => "debug",
            ValueLevel::Info => "info",
            ValueLevel::Warning => "warning",
            ValueLevel::Error => "error",
            ValueLevel::Exception => "exception",
            ValueLevel::Critical => "critical",
        }
    }

    /// Record level used when the value is forwarded to a [`Logger`](crate::core::Logger)
    pub fn to_level(self) -> Level {
        match self {
            ValueLevel::Debug => Level::Debug,
            ValueLevel::Info => Level::Info,
            ValueLevel::Warning => Level::Warning,
            ValueLevel::Error | ValueLevel::Exception => Level::Error,
            ValueLevel::Critical => Level::Critical,
        }
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Debug => ValueLevel::Debug,
            Level::Info | Level::Notice => ValueLevel::Info,
            Level::Warning => ValueLevel::Warning,
            Level::Error => ValueLevel::Error,
            Level::Critical | Level::Alert | Level::Emergency => ValueLevel::Critical,
        }
    }
}

impl fmt::Display for ValueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a value-oriented logger is asked to log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogValue {
    Message(String),
    Exception { class: String, message: String },
}

impl LogValue {
    pub fn message(message: impl Into<String>) -> Self {
        LogValue::Message(message.into())
    }

    pub fn exception(class: impl Into<String>, message: impl Into<String>) -> Self {
        LogValue::Exception {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Build an exception value from any error, using its type name as the class
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        LogValue::exception(std::any::type_name::<E>(), error.to_string())
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Message(message) => f.write_str(message),
            LogValue::Exception { class, message } => write!(f, "{}: {}", class, message),
        }
    }
}

impl From<&str> for LogValue {
    fn from(message: &str) -> Self {
        LogValue::Message(message.to_string())
    }
}

impl From<String> for LogValue {
    fn from(message: String) -> Self {
        LogValue::Message(message)
    }
}

pub trait ValueLogger: Send + Sync {
    fn log(&self, value: &LogValue, level: ValueLevel) -> Result<()>;
}

/// Message sent by a mail-alerting logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: Option<String>,
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub trait Mailer: Send + Sync {
    fn send(&self, message: &MailMessage) -> Result<()>;
}

/// Mail-alert settings of a value-oriented logger.
///
/// These are the only members the lazy bridge proxies to its fallback logger:
/// `from_email`, `email_snooze`, `mailer` (read and write) and the
/// `default_mailer` call.
pub trait MailAlertOptions: Send + Sync {
    fn from_email(&self) -> Option<String>;

    fn set_from_email(&self, from_email: Option<String>);

    /// Minimal delay between two alert mails, e.g. `"2 days"`
    fn email_snooze(&self) -> Option<String>;

    fn set_email_snooze(&self, email_snooze: Option<String>);

    fn mailer(&self) -> Option<Arc<dyn Mailer>>;

    fn set_mailer(&self, mailer: Option<Arc<dyn Mailer>>);

    /// Send an alert mail about `value` to `email` with the default mailer
    fn default_mailer(&self, value: &LogValue, email: &str) -> Result<()>;
}

/// A value-oriented logger the bridge can fall back to for option access
pub trait FallbackLogger: ValueLogger + MailAlertOptions {}

impl<T: ValueLogger + MailAlertOptions> FallbackLogger for T {}

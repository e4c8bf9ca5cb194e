//! Record-oriented logger interface
//!
//! [`Logger`] is the shape application code logs through: a level, a message
//! and structured context. [`Channel`](super::channel::Channel) implements it,
//! and so can any foreign logger wired in through the service container.

use super::{error::Result, log_context::LogContext, log_level::Level};

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str, context: &LogContext) -> Result<()>;

    fn debug(&self, message: &str, context: &LogContext) -> Result<()> {
        self.log(Level::Debug, message, context)
    }

    fn info(&self, message: &str, context: &LogContext) -> Result<()> {
        self.log(Level::Info, message, context)
    }

    fn notice(&self, message: &str, context: &LogContext) -> Result<()> {
        self.log(Level::Notice, message, context)
    }

    fn warning(&self, message: &str, context: &LogContext) -> Result<()> {
        self.log(Level::Warning, message, context)
    }

    fn error(&self, message: &str, context: &LogContext) -> Result<()> {
        self.log(Level::Error, message, context)
    }

    fn critical(&self, message: &str, context: &LogContext) -> Result<()> {
        self.log(Level::Critical, message, context)
    }

    fn alert(&self, message: &str, context: &LogContext) -> Result<()> {
        self.log(Level::Alert, message, context)
    }

    fn emergency(&self, message: &str, context: &LogContext) -> Result<()> {
        self.log(Level::Emergency, message, context)
    }
}

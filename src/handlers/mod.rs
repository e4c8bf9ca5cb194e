//! Handler implementations

pub mod logger_handler;
pub mod logtail;
pub mod panel;

#[cfg(feature = "console")]
pub mod console;

pub use logger_handler::LoggerHandler;
pub use logtail::LogtailHandler;
pub use panel::PanelHandler;
pub use test::{ProcessingTestHandler, TestHandler};

#[cfg(feature = "console")]
pub use console::ConsoleHandler;

pub use crate::core::{ConfigurableHandler, Handler};

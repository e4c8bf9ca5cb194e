//! # Rust Log Bridge
//!
//! Configuration-driven logging pipelines with bridges between logger shapes.
//!
//! ## Features
//!
//! - **Channels**: named pipelines of processors and handlers
//! - **Handler adapter**: level, bubbling and processors for any sink
//! - **Assembly**: channels, handlers and processors wired from a config tree
//! - **Bridges**: value-oriented loggers, the `log` facade and Logtail shipping
//!
//! ```
//! use rust_log_bridge::prelude::*;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(TestHandler::new());
//! let channel = Channel::new("app");
//! channel.push_handler(Arc::new(HandlerAdapter::new(sink.clone(), Level::Warning, true, vec![])));
//!
//! channel.info("ignored").unwrap();
//! channel.error("kept").unwrap();
//! assert_eq!(sink.messages(), vec!["kept"]);
//! ```

pub mod bridge;
pub mod core;
pub mod di;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::bridge::{LogValue, ValueLevel, ValueLogger};
    pub use crate::core::{
        Channel, ConfigurableHandler, FieldValue, Handler, HandlerAdapter, Level, LogContext,
        LogRecord, Logger, LoggerError, Processor, Result,
    };
    pub use crate::di::{Container, LoggingConfig, LoggingExtension, ServiceLocator, ServiceRef};
    pub use crate::handlers::TestHandler;
}

pub use crate::core::{
    run_discarding, Channel, ChannelMetrics, ConfigurableHandler, FieldValue, FnProcessor,
    Handler, HandlerAdapter, HandlerOptions, Level, LogContext, LogRecord, Logger, LoggerError,
    MessagePlaceholderProcessor, MetricsSnapshot, Processor, ProcessorStack, Result,
    ShutdownHooks, TagProcessor, TransportError, UidProcessor,
};

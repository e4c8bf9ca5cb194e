//! Core pipeline types and traits

pub mod channel;
pub mod error;
pub mod handler;
pub mod handler_adapter;
pub mod log_context;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod processor;
pub mod record;
pub mod shutdown;

pub use channel::Channel;
pub use error::{LoggerError, Result, TransportError};
pub use handler::{ConfigurableHandler, Handler, HandlerOptions};
pub use handler_adapter::HandlerAdapter;
pub use log_context::{FieldValue, LogContext};
pub use log_level::Level;
pub use logger::Logger;
pub use metrics::{ChannelMetrics, MetricsSnapshot};
pub use processor::{
    FnProcessor, MessagePlaceholderProcessor, Processor, ProcessorStack, TagProcessor,
    UidProcessor,
};
pub use record::LogRecord;
pub use shutdown::{run_discarding, ShutdownHooks};

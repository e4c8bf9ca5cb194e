//! Service container and configuration-driven assembly

pub mod config;
pub mod container;
pub mod extension;
pub mod filter;
pub mod flusher;
pub mod static_getter;

pub use config::{
    Autowired, BridgeConfig, ChannelConfig, HandlerConfig, HandlerLevelConfig, LevelConfig,
    LoggingConfig, DEFAULT_FALLBACK_SERVICE, FALLBACK_HANDLER, PANEL_HANDLER,
};
pub use container::{Container, ServiceLocator, ServiceMap, ServiceRef};
pub use extension::{ChannelConstructor, LoggingExtension};
pub use filter::{filter_definitions, filter_to_keys, FilterSpec};
pub use flusher::LogFlusher;
pub use static_getter::{LoggerGetter, StaticLoggerGetter};

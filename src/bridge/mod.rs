//! Bridges between logger shapes and to external services

pub mod adapters;
pub mod lazy;
pub mod log_facade;
pub mod logtail;
pub mod value;

pub use adapters::{LoggerToValueAdapter, ValueToLoggerAdapter};
pub use lazy::LazyBridgeLogger;
pub use log_facade::LogFacadeBridge;
pub use logtail::{HttpRequest, HttpResponse, HttpTransport, LogtailClient, DEFAULT_URI};
pub use value::{
    FallbackLogger, LogValue, MailAlertOptions, MailMessage, Mailer, ValueLevel, ValueLogger,
};

#[cfg(feature = "reqwest-transport")]
pub use logtail::ReqwestTransport;

//! Formatting shorthands for channels
//!
//! The macros format their arguments like `format!` and log the message on a
//! [`Channel`](crate::Channel). Context fields can follow the message after a
//! `;` as `key => value` pairs, in which case the message is used as is and
//! its `{key}` placeholders are left to processors. The macros evaluate to
//! the `Result` returned by the channel.
//!
//! # Examples
//!
//! ```
//! use rust_log_bridge::prelude::*;
//! use rust_log_bridge::{info, warning};
//!
//! let channel = Channel::new("app");
//!
//! info!(channel, "Server started").unwrap();
//!
//! let port = 8080;
//! warning!(channel, "Port {} is already in use", port).unwrap();
//! info!(channel, "User {user} logged in"; "user" => "alice", "admin" => false).unwrap();
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use rust_log_bridge::prelude::*;
/// # let channel = Channel::new("app");
/// use rust_log_bridge::log;
/// log!(channel, Level::Info, "Simple message").unwrap();
/// log!(channel, Level::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $message:expr; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log(
            $level,
            $message,
            $crate::LogContext::new()$(.with_field($key, $value))+,
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::LogContext::new())
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Notice, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_bridge::prelude::*;
/// # let channel = Channel::new("app");
/// use rust_log_bridge::error;
/// error!(channel, "Connection lost to {}", "db-1").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Alert, $($arg)+)
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Emergency, $($arg)+)
    };
}

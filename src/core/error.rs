//! Error types for the log bridge

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Failure reported by an [`HttpTransport`](crate::bridge::logtail::HttpTransport)
/// before any HTTP status was received (DNS, connect, TLS, timeouts).
#[derive(Debug, thiserror::Error)]
#[error("HTTP transport failed: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid configuration, detected once while assembling the service graph
    #[error("Invalid configuration of '{path}': {message}")]
    Configuration { path: String, message: String },

    /// No service is registered under the key
    #[error("Service '{key}' is not registered")]
    ServiceNotFound { key: String },

    /// A service exists but lacks the capability the caller needs
    #[error("Service '{key}' is expected to be {expected}, '{actual}' given")]
    ServiceType {
        key: String,
        expected: String,
        actual: String,
    },

    /// Access to a proxied member without a fallback object to delegate to
    #[error("{0}")]
    MemberInaccessible(String),

    /// Operation called in a state that does not allow it
    #[error("{0}")]
    InvalidState(String),

    /// Remote shipping endpoint answered with an error status
    #[error("Logtail returned an error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// Network-level failure, passed through as reported by the transport
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Sink-specific failure while handling a record
    #[error("Handler '{handler}' failed: {message}")]
    Handler { handler: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a configuration error for the given option path
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn service_not_found(key: impl Into<String>) -> Self {
        LoggerError::ServiceNotFound { key: key.into() }
    }

    /// Create an error for a service that does not provide the expected capability
    pub fn service_type(
        key: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        LoggerError::ServiceType {
            key: key.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn member_inaccessible<S: Into<String>>(msg: S) -> Self {
        LoggerError::MemberInaccessible(msg.into())
    }

    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        LoggerError::InvalidState(msg.into())
    }

    /// Create an error for an HTTP error status returned by the remote endpoint
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        LoggerError::Remote {
            status,
            body: body.into(),
        }
    }

    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Handler {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

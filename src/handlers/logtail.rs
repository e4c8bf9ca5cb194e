//! Buffering Logtail handler

use crate::bridge::logtail::LogtailClient;
use crate::core::{
    run_discarding, ConfigurableHandler, Handler, HandlerOptions, Level, LogRecord, Result,
};
use parking_lot::Mutex;
use serde_json::Value;

/// Buffers accepted records and ships them to Logtail in one batch.
///
/// The buffer is flushed by `close` and `reset`, i.e. once per request in a
/// request/response host and once at the end in a long-running process. When
/// the handler is dropped it attempts a last flush and ignores any failure.
pub struct LogtailHandler {
    client: LogtailClient,
    options: HandlerOptions,
    buffer: Mutex<Vec<Value>>,
}

impl LogtailHandler {
    pub fn new(client: LogtailClient) -> Self {
        Self::with_options(client, Level::Debug, true)
    }

    pub fn with_options(client: LogtailClient, level: Level, bubble: bool) -> Self {
        Self {
            client,
            options: HandlerOptions::new(level, bubble),
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn client(&self) -> &LogtailClient {
        &self.client
    }

    /// Number of records waiting for the next flush
    pub fn buffered(&self) -> usize {
        self.buffer.lock().len()
    }

    fn flush(&self) -> Result<()> {
        let records = std::mem::take(&mut *self.buffer.lock());
        if records.is_empty() {
            return Ok(());
        }

        let shipped = self.client.log_batch(&records);
        if shipped.is_err() {
            // unsent records go back in front of anything buffered meanwhile
            let mut records = records;
            let mut buffer = self.buffer.lock();
            records.append(&mut buffer);
            *buffer = records;
        }
        shipped
    }
}

impl Handler for LogtailHandler {
    fn is_handling(&self, record: &LogRecord) -> bool {
        self.options.is_handling(record)
    }

    fn handle(&self, record: &LogRecord) -> Result<bool> {
        self.options.handle_with(record, |record| {
            self.buffer.lock().push(record.to_shipping_value());
            Ok(())
        })
    }

    fn close(&self) -> Result<()> {
        self.flush()
    }

    fn reset(&self) -> Result<()> {
        let flushed = self.flush();
        self.options.processors().reset();
        flushed
    }

    fn name(&self) -> &str {
        "logtail"
    }

    fn as_configurable(&self) -> Option<&dyn ConfigurableHandler> {
        Some(&self.options)
    }
}

impl Drop for LogtailHandler {
    fn drop(&mut self) {
        run_discarding(|| self.close());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::logtail::{HttpRequest, HttpResponse, HttpTransport};
    use crate::core::TransportError;
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingTransport {
        bodies: parking_lot::Mutex<Vec<String>>,
        status: u16,
    }

    impl HttpTransport for CountingTransport {
        fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            self.bodies.lock().push(request.body);
            Ok(HttpResponse::new(self.status, "nope"))
        }
    }

    #[test]
    fn test_flushes_once_per_reset() {
        let transport = Arc::new(CountingTransport {
            status: 202,
            ..Default::default()
        });
        let handler = LogtailHandler::new(LogtailClient::new("token", transport.clone()));

        handler.handle(&LogRecord::new("app", Level::Info, "one")).unwrap();
        handler.handle(&LogRecord::new("app", Level::Info, "two")).unwrap();
        assert_eq!(handler.buffered(), 2);

        handler.reset().unwrap();
        handler.reset().unwrap();
        assert_eq!(handler.buffered(), 0);

        let bodies = transport.bodies.lock();
        assert_eq!(bodies.len(), 1);
        let shipped: Vec<Value> = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(shipped.len(), 2);
        assert_eq!(shipped[1]["message"], "two");
        assert!(shipped[1].get("dt").is_some());
        assert!(shipped[1].get("datetime").is_none());
    }

    #[test]
    fn test_drop_discards_flush_errors() {
        let transport = Arc::new(CountingTransport {
            status: 500,
            ..Default::default()
        });
        let handler = LogtailHandler::new(LogtailClient::new("token", transport.clone()));
        handler.handle(&LogRecord::new("app", Level::Error, "lost")).unwrap();

        drop(handler);
        assert_eq!(transport.bodies.lock().len(), 1);
    }
}

//! Debug panel collector

use crate::core::{ConfigurableHandler, Handler, HandlerOptions, Level, LogRecord, Result};
use parking_lot::RwLock;
use serde_json::Value;

/// Collects records for display in a development debug panel.
///
/// Records are kept as their shipping form for the lifetime of the handler;
/// `reset` starts a new collection.
#[derive(Debug, Default)]
pub struct PanelHandler {
    options: HandlerOptions,
    records: RwLock<Vec<Value>>,
}

impl PanelHandler {
    pub fn new(level: Level, bubble: bool) -> Self {
        Self {
            options: HandlerOptions::new(level, bubble),
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Number of collected records, shown on the panel tab
    pub fn count(&self) -> usize {
        self.records.read().len()
    }
}

impl Handler for PanelHandler {
    fn is_handling(&self, record: &LogRecord) -> bool {
        self.options.is_handling(record)
    }

    fn handle(&self, record: &LogRecord) -> Result<bool> {
        self.options.handle_with(record, |record| {
            self.records.write().push(record.to_shipping_value());
            Ok(())
        })
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.records.write().clear();
        self.options.processors().reset();
        Ok(())
    }

    fn name(&self) -> &str {
        "panel"
    }

    fn as_configurable(&self) -> Option<&dyn ConfigurableHandler> {
        Some(&self.options)
    }
}

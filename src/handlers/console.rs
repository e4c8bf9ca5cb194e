//! Console handler implementation

use crate::core::{ConfigurableHandler, Handler, HandlerOptions, Level, LogRecord, Result};
use colored::Colorize;

/// Writes one text line per record: error and above go to stderr, the rest
/// to stdout.
#[derive(Debug)]
pub struct ConsoleHandler {
    use_colors: bool,
    options: HandlerOptions,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            options: HandlerOptions::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            options: HandlerOptions::default(),
        }
    }

    /// Format a record as a single text line
    pub fn format_line(&self, record: &LogRecord) -> String {
        let level_str = if self.use_colors {
            format!("{:9}", record.level.to_str())
                .color(record.level.color_code())
                .to_string()
        } else {
            format!("{:9}", record.level.to_str())
        };

        let mut line = format!(
            "[{}] {}.{} {}",
            record.formatted_datetime(),
            record.channel,
            level_str,
            record.message
        );
        if !record.context.is_empty() {
            line.push(' ');
            line.push_str(&record.context.format_fields());
        }
        if !record.extra.is_empty() {
            line.push(' ');
            line.push_str(&record.extra.format_fields());
        }
        line
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ConsoleHandler {
    fn is_handling(&self, record: &LogRecord) -> bool {
        self.options.is_handling(record)
    }

    fn handle(&self, record: &LogRecord) -> Result<bool> {
        self.options.handle_with(record, |record| {
            let output = self.format_line(&record);

            if Level::Error.includes(record.level) {
                eprintln!("{}", output);
            } else {
                println!("{}", output);
            }
            Ok(())
        })
    }

    fn close(&self) -> Result<()> {
        use std::io::Write;
        // both streams are written to
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn as_configurable(&self) -> Option<&dyn ConfigurableHandler> {
        Some(&self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogContext;

    #[test]
    fn test_plain_line_format() {
        let handler = ConsoleHandler::with_colors(false);
        let record = LogRecord::new("app", Level::Notice, "ready")
            .with_context(LogContext::new().with_field("port", 8080));

        let line = handler.format_line(&record);
        assert!(line.contains("app.NOTICE"));
        assert!(line.ends_with("ready port=8080"));
    }
}

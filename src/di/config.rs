//! Logging configuration tree
//!
//! The configuration is a plain serde document (camelCase keys) so hosts can
//! load it from whatever format they already use. Maps keep their declared
//! order, which is also the order handlers and processors are attached in.
//!
//! ```
//! use rust_log_bridge::di::LoggingConfig;
//!
//! let config = LoggingConfig::from_json_str(r#"{
//!     "debug": false,
//!     "channels": { "main": { "autowired": true } },
//!     "handlers": { "memory": { "service": "app.memoryHandler" } }
//! }"#).unwrap();
//!
//! assert!(config.validate("log").is_ok());
//! ```

use super::filter::{filter_definitions, filter_to_keys, FilterSpec};
use crate::core::{Level, LoggerError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Handler backed by the value-logger bridge (`bridge.toFallback`)
pub const FALLBACK_HANDLER: &str = "fallbackLogger";
/// Handler feeding the debug panel (`bridge.panel`)
pub const PANEL_HANDLER: &str = "panel";
pub const RESERVED_HANDLERS: [&str; 2] = [FALLBACK_HANDLER, PANEL_HANDLER];

pub const DEFAULT_FALLBACK_SERVICE: &str = "fallback.logger";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoggingConfig {
    pub debug: bool,
    #[serde(default)]
    pub level: LevelConfig,
    #[serde(default)]
    pub channels: IndexMap<String, ChannelConfig>,
    #[serde(default)]
    pub handlers: IndexMap<String, HandlerConfig>,
    /// Processor name to the service key of the processor
    #[serde(default)]
    pub processors: IndexMap<String, String>,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub static_getter: Option<String>,
}

/// Default handler levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelConfig {
    pub debug: Level,
    pub production: Level,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            debug: Level::Debug,
            production: Level::Warning,
        }
    }
}

/// `true`/`false`, or the name of a registered channel type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Autowired {
    Enabled(bool),
    Type(String),
}

impl Autowired {
    pub fn is_autowired(&self) -> bool {
        !matches!(self, Autowired::Enabled(false))
    }

    pub fn channel_type(&self) -> Option<&str> {
        match self {
            Autowired::Type(name) => Some(name.as_str()),
            Autowired::Enabled(_) => None,
        }
    }
}

impl Default for Autowired {
    fn default() -> Self {
        Autowired::Enabled(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    pub autowired: Autowired,
    pub handlers: FilterSpec,
    pub processors: FilterSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerConfig {
    pub enabled: bool,
    /// Service key of the sink; reserved handlers get theirs assigned
    pub service: Option<String>,
    pub level: HandlerLevelConfig,
    pub bubble: bool,
    /// Processor name to service key, in execution order
    pub processors: IndexMap<String, String>,
}

impl HandlerConfig {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            ..Self::default()
        }
    }

    /// Configuration of a handler whose sink is provided by the bridge itself
    pub fn reserved() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, debug: Option<Level>, production: Option<Level>) -> Self {
        self.level = HandlerLevelConfig { debug, production };
        self
    }

    #[must_use]
    pub fn with_bubble(mut self, bubble: bool) -> Self {
        self.bubble = bubble;
        self
    }

    #[must_use]
    pub fn with_processor(mut self, name: impl Into<String>, service: impl Into<String>) -> Self {
        self.processors.insert(name.into(), service.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service: None,
            level: HandlerLevelConfig::default(),
            bubble: true,
            processors: IndexMap::new(),
        }
    }
}

/// Per-handler levels; `None` falls back to [`LevelConfig`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerLevelConfig {
    pub debug: Option<Level>,
    pub production: Option<Level>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BridgeConfig {
    /// Channels receiving everything logged through the fallback logger
    pub from_fallback: Vec<String>,
    /// Forward channel records to the fallback logger
    pub to_fallback: bool,
    /// Collect records for the debug panel
    pub panel: bool,
    pub fallback_service: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            from_fallback: Vec::new(),
            to_fallback: false,
            panel: false,
            fallback_service: DEFAULT_FALLBACK_SERVICE.to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            level: LevelConfig::default(),
            channels: IndexMap::new(),
            handlers: IndexMap::new(),
            processors: IndexMap::new(),
            bridge: BridgeConfig::default(),
            static_getter: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_channel(mut self, name: impl Into<String>, channel: ChannelConfig) -> Self {
        self.channels.insert(name.into(), channel);
        self
    }

    #[must_use]
    pub fn with_handler(mut self, name: impl Into<String>, handler: HandlerConfig) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    #[must_use]
    pub fn with_processor(mut self, name: impl Into<String>, service: impl Into<String>) -> Self {
        self.processors.insert(name.into(), service.into());
        self
    }

    /// Level used by handlers without their own level
    pub fn default_level(&self) -> Level {
        if self.debug {
            self.level.debug
        } else {
            self.level.production
        }
    }

    /// Level of one handler in the current mode
    pub fn handler_level(&self, handler: &HandlerConfig) -> Level {
        let level = if self.debug {
            handler.level.debug
        } else {
            handler.level.production
        };
        level.unwrap_or_else(|| self.default_level())
    }

    /// Enabled handlers in attachment order.
    ///
    /// Bridge handlers come first (`fallbackLogger`, then `panel`) and are
    /// added even when not configured explicitly.
    pub fn effective_handlers(&self) -> IndexMap<String, HandlerConfig> {
        let mut handlers = IndexMap::new();

        let reserved = [
            (FALLBACK_HANDLER, self.bridge.to_fallback),
            (PANEL_HANDLER, self.bridge.panel),
        ];
        for (name, active) in reserved {
            if active {
                let config = self.handlers.get(name).cloned().unwrap_or_default();
                handlers.insert(name.to_string(), config);
            }
        }

        for (name, config) in &self.handlers {
            if !RESERVED_HANDLERS.contains(&name.as_str()) {
                handlers.insert(name.clone(), config.clone());
            }
        }

        handlers.retain(|_, config| config.enabled);
        handlers
    }

    /// Check every rule that does not depend on registered services
    pub fn validate(&self, name: &str) -> Result<()> {
        for handler_name in RESERVED_HANDLERS {
            if let Some(handler) = self.handlers.get(handler_name) {
                if handler.service.is_some() {
                    return Err(LoggerError::config(
                        format!("{} > handlers > {} > service", name, handler_name),
                        "This option is reserved and cannot be changed.",
                    ));
                }
            }
        }

        if !self.bridge.to_fallback && self.handlers.contains_key(FALLBACK_HANDLER) {
            return Err(LoggerError::config(
                format!("{} > handlers > {}", name, FALLBACK_HANDLER),
                format!(
                    "This option is reserved for the fallback handler and can be configured only when '{} > bridge > toFallback' is enabled.",
                    name
                ),
            ));
        }

        if !self.bridge.panel && self.handlers.contains_key(PANEL_HANDLER) {
            return Err(LoggerError::config(
                format!("{} > handlers > {}", name, PANEL_HANDLER),
                format!(
                    "This option is reserved for the panel handler and can be configured only when '{} > bridge > panel' is enabled.",
                    name
                ),
            ));
        }

        for (handler_name, handler) in &self.handlers {
            if !RESERVED_HANDLERS.contains(&handler_name.as_str()) && handler.service.is_none() {
                return Err(LoggerError::config(
                    format!("{} > handlers > {} > service", name, handler_name),
                    "Handler service is required.",
                ));
            }
        }

        let autowired: Vec<&str> = self
            .channels
            .iter()
            .filter(|(_, channel)| channel.autowired.is_autowired())
            .map(|(channel_name, _)| channel_name.as_str())
            .collect();
        if autowired.len() > 1 {
            return Err(LoggerError::config(
                format!("{} > channels", name),
                format!("Only one channel can be autowired, '{}' given.", autowired.join(", ")),
            ));
        }

        let handlers = self.effective_handlers();
        for (channel_name, channel) in &self.channels {
            filter_definitions(
                &handlers,
                &channel.handlers,
                &format!("{} > channels > {} > handlers", name, channel_name),
                "handlers",
            )?;
            filter_definitions(
                &self.processors,
                &channel.processors,
                &format!("{} > channels > {} > processors", name, channel_name),
                "processors",
            )?;
        }

        filter_to_keys(
            &self.channels,
            &self.bridge.from_fallback,
            &format!("{} > bridge > fromFallback", name),
            "channels",
        )?;

        if let Some(channel_name) = &self.static_getter {
            if !self.channels.contains_key(channel_name) {
                return Err(LoggerError::config(
                    format!("{} > staticGetter", name),
                    format!("Given channel name '{}' is unknown.", channel_name),
                ));
            }
        }

        Ok(())
    }
}

//! Configuration-driven assembly of the logging service graph
//!
//! [`LoggingExtension::load`] validates a [`LoggingConfig`] and registers
//! lazily created services in a [`Container`]:
//!
//! | key                                | service                      |
//! |------------------------------------|------------------------------|
//! | `{prefix}.channel.{name}`          | [`Channel`]                  |
//! | `{prefix}.handler.{name}`          | configured sink or adapter   |
//! | `{prefix}.logFlusher`              | [`LogFlusher`]               |
//! | `{prefix}.bridge.loggerToFallback` | [`LoggerToValueAdapter`]     |
//! | `{prefix}.bridge.fallbackToLogger` | [`LazyBridgeLogger`]         |
//!
//! Nothing is instantiated during `load`; services are built on first
//! resolution.

use super::config::{HandlerConfig, LoggingConfig, FALLBACK_HANDLER, PANEL_HANDLER};
use super::container::{Container, ServiceLocator, ServiceMap, ServiceRef};
use super::filter::{filter_definitions, filter_to_keys};
use super::flusher::LogFlusher;
use super::static_getter::StaticLoggerGetter;
use crate::bridge::{LazyBridgeLogger, LoggerToValueAdapter};
use crate::core::{Channel, HandlerAdapter, Level, LoggerError, Processor, Result, ShutdownHooks};
use crate::handlers::{LoggerHandler, PanelHandler};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds an empty channel of a custom type for the given channel name
pub type ChannelConstructor = Arc<dyn Fn(&str) -> Channel + Send + Sync>;

pub struct LoggingExtension {
    prefix: String,
    config: LoggingConfig,
    channel_types: HashMap<String, ChannelConstructor>,
}

/// Where a handler's sink comes from
#[derive(Clone)]
enum SinkSource {
    Service(String),
    Fallback(String),
    Panel,
}

impl LoggingExtension {
    pub fn new(prefix: impl Into<String>, config: LoggingConfig) -> Self {
        Self {
            prefix: prefix.into(),
            config,
            channel_types: HashMap::new(),
        }
    }

    /// Make `name` usable as the `autowired` value of a channel
    #[must_use]
    pub fn with_channel_type<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&str) -> Channel + Send + Sync + 'static,
    {
        self.channel_types
            .insert(name.into(), Arc::new(constructor));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    pub fn channel_key(&self, name: &str) -> String {
        format!("{}.channel.{}", self.prefix, name)
    }

    pub fn handler_key(&self, name: &str) -> String {
        format!("{}.handler.{}", self.prefix, name)
    }

    pub fn flusher_key(&self) -> String {
        format!("{}.logFlusher", self.prefix)
    }

    pub fn logger_to_fallback_key(&self) -> String {
        format!("{}.bridge.loggerToFallback", self.prefix)
    }

    pub fn fallback_to_logger_key(&self) -> String {
        format!("{}.bridge.fallbackToLogger", self.prefix)
    }

    /// Validate the configuration against `container` without registering anything
    pub fn validate(&self, container: &Container) -> Result<()> {
        let name = self.prefix.as_str();
        self.config.validate(name)?;

        for (channel_name, channel) in &self.config.channels {
            if let Some(channel_type) = channel.autowired.channel_type() {
                if !self.channel_types.contains_key(channel_type) {
                    return Err(LoggerError::config(
                        format!("{} > channels > {} > autowired", name, channel_name),
                        format!(
                            "'autowired' expects bool or name of a registered channel type, '{}' given.",
                            channel_type
                        ),
                    ));
                }
            }
        }

        for (handler_name, handler) in self.config.effective_handlers() {
            if let Some(service) = &handler.service {
                require_registered(
                    container,
                    service,
                    &format!("{} > handlers > {} > service", name, handler_name),
                )?;
            }
            for (processor_name, service) in &handler.processors {
                require_registered(
                    container,
                    service,
                    &format!(
                        "{} > handlers > {} > processors > {}",
                        name, handler_name, processor_name
                    ),
                )?;
            }
        }

        for (processor_name, service) in &self.config.processors {
            require_registered(
                container,
                service,
                &format!("{} > processors > {}", name, processor_name),
            )?;
        }

        let bridge = &self.config.bridge;
        let options = [
            ("toFallback", bridge.to_fallback),
            ("fromFallback", !bridge.from_fallback.is_empty()),
        ];
        for (option, enabled) in options {
            if enabled && !container.has(&bridge.fallback_service) {
                return Err(LoggerError::config(
                    format!("{} > bridge > {}", name, option),
                    format!(
                        "Option requires the fallback logger to be registered as service '{}'.",
                        bridge.fallback_service
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Validate the configuration and register all services.
    ///
    /// With `hooks`, a callback resetting every created channel is registered
    /// for the host's shutdown.
    pub fn load(&self, container: &Arc<Container>, hooks: Option<&ShutdownHooks>) -> Result<()> {
        self.validate(container)?;

        let locator: Arc<dyn ServiceLocator> = container.clone();
        let handlers = self.register_handlers(container);
        let channels = self.register_channels(container, &handlers)?;

        let flusher_key = self.flusher_key();
        let flusher_map = ServiceMap::new(&locator, channels.clone());
        container.register(flusher_key.clone(), move |_| {
            Ok(ServiceRef::new(Arc::new(LogFlusher::new(flusher_map.clone()))))
        });

        self.register_bridges(container, &locator, &channels)?;

        if let Some(channel_name) = &self.config.static_getter {
            StaticLoggerGetter::set(self.channel_key(channel_name), locator.clone());
        }

        if let Some(hooks) = hooks {
            let container = Arc::downgrade(container);
            let key = flusher_key.clone();
            hooks.on_shutdown(flusher_key, move || {
                let Some(container) = container.upgrade() else {
                    return Ok(());
                };
                container.resolve(&key)?.require::<LogFlusher>(&key)?.reset()
            });
        }

        Ok(())
    }

    /// The channel flagged as `autowired`, created on demand
    pub fn autowired_channel(&self, locator: &dyn ServiceLocator) -> Result<Arc<Channel>> {
        let name = self
            .config
            .channels
            .iter()
            .find(|(_, channel)| channel.autowired.is_autowired())
            .map(|(name, _)| name)
            .ok_or_else(|| {
                LoggerError::service_not_found(format!("{}.channel (autowired)", self.prefix))
            })?;

        let key = self.channel_key(name);
        locator.resolve(&key)?.require::<Channel>(&key)
    }

    /// Register `{prefix}.handler.{name}` services, returning name -> key
    fn register_handlers(&self, container: &Container) -> IndexMap<String, String> {
        let mut keys = IndexMap::new();

        for (name, handler) in self.config.effective_handlers() {
            let source = match name.as_str() {
                FALLBACK_HANDLER => SinkSource::Fallback(self.logger_to_fallback_key()),
                PANEL_HANDLER => SinkSource::Panel,
                _ => match &handler.service {
                    Some(service) => SinkSource::Service(service.clone()),
                    None => continue,
                },
            };

            let key = self.handler_key(&name);
            let level = self.config.handler_level(&handler);
            let setup = HandlerSetup::new(source, level, &handler);
            container.register(key.clone(), move |c| setup.build(c));
            keys.insert(name, key);
        }

        keys
    }

    /// Register `{prefix}.channel.{name}` services, returning name -> key
    fn register_channels(
        &self,
        container: &Container,
        handlers: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>> {
        let name = self.prefix.as_str();
        let mut keys = IndexMap::new();

        for (channel_name, channel) in &self.config.channels {
            let handler_keys: Vec<String> = filter_definitions(
                handlers,
                &channel.handlers,
                &format!("{} > channels > {} > handlers", name, channel_name),
                "handlers",
            )?
            .into_values()
            .collect();

            let processor_keys: Vec<String> = filter_definitions(
                &self.config.processors,
                &channel.processors,
                &format!("{} > channels > {} > processors", name, channel_name),
                "processors",
            )?
            .into_values()
            .collect();

            let constructor = channel
                .autowired
                .channel_type()
                .and_then(|channel_type| self.channel_types.get(channel_type).cloned());

            let key = self.channel_key(channel_name);
            let logger_name = channel_name.clone();
            container.register(key.clone(), move |c| {
                let channel = match &constructor {
                    Some(constructor) => constructor(logger_name.as_str()),
                    None => Channel::new(logger_name.as_str()),
                };

                let handlers = handler_keys
                    .iter()
                    .map(|key| c.resolve(key)?.require_handler(key))
                    .collect::<Result<Vec<_>>>()?;
                channel.set_handlers(handlers);

                for key in processor_keys.iter().rev() {
                    channel.push_processor(c.resolve(key)?.require_processor(key)?);
                }

                Ok(ServiceRef::logger(Arc::new(channel)))
            });
            keys.insert(channel_name.clone(), key);
        }

        Ok(keys)
    }

    fn register_bridges(
        &self,
        container: &Container,
        locator: &Arc<dyn ServiceLocator>,
        channels: &IndexMap<String, String>,
    ) -> Result<()> {
        let bridge = &self.config.bridge;

        if bridge.to_fallback {
            let fallback = bridge.fallback_service.clone();
            container.register(self.logger_to_fallback_key(), move |c| {
                let target = c.resolve(&fallback)?.require_value_logger(&fallback)?;
                Ok(ServiceRef::logger(Arc::new(LoggerToValueAdapter::new(target))))
            });
        }

        if !bridge.from_fallback.is_empty() {
            let selected = filter_to_keys(
                channels,
                &bridge.from_fallback,
                &format!("{} > bridge > fromFallback", self.prefix),
                "channels",
            )?;
            let services = ServiceMap::new(locator, selected);
            let fallback = bridge.fallback_service.clone();

            container.register(self.fallback_to_logger_key(), move |c| {
                let mut logger = LazyBridgeLogger::new(services.clone());
                if let Some(original) = c.resolve(&fallback)?.as_fallback_logger() {
                    logger = logger.with_fallback(original);
                }
                Ok(ServiceRef::value_logger(Arc::new(logger)))
            });
        }

        Ok(())
    }
}

impl fmt::Debug for LoggingExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingExtension")
            .field("prefix", &self.prefix)
            .field("config", &self.config)
            .field("channel_types", &self.channel_types.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn require_registered(container: &Container, service: &str, option_path: &str) -> Result<()> {
    if container.has(service) {
        return Ok(());
    }
    Err(LoggerError::config(
        option_path,
        format!("Service '{}' is not registered.", service),
    ))
}

/// Everything needed to build one configured handler
struct HandlerSetup {
    source: SinkSource,
    level: Level,
    bubble: bool,
    processors: Vec<String>,
}

impl HandlerSetup {
    fn new(source: SinkSource, level: Level, config: &HandlerConfig) -> Self {
        Self {
            source,
            level,
            bubble: config.bubble,
            processors: config.processors.values().cloned().collect(),
        }
    }

    fn sink(&self, container: &Container) -> Result<ServiceRef> {
        match &self.source {
            SinkSource::Service(key) => container.resolve(key),
            SinkSource::Fallback(key) => {
                let logger = container.resolve(key)?.require_logger(key)?;
                Ok(ServiceRef::handler(Arc::new(LoggerHandler::new(logger))))
            }
            SinkSource::Panel => Ok(ServiceRef::handler(Arc::new(PanelHandler::default()))),
        }
    }

    fn build(&self, container: &Container) -> Result<ServiceRef> {
        let service = self.sink(container)?;
        let key = match &self.source {
            SinkSource::Service(key) => key.as_str(),
            SinkSource::Fallback(_) => FALLBACK_HANDLER,
            SinkSource::Panel => PANEL_HANDLER,
        };
        let handler = service.require_handler(key)?;

        let processors = self
            .processors
            .iter()
            .map(|key| container.resolve(key)?.require_processor(key))
            .collect::<Result<Vec<Arc<dyn Processor>>>>()?;

        if let Some(configurable) = handler.as_configurable() {
            if processors.is_empty() || configurable.supports_processors() {
                configurable.set_level(self.level);
                configurable.set_bubble(self.bubble);
                for processor in processors.into_iter().rev() {
                    configurable.push_processor(processor);
                }
                return Ok(service);
            }
        }

        let adapter = HandlerAdapter::new(handler, self.level, self.bubble, processors);
        Ok(ServiceRef::handler(Arc::new(adapter)))
    }
}

//! Minimal service locator
//!
//! Services are registered under string keys, either as ready instances or as
//! factories run on first resolution. A resolved service is a [`ServiceRef`]:
//! the type-erased instance plus the capability views it was registered with,
//! so callers can ask "is this a logger?" without knowing the concrete type.

use crate::bridge::value::{FallbackLogger, ValueLogger};
use crate::core::{Handler, Logger, LoggerError, Processor, Result};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// A resolved service instance
#[derive(Clone)]
pub struct ServiceRef {
    type_name: &'static str,
    instance: Arc<dyn Any + Send + Sync>,
    logger: Option<Arc<dyn Logger>>,
    handler: Option<Arc<dyn Handler>>,
    processor: Option<Arc<dyn Processor>>,
    value_logger: Option<Arc<dyn ValueLogger>>,
    fallback_logger: Option<Arc<dyn FallbackLogger>>,
}

impl ServiceRef {
    /// Wrap an instance without any capability view
    pub fn new<T: Any + Send + Sync>(instance: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            instance,
            logger: None,
            handler: None,
            processor: None,
            value_logger: None,
            fallback_logger: None,
        }
    }

    pub fn logger<T: Logger + 'static>(instance: Arc<T>) -> Self {
        Self::new(instance.clone()).with_logger(instance)
    }

    pub fn handler<T: Handler + 'static>(instance: Arc<T>) -> Self {
        Self::new(instance.clone()).with_handler(instance)
    }

    pub fn processor<T: Processor + 'static>(instance: Arc<T>) -> Self {
        Self::new(instance.clone()).with_processor(instance)
    }

    pub fn value_logger<T: ValueLogger + 'static>(instance: Arc<T>) -> Self {
        Self::new(instance.clone()).with_value_logger(instance)
    }

    /// A fallback logger is also usable as a plain value logger
    pub fn fallback_logger<T: FallbackLogger + 'static>(instance: Arc<T>) -> Self {
        Self::new(instance.clone())
            .with_value_logger(instance.clone())
            .with_fallback_logger(instance)
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    #[must_use]
    pub fn with_processor(mut self, processor: Arc<dyn Processor>) -> Self {
        self.processor = Some(processor);
        self
    }

    #[must_use]
    pub fn with_value_logger(mut self, logger: Arc<dyn ValueLogger>) -> Self {
        self.value_logger = Some(logger);
        self
    }

    #[must_use]
    pub fn with_fallback_logger(mut self, logger: Arc<dyn FallbackLogger>) -> Self {
        self.fallback_logger = Some(logger);
        self
    }

    /// Name of the concrete type the service was registered as
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn as_logger(&self) -> Option<Arc<dyn Logger>> {
        self.logger.clone()
    }

    pub fn as_handler(&self) -> Option<Arc<dyn Handler>> {
        self.handler.clone()
    }

    pub fn as_processor(&self) -> Option<Arc<dyn Processor>> {
        self.processor.clone()
    }

    pub fn as_value_logger(&self) -> Option<Arc<dyn ValueLogger>> {
        self.value_logger.clone()
    }

    pub fn as_fallback_logger(&self) -> Option<Arc<dyn FallbackLogger>> {
        self.fallback_logger.clone()
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.instance.clone().downcast::<T>().ok()
    }

    pub fn require_logger(&self, key: &str) -> Result<Arc<dyn Logger>> {
        self.as_logger()
            .ok_or_else(|| LoggerError::service_type(key, "a Logger", self.type_name))
    }

    pub fn require_handler(&self, key: &str) -> Result<Arc<dyn Handler>> {
        self.as_handler()
            .ok_or_else(|| LoggerError::service_type(key, "a Handler", self.type_name))
    }

    pub fn require_processor(&self, key: &str) -> Result<Arc<dyn Processor>> {
        self.as_processor()
            .ok_or_else(|| LoggerError::service_type(key, "a Processor", self.type_name))
    }

    pub fn require_value_logger(&self, key: &str) -> Result<Arc<dyn ValueLogger>> {
        self.as_value_logger()
            .ok_or_else(|| LoggerError::service_type(key, "a ValueLogger", self.type_name))
    }

    pub fn require_fallback_logger(&self, key: &str) -> Result<Arc<dyn FallbackLogger>> {
        self.as_fallback_logger()
            .ok_or_else(|| LoggerError::service_type(key, "a FallbackLogger", self.type_name))
    }

    pub fn require<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        self.downcast::<T>().ok_or_else(|| {
            LoggerError::service_type(key, std::any::type_name::<T>(), self.type_name)
        })
    }
}

impl fmt::Debug for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRef")
            .field("type_name", &self.type_name)
            .field("logger", &self.logger.is_some())
            .field("handler", &self.handler.is_some())
            .field("processor", &self.processor.is_some())
            .field("value_logger", &self.value_logger.is_some())
            .field("fallback_logger", &self.fallback_logger.is_some())
            .finish()
    }
}

pub trait ServiceLocator: Send + Sync {
    fn has(&self, key: &str) -> bool;

    /// Whether the service was already instantiated
    fn is_created(&self, key: &str) -> bool;

    fn resolve(&self, key: &str) -> Result<ServiceRef>;
}

type Factory = Box<dyn Fn(&Container) -> Result<ServiceRef> + Send + Sync>;

struct Entry {
    factory: Option<Factory>,
    instance: OnceCell<ServiceRef>,
}

/// Lazily instantiating service registry.
///
/// Each factory runs at most once; concurrent resolvers of the same key all
/// observe the single instance. A failed factory leaves the service
/// unresolved so the next call retries. Factories may resolve other services
/// through the container they receive; a factory resolving its own key
/// (directly or through a cycle) is a configuration error and deadlocks.
#[derive(Default)]
pub struct Container {
    entries: RwLock<IndexMap<String, Arc<Entry>>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous registration of `key`
    pub fn register<F>(&self, key: impl Into<String>, factory: F)
    where
        F: Fn(&Container) -> Result<ServiceRef> + Send + Sync + 'static,
    {
        let entry = Entry {
            factory: Some(Box::new(factory)),
            instance: OnceCell::new(),
        };
        self.entries.write().insert(key.into(), Arc::new(entry));
    }

    /// Register an already created instance
    pub fn register_instance(&self, key: impl Into<String>, service: ServiceRef) {
        let entry = Entry {
            factory: None,
            instance: OnceCell::with_value(service),
        };
        self.entries.write().insert(key.into(), Arc::new(entry));
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn entry(&self, key: &str) -> Option<Arc<Entry>> {
        self.entries.read().get(key).cloned()
    }
}

impl ServiceLocator for Container {
    fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn is_created(&self, key: &str) -> bool {
        self.entry(key)
            .map(|entry| entry.instance.get().is_some())
            .unwrap_or(false)
    }

    fn resolve(&self, key: &str) -> Result<ServiceRef> {
        // the map lock is released before the factory runs so it can resolve dependencies
        let entry = self
            .entry(key)
            .ok_or_else(|| LoggerError::service_not_found(key))?;

        entry
            .instance
            .get_or_try_init(|| match &entry.factory {
                Some(factory) => factory(self),
                None => Err(LoggerError::service_not_found(key)),
            })
            .cloned()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Named view over a set of services: `name -> service key`.
///
/// Holds the locator weakly, so a map stored inside the container it points
/// to does not keep that container alive.
#[derive(Clone)]
pub struct ServiceMap {
    locator: Weak<dyn ServiceLocator>,
    keys: IndexMap<String, String>,
}

impl ServiceMap {
    pub fn new(locator: &Arc<dyn ServiceLocator>, keys: IndexMap<String, String>) -> Self {
        Self {
            locator: Arc::downgrade(locator),
            keys,
        }
    }

    /// Service names in configured order
    pub fn keys(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn service_key(&self, name: &str) -> Option<&str> {
        self.keys.get(name).map(String::as_str)
    }

    pub fn is_created(&self, name: &str) -> bool {
        match (self.locator.upgrade(), self.keys.get(name)) {
            (Some(locator), Some(key)) => locator.is_created(key),
            _ => false,
        }
    }

    pub fn resolve(&self, name: &str) -> Result<ServiceRef> {
        let key = self
            .keys
            .get(name)
            .ok_or_else(|| LoggerError::service_not_found(name))?;
        let locator = self
            .locator
            .upgrade()
            .ok_or_else(|| LoggerError::invalid_state("Service container was already dropped."))?;
        locator.resolve(key)
    }
}

impl fmt::Debug for ServiceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMap").field("keys", &self.keys).finish()
    }
}

//! Lazy value-logger to record-logger bridge
//!
//! [`LazyBridgeLogger`] is installed as the host's value-oriented logger and
//! forwards everything into a set of channels. Channels are only resolved
//! from the container on the first `log` call, so installing the bridge early
//! does not instantiate the whole logging graph.

use super::adapters::ValueToLoggerAdapter;
use super::value::{FallbackLogger, LogValue, Mailer, ValueLevel, ValueLogger};
use crate::core::{LoggerError, Result};
use crate::di::container::ServiceMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

pub struct LazyBridgeLogger {
    services: ServiceMap,
    loggers: OnceCell<Vec<ValueToLoggerAdapter>>,
    fallback: Option<Arc<dyn FallbackLogger>>,
}

impl LazyBridgeLogger {
    pub fn new(services: ServiceMap) -> Self {
        Self {
            services,
            loggers: OnceCell::new(),
            fallback: None,
        }
    }

    /// Logger that receives reads and writes of the mail-alert options
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackLogger>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn fallback(&self) -> Option<&Arc<dyn FallbackLogger>> {
        self.fallback.as_ref()
    }

    /// Whether the target loggers were already resolved
    pub fn is_resolved(&self) -> bool {
        self.loggers.get().is_some()
    }

    fn loggers(&self) -> Result<&[ValueToLoggerAdapter]> {
        self.loggers
            .get_or_try_init(|| {
                self.services
                    .keys()
                    .iter()
                    .map(|name| -> Result<ValueToLoggerAdapter> {
                        let key = self.services.service_key(name).unwrap_or(name.as_str());
                        let logger = self.services.resolve(name)?.require_logger(key)?;
                        Ok(ValueToLoggerAdapter::new(logger))
                    })
                    .collect()
            })
            .map(Vec::as_slice)
    }

    fn fallback_for(&self, access: impl FnOnce(&str) -> String) -> Result<&Arc<dyn FallbackLogger>> {
        self.fallback
            .as_ref()
            .ok_or_else(|| LoggerError::member_inaccessible(access(std::any::type_name::<Self>())))
    }

    fn read_fallback(&self, property: &str) -> Result<&Arc<dyn FallbackLogger>> {
        self.fallback_for(|class| {
            format!("Cannot read an undeclared property {}::${}", class, property)
        })
    }

    fn write_fallback(&self, property: &str) -> Result<&Arc<dyn FallbackLogger>> {
        self.fallback_for(|class| {
            format!("Cannot write to an undeclared property {}::${}", class, property)
        })
    }

    fn call_fallback(&self, method: &str) -> Result<&Arc<dyn FallbackLogger>> {
        self.fallback_for(|class| {
            format!("Call to undefined or non-public method {}::{}()", class, method)
        })
    }

    pub fn from_email(&self) -> Result<Option<String>> {
        Ok(self.read_fallback("from_email")?.from_email())
    }

    pub fn set_from_email(&self, from_email: Option<String>) -> Result<()> {
        self.write_fallback("from_email")?.set_from_email(from_email);
        Ok(())
    }

    pub fn has_from_email(&self) -> bool {
        self.fallback
            .as_ref()
            .is_some_and(|fallback| fallback.from_email().is_some())
    }

    pub fn email_snooze(&self) -> Result<Option<String>> {
        Ok(self.read_fallback("email_snooze")?.email_snooze())
    }

    pub fn set_email_snooze(&self, email_snooze: Option<String>) -> Result<()> {
        self.write_fallback("email_snooze")?
            .set_email_snooze(email_snooze);
        Ok(())
    }

    pub fn has_email_snooze(&self) -> bool {
        self.fallback
            .as_ref()
            .is_some_and(|fallback| fallback.email_snooze().is_some())
    }

    pub fn mailer(&self) -> Result<Option<Arc<dyn Mailer>>> {
        Ok(self.read_fallback("mailer")?.mailer())
    }

    pub fn set_mailer(&self, mailer: Option<Arc<dyn Mailer>>) -> Result<()> {
        self.write_fallback("mailer")?.set_mailer(mailer);
        Ok(())
    }

    pub fn has_mailer(&self) -> bool {
        self.fallback
            .as_ref()
            .is_some_and(|fallback| fallback.mailer().is_some())
    }

    pub fn default_mailer(&self, value: &LogValue, email: &str) -> Result<()> {
        self.call_fallback("default_mailer")?
            .default_mailer(value, email)
    }
}

impl ValueLogger for LazyBridgeLogger {
    /// Forward to every configured channel in order, without level filtering
    fn log(&self, value: &LogValue, level: ValueLevel) -> Result<()> {
        for logger in self.loggers()? {
            logger.log(value, level)?;
        }
        Ok(())
    }
}

impl fmt::Debug for LazyBridgeLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyBridgeLogger")
            .field("services", &self.services)
            .field("resolved", &self.is_resolved())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

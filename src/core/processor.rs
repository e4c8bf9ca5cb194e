//! Record processors
//!
//! A processor is a transform applied to a record before it reaches a sink.
//! Processors attach to a [`Channel`](super::channel::Channel) (every record of
//! the channel) or to a handler (only records that handler accepts). The same
//! instance may be attached in several places.

use super::error::{LoggerError, Result};
use super::log_context::FieldValue;
use super::record::LogRecord;
use parking_lot::RwLock;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

pub trait Processor: Send + Sync {
    fn process(&self, record: LogRecord) -> LogRecord;

    /// Forget any per-request state. Stateless processors keep the default.
    fn reset(&self) {}
}

/// Ordered processor list with stack semantics.
///
/// [`push_processor`](Self::push_processor) puts the processor on top of the
/// stack and [`process`](Self::process) runs from the top down, so the most
/// recently pushed processor sees the record first.
#[derive(Default)]
pub struct ProcessorStack {
    processors: RwLock<Vec<Arc<dyn Processor>>>,
}

impl ProcessorStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack whose execution order equals the order of `processors`
    pub fn from_ordered(processors: Vec<Arc<dyn Processor>>) -> Self {
        Self {
            processors: RwLock::new(processors),
        }
    }

    pub fn push_processor(&self, processor: Arc<dyn Processor>) {
        self.processors.write().insert(0, processor);
    }

    /// Remove the processor on top of the stack
    pub fn pop_processor(&self) -> Option<Arc<dyn Processor>> {
        let mut processors = self.processors.write();
        if processors.is_empty() {
            None
        } else {
            Some(processors.remove(0))
        }
    }

    /// Processors in execution order
    pub fn processors(&self) -> Vec<Arc<dyn Processor>> {
        self.processors.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.processors.read().len()
    }

    pub fn process(&self, record: LogRecord) -> LogRecord {
        self.processors
            .read()
            .iter()
            .fold(record, |record, processor| processor.process(record))
    }

    pub fn reset(&self) {
        for processor in self.processors.read().iter() {
            processor.reset();
        }
    }
}

impl fmt::Debug for ProcessorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorStack")
            .field("len", &self.len())
            .finish()
    }
}

/// Adds a random hexadecimal id to `extra.uid`.
///
/// The id stays the same until [`reset`](Processor::reset), which makes it
/// usable as a per-request correlation id.
pub struct UidProcessor {
    length: usize,
    uid: RwLock<String>,
}

impl UidProcessor {
    pub const DEFAULT_LENGTH: usize = 7;

    /// # Errors
    ///
    /// Returns a configuration error unless `1 <= length <= 32`.
    pub fn new(length: usize) -> Result<Self> {
        if !(1..=32).contains(&length) {
            return Err(LoggerError::config(
                "UidProcessor::length",
                format!("The uid length must be an integer between 1 and 32, {} given", length),
            ));
        }

        Ok(Self {
            length,
            uid: RwLock::new(Self::generate(length)),
        })
    }

    pub fn uid(&self) -> String {
        self.uid.read().clone()
    }

    fn generate(length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
            .collect()
    }
}

impl Default for UidProcessor {
    fn default() -> Self {
        Self {
            length: Self::DEFAULT_LENGTH,
            uid: RwLock::new(Self::generate(Self::DEFAULT_LENGTH)),
        }
    }
}

impl Processor for UidProcessor {
    fn process(&self, mut record: LogRecord) -> LogRecord {
        record.extra.add_field("uid", self.uid());
        record
    }

    fn reset(&self) {
        let mut uid = self.uid.write();
        let mut next = Self::generate(self.length);
        // a reset must be observable even for very short ids
        while next == *uid {
            next = Self::generate(self.length);
        }
        *uid = next;
    }
}

/// Merges a fixed set of tags into `extra.tags`
pub struct TagProcessor {
    tags: RwLock<Vec<String>>,
}

impl TagProcessor {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: RwLock::new(tags.into_iter().map(Into::into).collect()),
        }
    }

    pub fn add_tags<I, S>(&self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.write().extend(tags.into_iter().map(Into::into));
    }
}

impl Processor for TagProcessor {
    fn process(&self, mut record: LogRecord) -> LogRecord {
        let mut tags = match record.extra.get("tags") {
            Some(FieldValue::List(existing)) => existing.clone(),
            _ => Vec::new(),
        };
        tags.extend(self.tags.read().iter().map(|tag| FieldValue::from(tag.as_str())));
        record.extra.add_field("tags", FieldValue::List(tags));
        record
    }
}

/// Replaces `{key}` placeholders in the message with the matching context values
#[derive(Debug, Default)]
pub struct MessagePlaceholderProcessor;

impl MessagePlaceholderProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for MessagePlaceholderProcessor {
    fn process(&self, mut record: LogRecord) -> LogRecord {
        if !record.message.contains('{') {
            return record;
        }

        record.message = interpolate(&record.message, &record.context);
        record
    }
}

/// One left-to-right pass over `message`; substituted values are never rescanned.
pub(crate) fn interpolate(message: &str, context: &super::log_context::LogContext) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let value = tail
            .find('}')
            .and_then(|close| context.get(&tail[..close]).map(|value| (close, value)));

        match value {
            Some((close, value)) => {
                out.push_str(&value.to_string());
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Closure-backed processor
pub struct FnProcessor<F>
where
    F: Fn(LogRecord) -> LogRecord + Send + Sync,
{
    f: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(LogRecord) -> LogRecord + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(LogRecord) -> LogRecord + Send + Sync,
{
    fn process(&self, record: LogRecord) -> LogRecord {
        (self.f)(record)
    }
}

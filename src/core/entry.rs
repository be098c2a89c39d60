//! Immutable field entries

use super::{
    fields::{FieldValue, Fields},
    log_level::LogLevel,
    logger::Logger,
};
use std::fmt;
use std::panic::Location;

/// A bag of fields waiting for a severity method.
///
/// Adding fields never changes the receiver; it returns a new entry holding
/// the union, new values winning on key collision. The field storage comes
/// from the logger's pool and goes back to it once the entry has been logged
/// or dropped.
///
/// ```
/// use fieldlog::Logger;
///
/// let logger = Logger::builder().build();
/// let base = logger.with_field("user", "bob");
/// let derived = base.with_field("count", 3);
///
/// assert_eq!(base.len(), 1);
/// assert_eq!(derived.len(), 2);
/// derived.info("hello");
/// ```
pub struct Entry<'a> {
    logger: &'a Logger,
    fields: Fields,
}

impl<'a> Entry<'a> {
    pub(crate) fn new(logger: &'a Logger, fields: Fields) -> Self {
        Self { logger, fields }
    }

    /// New entry with `key` added.
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Entry<'a> {
        self.with_fields([(key, value)])
    }

    /// New entry with every pair from `fields` added.
    #[must_use]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Entry<'a>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut data = self.logger.pool().acquire();
        data.reserve(self.fields.len());
        for (key, value) in &self.fields {
            data.insert(key.clone(), value.clone());
        }
        for (key, value) in fields {
            data.insert(key.into(), value.into());
        }
        Entry::new(self.logger, data)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[track_caller]
    pub fn logf(self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.log(level, || fmt::format(args), Location::caller());
    }

    #[track_caller]
    pub fn debug(self, message: impl Into<String>) {
        self.log(LogLevel::Debug, || message.into(), Location::caller());
    }

    #[track_caller]
    pub fn debugf(self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, || fmt::format(args), Location::caller());
    }

    #[track_caller]
    pub fn info(self, message: impl Into<String>) {
        self.log(LogLevel::Info, || message.into(), Location::caller());
    }

    #[track_caller]
    pub fn infof(self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, || fmt::format(args), Location::caller());
    }

    #[track_caller]
    pub fn warn(self, message: impl Into<String>) {
        self.log(LogLevel::Warn, || message.into(), Location::caller());
    }

    #[track_caller]
    pub fn warnf(self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, || fmt::format(args), Location::caller());
    }

    #[track_caller]
    pub fn error(self, message: impl Into<String>) {
        self.log(LogLevel::Error, || message.into(), Location::caller());
    }

    #[track_caller]
    pub fn errorf(self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, || fmt::format(args), Location::caller());
    }

    /// Log at fatal level, then run the logger's exit handler.
    #[track_caller]
    pub fn fatal(self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, || message.into(), Location::caller());
    }

    #[track_caller]
    pub fn fatalf(self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, || fmt::format(args), Location::caller());
    }

    fn log(mut self, level: LogLevel, message: impl FnOnce() -> String, location: &Location<'_>) {
        let fields = std::mem::take(&mut self.fields);
        self.logger.dispatch(level, message, fields, location);
    }
}

impl Clone for Entry<'_> {
    fn clone(&self) -> Self {
        self.with_fields(std::iter::empty::<(String, FieldValue)>())
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry").field("fields", &self.fields).finish()
    }
}

impl Drop for Entry<'_> {
    fn drop(&mut self) {
        self.logger.pool().release(std::mem::take(&mut self.fields));
    }
}

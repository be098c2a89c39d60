//! JSON rendering for remote ingestion
//!
//! Known fields (identity plus `@version`) land at the top level of the
//! document. Every other field is an "extra" and is folded into the message
//! as `key=value` pairs, so the ingestion pipeline sees a fixed schema.

use super::text::append_key_value;
use crate::core::{
    EntryPool, FieldValue, Fields, Formatter, LogLevel, LogRecord, LoggerError, Result,
    TimestampFormat,
};
use std::collections::BTreeMap;

pub const DEFAULT_FIELD_KEY_TIME: &str = "@timestamp";
pub const DEFAULT_FIELD_KEY_MSG: &str = "message";
pub const DEFAULT_FIELD_KEY_LEVEL: &str = "level";
pub const DEFAULT_FIELD_KEY_CATEGORY: &str = "category";

/// Fields every shipped document carries unless overridden.
pub fn default_fields() -> Fields {
    let mut fields = Fields::with_capacity(1);
    fields.insert("@version".to_string(), FieldValue::from("1"));
    fields
}

/// Renders a record to one line of canonical JSON
///
/// ```
/// use fieldlog::core::{CallerLocation, Fields, LogLevel, LogRecord};
/// use fieldlog::formatters::StructuredFormatter;
///
/// let mut identity = Fields::new();
/// identity.insert("app_id".into(), "svc".into());
///
/// let formatter = StructuredFormatter::new(identity);
/// let record = LogRecord::new(LogLevel::Info, "hello")
///     .with_caller(CallerLocation::new("src/main.rs", 7))
///     .with_field("user", "bob");
///
/// let doc: serde_json::Value = serde_json::from_slice(&formatter.render(&record).unwrap()).unwrap();
/// assert_eq!(doc["message"], "[src/main.rs:7] hello user=bob");
/// assert_eq!(doc["app_id"], "svc");
/// ```
#[derive(Debug)]
pub struct StructuredFormatter {
    fields: Fields,
    field_key_time: String,
    field_key_msg: String,
    field_key_level: String,
    field_key_category: String,
    timestamp_format: TimestampFormat,
    disable_sorting: bool,
    quote_empty_fields: bool,
    scratch: EntryPool,
}

impl StructuredFormatter {
    /// `identity` wins over the defaults on key collision.
    pub fn new(identity: Fields) -> Self {
        let mut fields = identity;
        for (key, value) in default_fields() {
            fields.entry(key).or_insert(value);
        }

        Self {
            fields,
            field_key_time: DEFAULT_FIELD_KEY_TIME.to_string(),
            field_key_msg: DEFAULT_FIELD_KEY_MSG.to_string(),
            field_key_level: DEFAULT_FIELD_KEY_LEVEL.to_string(),
            field_key_category: DEFAULT_FIELD_KEY_CATEGORY.to_string(),
            timestamp_format: TimestampFormat::Iso8601,
            disable_sorting: false,
            quote_empty_fields: false,
            scratch: EntryPool::new(),
        }
    }

    #[must_use]
    pub fn with_time_key(mut self, key: impl Into<String>) -> Self {
        self.field_key_time = key.into();
        self
    }

    #[must_use]
    pub fn with_message_key(mut self, key: impl Into<String>) -> Self {
        self.field_key_msg = key.into();
        self
    }

    #[must_use]
    pub fn with_level_key(mut self, key: impl Into<String>) -> Self {
        self.field_key_level = key.into();
        self
    }

    #[must_use]
    pub fn with_category_key(mut self, key: impl Into<String>) -> Self {
        self.field_key_category = key.into();
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_disable_sorting(mut self, disable: bool) -> Self {
        self.disable_sorting = disable;
        self
    }

    #[must_use]
    pub fn with_quote_empty_fields(mut self, quote: bool) -> Self {
        self.quote_empty_fields = quote;
        self
    }

    pub fn known_fields(&self) -> &Fields {
        &self.fields
    }

    pub fn is_known(&self, key: &str) -> bool {
        self.fields.contains_key(key) || key == self.field_key_category
    }

    /// Render `record`; the scratch map goes back to the pool either way.
    pub fn render(&self, record: &LogRecord) -> Result<Vec<u8>> {
        let mut scratch = self.scratch.acquire();
        for (key, value) in &self.fields {
            scratch.insert(key.clone(), value.clone());
        }
        for (key, value) in &record.fields {
            scratch.insert(key.clone(), value.clone());
        }

        let rendered = self.render_scratch(record, &mut scratch);
        self.scratch.release(scratch);
        rendered
    }

    fn render_scratch(&self, record: &LogRecord, scratch: &mut Fields) -> Result<Vec<u8>> {
        let mut data: BTreeMap<String, FieldValue> = BTreeMap::new();
        let mut extras: Vec<(String, FieldValue)> = Vec::new();

        for (key, value) in scratch.drain() {
            if self.is_known(&key) {
                let value = value.stringify_error();
                data.insert(key, value);
            } else {
                extras.push((key, value));
            }
        }

        data.insert(
            self.field_key_time.clone(),
            FieldValue::String(self.timestamp_format.format(&record.timestamp)),
        );
        data.insert(
            self.field_key_level.clone(),
            FieldValue::from(LogLevel::label_for(record.level as u8)),
        );
        data.insert(
            self.field_key_msg.clone(),
            FieldValue::String(self.compose_message(record, &mut extras)),
        );

        let mut serialized = serde_json::to_vec(&data).map_err(|e| {
            LoggerError::formatter(
                "structured",
                format!("Failed to marshal fields to JSON, {}", e),
            )
        })?;
        serialized.push(b'\n');
        Ok(serialized)
    }

    /// `[file:line] message k=v ...`, empty parts skipped.
    fn compose_message(&self, record: &LogRecord, extras: &mut [(String, FieldValue)]) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3);

        if let Some(caller) = &record.caller {
            parts.push(format!("[{}]", caller));
        }
        if !record.message.is_empty() {
            parts.push(record.message.clone());
        }
        if !extras.is_empty() {
            if !self.disable_sorting {
                extras.sort_unstable_by(|a, b| a.0.cmp(&b.0));
            }
            let mut suffix = String::new();
            for (key, value) in extras.iter() {
                append_key_value(&mut suffix, key, value, self.quote_empty_fields);
            }
            parts.push(suffix);
        }

        parts.join(" ")
    }
}

impl Formatter for StructuredFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>> {
        self.render(record)
    }
}

//! Human-readable single-line rendering
//!
//! `2019-01-31T04:48:20 [info] [controllers/user.rs:99] saved key=value`

use crate::core::{FieldValue, Formatter, LogLevel, LogRecord, Result, TimestampFormat};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "console")]
use colored::Colorize;

/// Custom ordering for field keys, applied in place.
pub type SortingFunc = Arc<dyn Fn(&mut [&str]) + Send + Sync>;

/// Renders a record as `<timestamp> [<level>] [<file:line>] <message> k=v ...`.
#[derive(Clone)]
pub struct TextFormatter {
    timestamp_format: TimestampFormat,
    disable_sorting: bool,
    sorting_func: Option<SortingFunc>,
    quote_empty_fields: bool,
    use_colors: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self {
            timestamp_format: TimestampFormat::Iso8601Seconds,
            disable_sorting: false,
            sorting_func: None,
            quote_empty_fields: false,
            use_colors: false,
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    ///
    /// Fails with [`LoggerError::InvalidConfiguration`](crate::core::LoggerError)
    /// when the pattern has an unknown specifier.
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Result<Self> {
        self.timestamp_format = TimestampFormat::custom(format_str)?;
        Ok(self)
    }

    /// With sorting disabled, fields come out in map iteration order.
    #[must_use]
    pub fn with_disable_sorting(mut self, disable: bool) -> Self {
        self.disable_sorting = disable;
        self
    }

    /// Replace the default lexicographic key order.
    #[must_use]
    pub fn with_sorting_func(mut self, sorting_func: SortingFunc) -> Self {
        self.sorting_func = Some(sorting_func);
        self
    }

    #[must_use]
    pub fn with_quote_empty_fields(mut self, quote: bool) -> Self {
        self.quote_empty_fields = quote;
        self
    }

    /// Colorize the level tag with ANSI escapes (needs the `console` feature).
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn render(&self, record: &LogRecord) -> String {
        let mut keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        if !self.disable_sorting {
            match &self.sorting_func {
                Some(sort) => sort(&mut keys),
                None => keys.sort_unstable(),
            }
        }

        let mut buf = String::with_capacity(128);
        buf.push_str(&self.timestamp_format.format(&record.timestamp));
        buf.push_str(" [");
        buf.push_str(&self.level_tag(record.level));
        buf.push(']');

        if let Some(caller) = &record.caller {
            buf.push_str(" [");
            buf.push_str(&caller.to_string());
            buf.push(']');
        }

        if !record.message.is_empty() {
            buf.push(' ');
            buf.push_str(&sanitize_message(&record.message));
        }

        for key in keys {
            if let Some(value) = record.fields.get(key) {
                append_key_value(&mut buf, key, value, self.quote_empty_fields);
            }
        }

        buf.push('\n');
        buf
    }

    fn level_tag(&self, level: LogLevel) -> Cow<'static, str> {
        #[cfg(feature = "console")]
        if self.use_colors {
            return Cow::Owned(level.tag().color(level.color_code()).to_string());
        }
        Cow::Borrowed(level.tag())
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFormatter")
            .field("timestamp_format", &self.timestamp_format)
            .field("disable_sorting", &self.disable_sorting)
            .field("custom_sorting", &self.sorting_func.is_some())
            .field("quote_empty_fields", &self.quote_empty_fields)
            .field("use_colors", &self.use_colors)
            .finish()
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>> {
        Ok(self.render(record).into_bytes())
    }
}

/// Keep a record on one line.
fn sanitize_message(message: &str) -> Cow<'_, str> {
    if message.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            message
                .replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t"),
        )
    } else {
        Cow::Borrowed(message)
    }
}

/// Append ` key=value`, without the leading space when `buf` is empty.
pub fn append_key_value(buf: &mut String, key: &str, value: &FieldValue, quote_empty_fields: bool) {
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(key);
    buf.push('=');
    append_value(buf, value, quote_empty_fields);
}

pub fn append_value(buf: &mut String, value: &FieldValue, quote_empty_fields: bool) {
    let text: Cow<'_, str> = match value {
        FieldValue::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    };

    if needs_quoting(&text, quote_empty_fields) {
        // Debug escapes: control chars render as `\u{1}`, not `\x01`.
        buf.push_str(&format!("{:?}", text));
    } else {
        buf.push_str(&text);
    }
}

/// True unless every char is in `[A-Za-z0-9-._/@^+]`.
pub fn needs_quoting(text: &str, quote_empty_fields: bool) -> bool {
    if quote_empty_fields && text.is_empty() {
        return true;
    }
    !text
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

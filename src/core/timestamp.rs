//! Timestamp formatting utilities
//!
//! Fixed-width, configurable timestamp formats for both renderings. All
//! timestamps are rendered in UTC so identical records produce identical
//! bytes on every host.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use fieldlog::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2019, 1, 31, 4, 48, 20).unwrap();
/// assert_eq!(TimestampFormat::Iso8601Seconds.format(&at), "2019-01-31T04:48:20");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    ///
    /// Used for the `@timestamp` of shipped documents.
    #[default]
    Iso8601,

    /// ISO 8601 to the second, no offset: `2025-01-08T10:30:45`
    ///
    /// Default for text lines.
    Iso8601Seconds,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Custom strftime format, rejected when the pattern has an unknown
    /// or incomplete specifier.
    ///
    /// ```
    /// use fieldlog::core::TimestampFormat;
    ///
    /// assert!(TimestampFormat::custom("%Y/%m/%d %H:%M").is_ok());
    /// assert!(TimestampFormat::custom("%Y-%Q").is_err());
    /// ```
    pub fn custom(pattern: &str) -> Result<Self> {
        let format = TimestampFormat::Custom(pattern.to_string());
        format.validate()?;
        Ok(format)
    }

    /// Check a `Custom` pattern; the fixed formats are always valid.
    pub fn validate(&self) -> Result<()> {
        let TimestampFormat::Custom(pattern) = self else {
            return Ok(());
        };
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "timestamp format",
                format!("invalid strftime pattern '{}'", pattern),
            ));
        }
        Ok(())
    }

    /// Format a `DateTime<Utc>` according to this format
    ///
    /// An invalid `Custom` pattern that slipped past [`validate`](Self::validate)
    /// (built directly or deserialized) falls back to [`TimestampFormat::Iso8601`].
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Seconds => datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => out,
                    Err(_) => TimestampFormat::Iso8601.format(datetime),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_iso8601_seconds_format() {
        let result = TimestampFormat::Iso8601Seconds.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45");
    }

    #[test]
    fn test_iso8601_micros_format() {
        let result = TimestampFormat::Iso8601Micros.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_rfc3339_format() {
        let result = TimestampFormat::Rfc3339.format(&fixed_datetime());
        assert!(result.starts_with("2025-01-08T10:30:45"));
        assert!(result.contains("+00:00") || result.ends_with('Z'));
    }

    #[test]
    fn test_unix_millis_format() {
        let result = TimestampFormat::UnixMillis.format(&fixed_datetime());
        assert_eq!(result, "1736332245123");
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d - %H:%M:%S".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 - 10:30:45");
    }

    #[test]
    fn test_invalid_custom_pattern_rejected() {
        let err = TimestampFormat::custom("%Y-%Q").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("%Y-%Q"));

        assert!(TimestampFormat::custom("%Y-%m-%d %").is_err());
        assert!(TimestampFormat::Iso8601.validate().is_ok());
    }

    #[test]
    fn test_invalid_custom_pattern_does_not_panic() {
        let format = TimestampFormat::Custom("%Y-%Q".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_fixed_width() {
        let early = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let format = TimestampFormat::Iso8601;
        assert_eq!(format.format(&early).len(), format.format(&fixed_datetime()).len());
    }

    #[test]
    fn test_deserialization() {
        let format: TimestampFormat =
            serde_json::from_str("\"Iso8601Seconds\"").expect("deserialize");
        assert_eq!(format, TimestampFormat::Iso8601Seconds);

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}

//! Formatter trait for rendering records

use super::{error::Result, record::LogRecord};

/// Renders one record into the bytes written by an appender or shipped
/// by a hook. Output includes the trailing newline.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>>;
}

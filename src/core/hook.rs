//! Hooks fired for every emitted record

use super::{error::Result, log_level::LogLevel, record::LogRecord};

/// Side output attached to a sink.
///
/// Hooks fire synchronously on the logging thread after the severity check
/// and before the record is written locally. An error is reported by the
/// sink and never stops the local write.
pub trait Hook: Send + Sync {
    /// Levels this hook fires for.
    fn levels(&self) -> &[LogLevel] {
        &LogLevel::ALL
    }

    fn fire(&self, record: &LogRecord) -> Result<()>;

    fn name(&self) -> &str;
}

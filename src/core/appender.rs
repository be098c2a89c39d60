//! Appender trait for log output destinations

use super::error::Result;

/// Destination for rendered records.
///
/// A sink owns exactly one appender and serializes calls to it, so an
/// implementation only ever sees whole records.
pub trait Appender: Send {
    fn append(&mut self, rendered: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

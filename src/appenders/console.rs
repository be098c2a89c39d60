//! Console appender implementation

use crate::core::{Appender, LoggerError, Result};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes rendered records to the process's stdout or stderr.
#[derive(Debug)]
pub struct ConsoleAppender {
    stream: Stream,
}

impl ConsoleAppender {
    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, rendered: &[u8]) -> Result<()> {
        let written = match self.stream {
            Stream::Stdout => std::io::stdout().lock().write_all(rendered),
            Stream::Stderr => std::io::stderr().lock().write_all(rendered),
        };
        written.map_err(|e| LoggerError::io_operation("writing", self.name().to_string(), e))
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            Stream::Stdout => std::io::stdout().flush()?,
            Stream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

//! Appender implementations and the remote shipper

pub mod console;
pub mod file;
pub mod network;
pub mod writer;

pub use console::ConsoleAppender;
pub use file::FileAppender;
pub use network::{Dsn, RemoteShipper, ShipperBuilder, DEFAULT_CHANNEL_SIZE};
pub use writer::WriterAppender;

pub use crate::core::Appender;

use crate::core::Result;

/// Open the output named by a config selector: `stdout`, `stderr` or a file path.
pub fn open_target(selector: &str) -> Result<Box<dyn Appender>> {
    match selector {
        "stdout" => Ok(Box::new(ConsoleAppender::stdout())),
        "stderr" => Ok(Box::new(ConsoleAppender::stderr())),
        path => Ok(Box::new(FileAppender::new(path)?)),
    }
}

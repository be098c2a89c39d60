//! # fieldlog
//!
//! Leveled, field-structured logging for services.
//!
//! ## Features
//!
//! - **Two sinks**: Debug, Info and Warn go to the access log; Error and Fatal
//!   go to the error log, each with its own threshold and output
//! - **Immutable entries**: `with_field` returns a new entry, so a base entry
//!   can be shared and extended freely
//! - **Call sites**: every record carries `file:line` relative to the project
//! - **Remote shipping**: records can also be rendered as JSON and delivered
//!   to a collector over TCP, UDP or a unix socket without blocking the caller
//!
//! ```
//! use fieldlog::{LogConfig, Logger};
//!
//! let logger = Logger::init("shop-api", &LogConfig::default()).unwrap();
//! let request = logger.with_fields([("method", "GET"), ("path", "/orders")]);
//! request.with_field("status", 200).info("served");
//! ```

pub mod appenders;
pub mod core;
pub mod formatters;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, RemoteShipper, WriterAppender};
    pub use crate::core::{
        AgentConfig, Appender, Entry, FieldValue, Fields, Formatter, Hook, LogConfig, LogLevel,
        LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics, OverflowPolicy, Result,
        SinkKind, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::formatters::{StructuredFormatter, TextFormatter};
}

pub use appenders::{ConsoleAppender, FileAppender, RemoteShipper, WriterAppender};
pub use core::{
    AgentConfig, Appender, CallerLocation, Entry, ExitHandler, FieldValue, Fields, Formatter,
    Hook, LogConfig, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    OverflowCallback, OverflowPolicy, Result, SinkKind, TimestampFormat,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use formatters::{StructuredFormatter, TextFormatter};

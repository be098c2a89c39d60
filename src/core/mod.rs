//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod config;
pub mod entry;
pub mod error;
pub mod fields;
pub mod formatter;
pub mod hook;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod pool;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use appender::Appender;
pub use caller::CallerResolver;
pub use config::{AgentConfig, LogConfig};
pub use entry::Entry;
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use formatter::Formatter;
pub use hook::Hook;
pub use log_level::LogLevel;
pub use logger::{ExitHandler, Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use pool::EntryPool;
pub use record::{CallerLocation, LogRecord};
pub use sink::{LogSink, SinkKind};
pub use timestamp::TimestampFormat;

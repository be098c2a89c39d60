//! Logging macros for ergonomic log message formatting.
//!
//! Each macro takes a [`Logger`](crate::Logger) or an [`Entry`](crate::Entry)
//! followed by `format!`-style arguments. The message is only formatted when
//! the record passes the sink's threshold.
//!
//! # Examples
//!
//! ```
//! use fieldlog::prelude::*;
//! use fieldlog::info;
//!
//! let logger = Logger::builder().build();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! info!(logger.with_field("user_id", 42), "User performed {}", "login");
//! ```

/// Log at a level chosen at runtime.
///
/// ```
/// # use fieldlog::prelude::*;
/// # let logger = Logger::builder().build();
/// use fieldlog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr, $($arg:tt)+) => {
        $target.logf($level, ::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// ```
/// # use fieldlog::prelude::*;
/// # let logger = Logger::builder().access_level(LogLevel::Debug).build();
/// use fieldlog::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($target:expr, $($arg:tt)+) => {
        $target.debugf(::std::format_args!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($target:expr, $($arg:tt)+) => {
        $target.infof(::std::format_args!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($target:expr, $($arg:tt)+) => {
        $target.warnf(::std::format_args!($($arg)+))
    };
}

/// Log an error-level message.
///
/// ```
/// # use fieldlog::prelude::*;
/// # let logger = Logger::builder().build();
/// use fieldlog::error;
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "timeout");
/// error!(logger.with_field("error", FieldValue::from_error(&err)), "Query failed after {} ms", 30);
/// ```
#[macro_export]
macro_rules! error {
    ($target:expr, $($arg:tt)+) => {
        $target.errorf(::std::format_args!($($arg)+))
    };
}

/// Log a fatal-level message, then run the logger's exit handler.
///
/// ```
/// # use fieldlog::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Logger::builder().exit_handler(Arc::new(|_code: i32| {})).build();
/// use fieldlog::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($target:expr, $($arg:tt)+) => {
        $target.fatalf(::std::format_args!($($arg)+))
    };
}

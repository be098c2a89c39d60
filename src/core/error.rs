//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unknown severity name in configuration
    #[error("Set {sink} log level error: invalid level '{name}'")]
    InvalidLevel { sink: String, name: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Output target could not be opened
    #[error("Output target '{target}' unavailable: {message}")]
    OutputTarget { target: String, message: String },

    /// Remote agent address could not be parsed
    #[error("Parse dsn error for '{dsn}': {message}")]
    InvalidDsn { dsn: String, message: String },

    /// Initial connection to the remote agent failed
    #[error("Failed to connect to '{address}'")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn invalid_level(sink: impl Into<String>, name: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            sink: sink.into(),
            name: name.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an output target error
    pub fn output_target(target: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::OutputTarget {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn invalid_dsn(dsn: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidDsn {
            dsn: dsn.into(),
            message: message.into(),
        }
    }

    pub fn connect(address: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::Connect {
            address: address.into(),
            source,
        }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_level("access", "verbose");
        assert!(matches!(err, LoggerError::InvalidLevel { .. }));

        let err = LoggerError::config("access sink", "Invalid level");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::output_target("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::OutputTarget { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_level("access", "verbose");
        assert_eq!(
            err.to_string(),
            "Set access log level error: invalid level 'verbose'"
        );

        let err = LoggerError::invalid_dsn("localhost:5000", "missing scheme");
        assert_eq!(
            err.to_string(),
            "Parse dsn error for 'localhost:5000': missing scheme"
        );

        let err = LoggerError::formatter("structured", "NaN is not valid JSON");
        assert_eq!(
            err.to_string(),
            "Formatter error (structured): NaN is not valid JSON"
        );
    }

    #[test]
    fn test_connect_error_keeps_source() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = LoggerError::connect("127.0.0.1:9", io_err);

        assert!(err.to_string().contains("127.0.0.1:9"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening access log", "cannot open file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening access log"));
    }
}

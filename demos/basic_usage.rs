//! Basic logger usage example
//!
//! Builds a logger from configuration, logs through both sinks and shows
//! field composition.
//!
//! Run with: cargo run --example basic_usage

use fieldlog::prelude::*;
use fieldlog::{info, warn};

fn main() -> Result<()> {
    println!("=== fieldlog - Basic Usage Example ===\n");

    // Access log on stdout, error log on stderr
    let config = LogConfig {
        access_level: "debug".to_string(),
        ..LogConfig::default()
    };
    let logger = Logger::init(env!("CARGO_PKG_NAME"), &config)?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message (error sink)");

    println!("\n2. Fields:");
    let request = logger.with_fields([("method", "GET"), ("path", "/orders")]);
    request.with_field("status", 200).info("served");
    request
        .with_field("status", 503)
        .with_field("upstream", "inventory service")
        .warn("degraded");

    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
    logger
        .with_field("error", FieldValue::from_error(&err))
        .error("inventory lookup failed");

    println!("\n3. Macros:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger.with_field("retries", 2), "Retry budget at {}%", 20);

    println!("\n4. Runtime threshold change:");
    logger.set_min_level(SinkKind::Access, LogLevel::Warn);
    logger.info("Info message (hidden)");
    logger.warn("Warning message (visible)");

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}

//! Two-sink logger with optional remote shipping

use super::{
    appender::Appender,
    caller::CallerResolver,
    config::LogConfig,
    entry::Entry,
    error::{LoggerError, Result},
    fields::{FieldValue, Fields},
    hook::Hook,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    pool::{EntryPool, DEFAULT_MAX_IDLE},
    record::LogRecord,
    sink::{LogSink, SinkKind},
};
use crate::appenders::{open_target, ConsoleAppender, RemoteShipper};
use crate::formatters::{StructuredFormatter, TextFormatter};
use chrono::Utc;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// Used when a remote shipper is dropped or a fatal record terminates the
/// process. For custom timeout control, use [`Logger::shutdown`] instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs after a fatal record has been written, flushed and shipped.
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Leveled logger routing Debug, Info and Warn to the access sink and
/// Error and Fatal to the error sink.
///
/// # Example
///
/// ```
/// use fieldlog::{LogConfig, Logger};
///
/// let logger = Logger::init("shop-api", &LogConfig::default()).unwrap();
/// logger.with_field("user", "bob").info("signed in");
/// logger.warnf(format_args!("{} retries left", 2));
/// ```
pub struct Logger {
    access: LogSink,
    error: LogSink,
    resolver: CallerResolver,
    pool: EntryPool,
    shipper: Option<Arc<RemoteShipper>>,
    exit_handler: ExitHandler,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Build a logger from configuration.
    ///
    /// Both level names are validated first, then both outputs are opened,
    /// then the remote agent is dialed when enabled. The first failure is
    /// returned and nothing is left running.
    pub fn init(project_name: &str, config: &LogConfig) -> Result<Self> {
        let access_level = parse_level("access", &config.access_level)?;
        let error_level = parse_level("error", &config.error_level)?;

        let access_out = open_target(&config.access_log)?;
        let error_out = open_target(&config.error_log)?;

        let mut builder = Logger::builder()
            .project_name(project_name)
            .access_level(access_level)
            .error_level(error_level)
            .access_appender(access_out)
            .error_appender(error_out);

        let agent = &config.agent;
        if agent.enabled {
            let shipper = RemoteShipper::builder(StructuredFormatter::new(agent.identity_fields()))
                .channel_size(agent.channel_size)
                .overflow_policy(agent.overflow_policy.clone())
                .connect(&agent.dsn)?;
            builder = builder.shipper(shipper);
        }

        Ok(builder.build())
    }

    /// An entry with no fields yet.
    pub fn entry(&self) -> Entry<'_> {
        Entry::new(self, self.pool.acquire())
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Entry<'_> {
        let mut fields = self.pool.acquire();
        fields.insert(key.into(), value.into());
        Entry::new(self, fields)
    }

    pub fn with_fields<I, K, V>(&self, fields: I) -> Entry<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut data = self.pool.acquire();
        for (key, value) in fields {
            data.insert(key.into(), value.into());
        }
        Entry::new(self, data)
    }

    /// Log at a level chosen at runtime.
    #[track_caller]
    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.dispatch(level, || fmt::format(args), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Debug, || message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.dispatch(LogLevel::Debug, || fmt::format(args), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Info, || message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.dispatch(LogLevel::Info, || fmt::format(args), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Warn, || message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.dispatch(LogLevel::Warn, || fmt::format(args), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Error, || message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.dispatch(LogLevel::Error, || fmt::format(args), Fields::new(), Location::caller());
    }

    /// Log at fatal level, then flush, drain the shipper and run the exit
    /// handler (by default `std::process::exit(1)`).
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Fatal, || message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.dispatch(LogLevel::Fatal, || fmt::format(args), Fields::new(), Location::caller());
    }

    /// Route one record. `message` is only evaluated when the target sink
    /// accepts `level`.
    pub(crate) fn dispatch(
        &self,
        level: LogLevel,
        message: impl FnOnce() -> String,
        fields: Fields,
        location: &Location<'_>,
    ) {
        let sink = self.sink(SinkKind::for_level(level));
        if !sink.enabled(level) {
            self.pool.release(fields);
            return;
        }

        let record = LogRecord {
            timestamp: Utc::now(),
            level,
            message: message(),
            fields,
            caller: Some(self.resolver.resolve(location)),
        };
        sink.emit(&record);
        self.pool.release(record.into_fields());

        if level == LogLevel::Fatal {
            self.terminate();
        }
    }

    fn terminate(&self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        if let Some(shipper) = &self.shipper {
            shipper.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
        (self.exit_handler)(1);
    }

    pub fn sink(&self, kind: SinkKind) -> &LogSink {
        match kind {
            SinkKind::Access => &self.access,
            SinkKind::Error => &self.error,
        }
    }

    pub fn metrics(&self, kind: SinkKind) -> &LoggerMetrics {
        self.sink(kind).metrics()
    }

    pub fn set_min_level(&self, kind: SinkKind, level: LogLevel) {
        self.sink(kind).set_min_level(level);
    }

    pub fn shipper(&self) -> Option<&RemoteShipper> {
        self.shipper.as_deref()
    }

    pub(crate) fn pool(&self) -> &EntryPool {
        &self.pool
    }

    pub fn flush(&self) -> Result<()> {
        self.access.flush()?;
        self.error.flush()
    }

    /// Flush both sinks and drain the remote shipper, if any.
    ///
    /// Returns `false` when a flush failed or the shipper did not drain
    /// within `timeout`. Records logged afterwards still reach the local
    /// sinks; shipped documents are counted as dropped.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let mut clean = true;

        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            clean = false;
        }
        if let Some(shipper) = &self.shipper {
            clean &= shipper.shutdown(timeout);
        }

        clean
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush on drop: {}", e);
        }
    }
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

fn parse_level(sink: &str, name: &str) -> Result<LogLevel> {
    name.parse::<LogLevel>()
        .map_err(|_| LoggerError::invalid_level(sink, name))
}

/// Builder for [`Logger`]
///
/// Defaults: access sink on stdout at Info, error sink on stderr at Error,
/// no shipper, exit code handed to `std::process::exit`.
pub struct LoggerBuilder {
    project_name: String,
    access_level: LogLevel,
    error_level: LogLevel,
    access_appender: Option<Box<dyn Appender>>,
    error_appender: Option<Box<dyn Appender>>,
    formatter: TextFormatter,
    shipper: Option<Arc<RemoteShipper>>,
    exit_handler: Option<ExitHandler>,
    max_idle_entries: usize,
}

impl LoggerBuilder {
    fn new() -> Self {
        Self {
            project_name: String::new(),
            access_level: LogLevel::Info,
            error_level: LogLevel::Error,
            access_appender: None,
            error_appender: None,
            formatter: TextFormatter::new(),
            shipper: None,
            exit_handler: None,
            max_idle_entries: DEFAULT_MAX_IDLE,
        }
    }

    /// Directory name that caller paths are made relative to.
    #[must_use = "builder methods return a new value"]
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn access_level(mut self, level: LogLevel) -> Self {
        self.access_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_level(mut self, level: LogLevel) -> Self {
        self.error_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn access_appender(mut self, appender: Box<dyn Appender>) -> Self {
        self.access_appender = Some(appender);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_appender(mut self, appender: Box<dyn Appender>) -> Self {
        self.error_appender = Some(appender);
        self
    }

    /// Text formatting shared by both sinks.
    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: TextFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Ship every emitted record from both sinks.
    #[must_use = "builder methods return a new value"]
    pub fn shipper(mut self, shipper: RemoteShipper) -> Self {
        self.shipper = Some(Arc::new(shipper));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_handler(mut self, handler: ExitHandler) -> Self {
        self.exit_handler = Some(handler);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_idle_entries(mut self, max_idle: usize) -> Self {
        self.max_idle_entries = max_idle;
        self
    }

    pub fn build(self) -> Logger {
        let access_out = self
            .access_appender
            .unwrap_or_else(|| Box::new(ConsoleAppender::stdout()));
        let error_out = self
            .error_appender
            .unwrap_or_else(|| Box::new(ConsoleAppender::stderr()));

        let mut access = LogSink::new(
            SinkKind::Access,
            self.access_level,
            Box::new(self.formatter.clone()),
            access_out,
        );
        let mut error = LogSink::new(
            SinkKind::Error,
            self.error_level,
            Box::new(self.formatter),
            error_out,
        );

        if let Some(shipper) = &self.shipper {
            let hook: Arc<dyn Hook> = Arc::clone(shipper) as Arc<dyn Hook>;
            access.add_hook(Arc::clone(&hook));
            error.add_hook(hook);
        }

        let exit_handler: ExitHandler = match self.exit_handler {
            Some(handler) => handler,
            None => Arc::new(exit_process),
        };

        Logger {
            access,
            error,
            resolver: CallerResolver::new(&self.project_name),
            pool: EntryPool::with_max_idle(self.max_idle_entries),
            shipper: self.shipper,
            exit_handler,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! A single leveled output: threshold, formatter, appender and hooks

use super::{
    appender::Appender, error::Result, formatter::Formatter, hook::Hook, log_level::LogLevel,
    metrics::LoggerMetrics, record::LogRecord,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Which of the two sinks a record goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Access,
    Error,
}

impl SinkKind {
    /// Debug, Info and Warn go to the access sink; everything more severe to
    /// the error sink.
    pub fn for_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug | LogLevel::Info | LogLevel::Warn => SinkKind::Access,
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => SinkKind::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SinkKind::Access => "access",
            SinkKind::Error => "error",
        }
    }
}

/// Records below `min_level` are discarded before any work is done.
/// Writes to the appender are serialized, so two records never interleave.
pub struct LogSink {
    kind: SinkKind,
    min_level: RwLock<LogLevel>,
    formatter: Box<dyn Formatter>,
    appender: Mutex<Box<dyn Appender>>,
    hooks: Vec<Arc<dyn Hook>>,
    metrics: LoggerMetrics,
}

impl LogSink {
    pub fn new(
        kind: SinkKind,
        min_level: LogLevel,
        formatter: Box<dyn Formatter>,
        appender: Box<dyn Appender>,
    ) -> Self {
        Self {
            kind,
            min_level: RwLock::new(min_level),
            formatter,
            appender: Mutex::new(appender),
            hooks: Vec::new(),
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn add_hook(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
    }

    pub fn kind(&self) -> SinkKind {
        self.kind
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    pub fn hooks(&self) -> &[Arc<dyn Hook>] {
        &self.hooks
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Fire hooks, then render and write the record. Failures are reported
    /// on stderr and counted; they never reach the caller.
    pub fn emit(&self, record: &LogRecord) {
        self.fire_hooks(record);

        let rendered = match self.formatter.format(record) {
            Ok(rendered) => rendered,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to format {} record: {}", self.kind.name(), e);
                self.metrics.record_format_error();
                self.metrics.record_dropped();
                return;
            }
        };

        let written = self.appender.lock().append(&rendered);
        match written {
            Ok(()) => {
                self.metrics.record_logged();
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to write to {} log: {}", self.kind.name(), e);
                self.metrics.record_write_error();
                self.metrics.record_dropped();
            }
        }
    }

    fn fire_hooks(&self, record: &LogRecord) {
        for hook in &self.hooks {
            if !hook.levels().contains(&record.level) {
                continue;
            }
            if let Err(e) = hook.fire(record) {
                eprintln!("[LOGGER ERROR] Failed to fire hook '{}': {}", hook.name(), e);
                self.metrics.record_hook_error();
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.appender.lock().flush()
    }
}

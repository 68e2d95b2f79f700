//! Logger instance bound to one encoder, one severity floor and one sink set

use super::{
    appender::Appender,
    encoder::Encoder,
    error::{LoggerError, Result},
    field::Field,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::Mutex;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Shared handle returned by registry lookups
pub type LoggerHandle = Arc<Logger>;

/// Name carried by the sentinel returned before any configuration is installed
pub const UNCONFIGURED_NAME: &str = "unconfigured";

/// A structured logger.
///
/// Everything that shapes output is fixed at construction; changing the level,
/// encoder or sinks means building a new instance. Emission never returns an
/// error: records below the floor are counted and dropped, sink failures are
/// counted and reported on stderr.
pub struct Logger {
    name: String,
    /// `None` disables every level
    min_level: Option<LogLevel>,
    encoder: Encoder,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    show_caller: bool,
    development: bool,
    metrics: LoggerMetrics,
}

impl Logger {
    /// The sentinel used before configuration: discards every record
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            name: UNCONFIGURED_NAME.to_string(),
            min_level: None,
            encoder: Encoder::default(),
            appenders: Mutex::new(Vec::new()),
            show_caller: false,
            development: false,
            metrics: LoggerMetrics::new(),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use named_logger_registry::prelude::*;
    ///
    /// let logger = Logger::builder("audit")
    ///     .min_level(LogLevel::Warn)
    ///     .encoder(Encoder::Json)
    ///     .show_caller(true)
    ///     .build();
    /// assert!(!logger.enabled(LogLevel::Info));
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Severity floor, or `None` for the unconfigured sentinel
    pub fn level(&self) -> Option<LogLevel> {
        self.min_level
    }

    pub fn encoder(&self) -> Encoder {
        self.encoder
    }

    pub fn is_unconfigured(&self) -> bool {
        self.min_level.is_none()
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.min_level.is_some_and(|min| level >= min)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Emit one record with ordered fields.
    ///
    /// `Panic` records panic the calling thread after being written, and
    /// `Fatal` records exit the process with status 1. Both happen whether or
    /// not the record clears the severity floor.
    #[track_caller]
    pub fn emit<I>(&self, level: LogLevel, message: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = Field>,
    {
        let location = Location::caller();
        let message = message.into();

        if !self.enabled(level) {
            self.metrics.record_suppressed();
            self.terminate(level, &message);
            return;
        }

        let mut entry = LogEntry::new(level, message).with_fields(fields.into_iter().collect());
        if self.show_caller {
            entry = entry.with_caller(Caller::from_location(location));
        }

        self.write_entry(&entry);
        self.terminate(level, &entry.message);
    }

    fn write_entry(&self, entry: &LogEntry) {
        let line = self.encoder.encode(entry);
        let mut appenders = self.appenders.lock();

        let mut failed = Self::process_sync(&mut appenders, &line, self.development);
        if self.development && Self::flush_all(&mut appenders, true).is_some() {
            failed = true;
        }
        drop(appenders);

        if failed {
            let previous = self.metrics.record_write_failure();
            if !self.development && (previous == 0 || (previous + 1) % 1000 == 0) {
                eprintln!(
                    "[LOGGER WARNING] Logger '{}' failed to write {} records so far.",
                    self.name,
                    previous + 1
                );
            }
        } else {
            self.metrics.record_written();
        }
    }

    /// Hand one encoded line to every appender with per-appender panic isolation
    ///
    /// One failing appender doesn't prevent the others from receiving the line.
    fn process_sync(appenders: &mut [Box<dyn Appender>], line: &str, verbose: bool) -> bool {
        let mut has_error = false;

        for appender in appenders.iter_mut() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(line)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if verbose {
                        eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                    }
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                         Other appenders continue to function.",
                        appender.name(),
                        panic_msg
                    );
                    has_error = true;
                }
            }
        }

        has_error
    }

    fn flush_all(appenders: &mut [Box<dyn Appender>], verbose: bool) -> Option<LoggerError> {
        let mut first_error = None;
        for appender in appenders.iter_mut() {
            if let Err(e) = appender.flush() {
                if verbose {
                    eprintln!("[LOGGER ERROR] Appender '{}' flush failed: {}", appender.name(), e);
                }
                first_error.get_or_insert(e);
            }
        }
        first_error
    }

    /// Block until every appender has written out its buffered records.
    ///
    /// All appenders are flushed even if one fails; the first failure is returned.
    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        match Self::flush_all(&mut appenders, false) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn terminate(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Panic => {
                let _ = self.flush();
                panic!("{}", message);
            }
            LogLevel::Fatal => {
                let _ = self.flush();
                std::process::exit(1);
            }
            _ => {}
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message, []);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message, []);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message, []);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message, []);
    }

    /// Write the record, then panic with its message
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) {
        self.emit(LogLevel::Panic, message, []);
    }

    /// Write the record, then exit the process with status 1
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.emit(LogLevel::Fatal, message, []);
    }

    #[track_caller]
    pub fn debug_with(&self, message: impl Into<String>, fields: impl IntoIterator<Item = Field>) {
        self.emit(LogLevel::Debug, message, fields);
    }

    #[track_caller]
    pub fn info_with(&self, message: impl Into<String>, fields: impl IntoIterator<Item = Field>) {
        self.emit(LogLevel::Info, message, fields);
    }

    #[track_caller]
    pub fn warn_with(&self, message: impl Into<String>, fields: impl IntoIterator<Item = Field>) {
        self.emit(LogLevel::Warn, message, fields);
    }

    #[track_caller]
    pub fn error_with(&self, message: impl Into<String>, fields: impl IntoIterator<Item = Field>) {
        self.emit(LogLevel::Error, message, fields);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("encoder", &self.encoder)
            .field("show_caller", &self.show_caller)
            .field("development", &self.development)
            .finish_non_exhaustive()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush logger '{}' during drop: {}", self.name, e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use named_logger_registry::prelude::*;
///
/// let logger = Logger::builder("default")
///     .min_level(LogLevel::Debug)
///     .appender(ConsoleAppender::new())
///     .development(true)
///     .build();
/// logger.debug("ready");
/// ```
pub struct LoggerBuilder {
    name: String,
    min_level: LogLevel,
    encoder: Encoder,
    appenders: Vec<Box<dyn Appender>>,
    show_caller: bool,
    development: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Info,
            encoder: Encoder::default(),
            appenders: Vec::new(),
            show_caller: false,
            development: false,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Add an appender; every record is written to all appenders in order
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Attach `file:line` of the emitting call to every record
    #[must_use = "builder methods return a new value"]
    pub fn show_caller(mut self, enabled: bool) -> Self {
        self.show_caller = enabled;
        self
    }

    /// Flush after every record and report each sink failure on stderr
    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, enabled: bool) -> Self {
        self.development = enabled;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            name: self.name,
            min_level: Some(self.min_level),
            encoder: self.encoder,
            appenders: Mutex::new(self.appenders),
            show_caller: self.show_caller,
            development: self.development,
            metrics: LoggerMetrics::new(),
        }
    }
}

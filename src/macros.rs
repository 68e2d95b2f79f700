//! Logging macros with `format!`-style message arguments.
//!
//! The macros work on anything that derefs to a [`Logger`](crate::Logger),
//! including the handles returned by the registry.
//!
//! # Examples
//!
//! ```
//! use named_logger_registry::prelude::*;
//! use named_logger_registry::info;
//!
//! let logger = Logger::builder("demo").appender(ConsoleAppender::new()).build();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at the given level.
///
/// # Examples
///
/// ```
/// # use named_logger_registry::prelude::*;
/// # let logger = Logger::builder("demo").appender(ConsoleAppender::new()).build();
/// use named_logger_registry::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.emit($level, format!($($arg)+), ::std::iter::empty::<$crate::Field>())
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use named_logger_registry::prelude::*;
/// # let logger = Logger::builder("demo").min_level(LogLevel::Debug).build();
/// use named_logger_registry::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use named_logger_registry::prelude::*;
/// # let logger = Logger::builder("demo").build();
/// use named_logger_registry::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then exit the process with status 1.
///
/// # Examples
///
/// ```no_run
/// # use named_logger_registry::prelude::*;
/// # let logger = Logger::builder("demo").build();
/// use named_logger_registry::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

//! # Named Logger Registry
//!
//! Named, independently configured loggers built from one configuration
//! document and looked up by name from anywhere in the process.
//!
//! ## Features
//!
//! - **Named Profiles**: Each logger has its own severity floor, output file and encoding
//! - **Rotating Files**: Size-based rotation with age and count retention and gzip compression
//! - **Fallback Lookup**: Unknown names resolve to the `default` logger, never to an error
//! - **Thread Safe**: Lookups are lock-shared and handles are cheap to clone
//!
//! ## Example
//!
//! ```no_run
//! use named_logger_registry::{get_logger, init_from_file, shutdown, Field};
//!
//! init_from_file("./configs/log_config.yaml")?;
//!
//! let logger = get_logger("error");
//! logger.error_with("upload failed", [Field::string("bucket", "media"), Field::int("status", 503)]);
//!
//! shutdown();
//! # Ok::<(), named_logger_registry::LoggerError>(())
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod factory;
pub mod global;
pub mod macros;
pub mod registry;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::config::{LogFormat, Profile, ResolvedConfig};
    pub use crate::core::{
        Appender, ConfigValidationError, Encoder, Field, FieldValue, LogEntry, LogLevel, Logger,
        LoggerBuilder, LoggerError, LoggerHandle, LoggerMetrics, Result,
    };
    pub use crate::global::{get_default_logger, get_logger, init, init_from_file, shutdown};
    pub use crate::registry::LoggerRegistry;
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use config::{load_from_file, resolve, LogFormat, Profile, RawConfig, RawProfile, ResolvedConfig};
pub use core::{
    Appender, Caller, ConfigValidationError, Encoder, Field, FieldValue, LogEntry, LogLevel,
    Logger, LoggerBuilder, LoggerError, LoggerHandle, LoggerMetrics, Result, UNCONFIGURED_NAME,
};
pub use global::{get_default_logger, get_logger, init, init_from_file, registry, shutdown};
pub use registry::LoggerRegistry;

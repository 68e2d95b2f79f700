//! Core logger types and traits

pub mod appender;
pub mod encoder;
pub mod error;
pub mod field;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;

pub use appender::Appender;
pub use encoder::{format_timestamp, Encoder, TIMESTAMP_FORMAT};
pub use error::{ConfigValidationError, LoggerError, Result};
pub use field::{Field, FieldValue};
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, LoggerHandle, UNCONFIGURED_NAME};
pub use metrics::LoggerMetrics;

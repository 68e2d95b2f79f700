//! Appender trait for log output destinations

use super::error::Result;

/// Destination for already-encoded records.
///
/// Each call to `append` receives one complete line without its trailing
/// newline; the appender owns the framing.
pub trait Appender: Send {
    fn append(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

//! Process-wide registry and its free-function accessors
//!
//! ```no_run
//! use named_logger_registry::{get_default_logger, get_logger, init_from_file, shutdown};
//!
//! init_from_file("./configs/log_config.yaml")?;
//!
//! get_default_logger().info("service started");
//! get_logger("error").error("request failed");
//!
//! shutdown();
//! # Ok::<(), named_logger_registry::LoggerError>(())
//! ```

use crate::config::{self, ResolvedConfig};
use crate::core::{LoggerHandle, Result};
use crate::registry::LoggerRegistry;
use once_cell::sync::Lazy;
use std::path::Path;

static REGISTRY: Lazy<LoggerRegistry> = Lazy::new(LoggerRegistry::new);

/// The registry behind the free functions of this module
pub fn registry() -> &'static LoggerRegistry {
    &REGISTRY
}

/// Load, resolve and apply a configuration file.
///
/// Nothing is registered when the file cannot be read, parsed or validated.
pub fn init_from_file(path: impl AsRef<Path>) -> Result<()> {
    let resolved = config::load_from_file(path)?;
    init(&resolved)
}

/// Register loggers for an already resolved configuration
pub fn init(config: &ResolvedConfig) -> Result<()> {
    REGISTRY.initialize(config)
}

/// Logger registered under `name`, or the default logger
pub fn get_logger(name: &str) -> LoggerHandle {
    REGISTRY.lookup(name)
}

/// Logger of the `default` profile; discards records before initialization
pub fn get_default_logger() -> LoggerHandle {
    REGISTRY.default_logger()
}

/// Flush and release every registered logger. Safe to call repeatedly.
pub fn shutdown() {
    REGISTRY.close();
}

//! Name-keyed store of built loggers
//!
//! The registry owns every logger created from a [`ResolvedConfig`]. Lookups
//! take a read lock and hand out shared handles, so they scale with the
//! number of reader threads; initialization and close take the write lock
//! for their whole pass.

use crate::config::{ResolvedConfig, DEFAULT_PROFILE};
use crate::core::{Logger, LoggerHandle, Result};
use crate::factory;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

struct RegistryState {
    loggers: HashMap<String, LoggerHandle>,
    /// Returned for unknown names; the `default` logger once initialized
    fallback: LoggerHandle,
}

impl RegistryState {
    fn empty() -> Self {
        Self {
            loggers: HashMap::new(),
            fallback: Arc::new(Logger::unconfigured()),
        }
    }
}

/// Registry of named loggers with a fallback for unknown names
///
/// # Example
///
/// ```no_run
/// use named_logger_registry::{config, LoggerRegistry};
///
/// let registry = LoggerRegistry::new();
/// let resolved = config::load_from_file("./configs/log_config.yaml")?;
/// registry.initialize(&resolved)?;
///
/// registry.lookup("error").error("disk quota exceeded");
/// registry.lookup("no-such-logger").info("goes to the default logger");
///
/// registry.close();
/// # Ok::<(), named_logger_registry::LoggerError>(())
/// ```
pub struct LoggerRegistry {
    state: RwLock<RegistryState>,
}

impl LoggerRegistry {
    /// Create an empty registry whose fallback discards everything
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::empty()),
        }
    }

    /// Build and register one logger per profile, in order.
    ///
    /// A profile whose name is already registered replaces the old logger.
    /// The `default` profile also becomes the fallback. On failure the
    /// loggers built before the failing profile stay registered.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::LoggerBuild`](crate::LoggerError::LoggerBuild)
    /// for the first profile whose logger cannot be created
    pub fn initialize(&self, config: &ResolvedConfig) -> Result<()> {
        let mut state = self.state.write();

        for profile in config {
            let logger: LoggerHandle = Arc::new(factory::build(profile)?);
            if profile.name == DEFAULT_PROFILE {
                state.fallback = Arc::clone(&logger);
            }
            if let Some(previous) = state.loggers.insert(profile.name.clone(), logger) {
                let _ = previous.flush();
            }
        }

        Ok(())
    }

    /// Logger registered under `name`, or the fallback if there is none.
    ///
    /// Never fails. An empty name or `"default"` resolves to the fallback.
    pub fn lookup(&self, name: &str) -> LoggerHandle {
        let state = self.state.read();
        if name.is_empty() || name == DEFAULT_PROFILE {
            return Arc::clone(&state.fallback);
        }
        state
            .loggers
            .get(name)
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(&state.fallback))
    }

    pub fn default_logger(&self) -> LoggerHandle {
        Arc::clone(&self.state.read().fallback)
    }

    /// Flush and drop every registered logger.
    ///
    /// Afterwards every lookup yields the unconfigured fallback. Handles
    /// already given out keep working until their holders drop them. Calling
    /// this on an empty registry does nothing.
    pub fn close(&self) {
        let mut state = self.state.write();
        for (_, logger) in state.loggers.drain() {
            let _ = logger.flush();
        }
        state.fallback = Arc::new(Logger::unconfigured());
    }

    /// Registered names in no particular order
    pub fn names(&self) -> Vec<String> {
        self.state.read().loggers.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.read().loggers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.state.read().loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().loggers.is_empty()
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LoggerRegistry {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, RawConfig, RawProfile};
    use crate::core::{LogLevel, LoggerError};
    use std::fs;
    use std::path::Path;
    use std::thread;
    use tempfile::tempdir;

    fn raw(name: &str, level: &str, path: &Path) -> RawProfile {
        RawProfile {
            name: name.to_string(),
            level: level.to_string(),
            file_name: path.to_string_lossy().into_owned(),
            json_encoder: true,
            ..RawProfile::default()
        }
    }

    fn two_profiles(dir: &Path) -> ResolvedConfig {
        resolve(RawConfig {
            loggers: vec![
                raw("default", "debug", &dir.join("app.log")),
                raw("error", "error", &dir.join("err.log")),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_new_registry_is_unconfigured() {
        let registry = LoggerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("anything").is_unconfigured());
        assert!(registry.default_logger().is_unconfigured());
    }

    #[test]
    fn test_lookup_returns_registered_loggers() {
        let dir = tempdir().unwrap();
        let registry = LoggerRegistry::new();
        registry.initialize(&two_profiles(dir.path())).unwrap();

        let default = registry.lookup("default");
        let error = registry.lookup("error");
        assert_eq!(default.level(), Some(LogLevel::Debug));
        assert_eq!(error.level(), Some(LogLevel::Error));
        assert!(!Arc::ptr_eq(&default, &error));

        assert!(Arc::ptr_eq(&registry.lookup("error"), &error));
        assert!(Arc::ptr_eq(&registry.default_logger(), &default));
        assert_eq!(registry.len(), 2);

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, ["default", "error"]);
    }

    #[test]
    fn test_unknown_and_empty_names_fall_back_to_default() {
        let dir = tempdir().unwrap();
        let registry = LoggerRegistry::new();
        registry.initialize(&two_profiles(dir.path())).unwrap();

        let default = registry.default_logger();
        assert!(Arc::ptr_eq(&registry.lookup("missing"), &default));
        assert!(Arc::ptr_eq(&registry.lookup(""), &default));
    }

    #[test]
    fn test_floors_apply_per_logger() {
        let dir = tempdir().unwrap();
        let registry = LoggerRegistry::new();
        registry.initialize(&two_profiles(dir.path())).unwrap();

        registry.lookup("default").debug("startup details");
        registry.lookup("error").warn("not important enough");
        registry.lookup("error").error("disk full");
        registry.close();

        let app = fs::read_to_string(dir.path().join("app.log")).unwrap();
        let err = fs::read_to_string(dir.path().join("err.log")).unwrap();
        assert!(app.contains("startup details"));
        assert!(!err.contains("not important enough"));
        assert!(err.contains("disk full"));
    }

    #[test]
    fn test_close_is_idempotent_and_resets_fallback() {
        let dir = tempdir().unwrap();
        let registry = LoggerRegistry::new();
        registry.initialize(&two_profiles(dir.path())).unwrap();

        let held = registry.lookup("error");
        registry.close();
        registry.close();

        assert!(registry.is_empty());
        assert!(registry.lookup("error").is_unconfigured());
        assert!(registry.default_logger().is_unconfigured());

        // handles obtained earlier stay usable
        held.error("after close");
        held.flush().unwrap();
    }

    #[test]
    fn test_close_on_empty_registry() {
        let registry = LoggerRegistry::new();
        registry.close();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reinitialize_replaces_loggers() {
        let dir = tempdir().unwrap();
        let registry = LoggerRegistry::new();
        registry.initialize(&two_profiles(dir.path())).unwrap();
        let first = registry.lookup("error");

        registry.initialize(&two_profiles(dir.path())).unwrap();
        assert!(!Arc::ptr_eq(&registry.lookup("error"), &first));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_partial_initialization_keeps_earlier_loggers() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "file in the way").unwrap();

        let config = resolve(RawConfig {
            loggers: vec![
                raw("default", "info", &dir.path().join("app.log")),
                raw("audit", "info", &blocker.join("audit.log")),
                raw("error", "error", &dir.path().join("err.log")),
            ],
        })
        .unwrap();

        let registry = LoggerRegistry::new();
        let err = registry.initialize(&config).unwrap_err();
        assert!(matches!(err, LoggerError::LoggerBuild { ref name, .. } if name == "audit"));

        assert!(registry.contains("default"));
        assert!(!registry.contains("audit"));
        assert!(!registry.contains("error"));
        assert!(!registry.default_logger().is_unconfigured());
    }

    #[test]
    fn test_concurrent_lookups() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(LoggerRegistry::new());
        registry.initialize(&two_profiles(dir.path())).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for j in 0..50 {
                        registry.lookup("error").error(format!("thread {} record {}", i, j));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let error = registry.lookup("error");
        assert_eq!(error.metrics().total_written(), 400);
    }
}

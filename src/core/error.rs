//! Error types for the logger registry

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Whole-set configuration problems detected after defaulting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("no logger configurations found")]
    EmptyConfig,

    #[error("logger #{index}: name is required")]
    MissingName { index: usize },

    #[error("logger {name}: file_name is required")]
    MissingOutputPath { name: String },

    #[error("logger {name}: name is declared more than once")]
    DuplicateName { name: String },

    #[error("no default logger configuration found")]
    NoDefaultProfile,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Configuration document could not be read
    #[error("failed to read config '{}': {source}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document could not be deserialized
    #[error("failed to parse config '{}': {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("invalid logger configuration: {0}")]
    ConfigValidation(#[from] ConfigValidationError),

    /// Output directory or file could not be created
    #[error("failed to initialize sink for '{}': {source}", path.display())]
    SinkInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Factory failure for a named profile
    #[error("failed to create logger {name}: {source}")]
    LoggerBuild {
        name: String,
        #[source]
        source: Box<LoggerError>,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    pub fn config_load(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::ConfigLoad {
            path: path.into(),
            source,
        }
    }

    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LoggerError::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn sink_init(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::SinkInit {
            path: path.into(),
            source,
        }
    }

    /// Wrap a factory failure with the name of the profile being built
    pub fn logger_build(name: impl Into<String>, source: LoggerError) -> Self {
        LoggerError::LoggerBuild {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// The validation failure behind this error, if any
    pub fn validation(&self) -> Option<&ConfigValidationError> {
        match self {
            LoggerError::ConfigValidation(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = LoggerError::from(ConfigValidationError::NoDefaultProfile);
        assert_eq!(
            err.to_string(),
            "invalid logger configuration: no default logger configuration found"
        );

        let err = LoggerError::from(ConfigValidationError::MissingOutputPath {
            name: "audit".to_string(),
        });
        assert!(err.to_string().contains("logger audit: file_name is required"));
        assert_eq!(
            err.validation(),
            Some(&ConfigValidationError::MissingOutputPath {
                name: "audit".to_string()
            })
        );
    }

    #[test]
    fn test_logger_build_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::logger_build("error", LoggerError::sink_init("/root/x/err.log", io_err));

        assert!(matches!(err, LoggerError::LoggerBuild { ref name, .. } if name == "error"));
        assert!(err.to_string().starts_with("failed to create logger error"));
        assert!(err.to_string().contains("/root/x/err.log"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_file_rotation_display() {
        let err = LoggerError::file_rotation("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': Disk full"
        );
        assert!(err.validation().is_none());
    }
}

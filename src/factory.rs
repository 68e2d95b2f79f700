//! Builds one logger from one resolved profile

use crate::appenders::{ConsoleAppender, RotatingFileAppender};
use crate::config::Profile;
use crate::core::{Logger, LoggerError, Result};

/// Create the logger described by `profile`.
///
/// Records go to a rotating file at the profile's output path and are
/// mirrored to standard output. Missing parent directories are created.
/// Failures are reported as [`LoggerError::LoggerBuild`] naming the profile.
pub fn build(profile: &Profile) -> Result<Logger> {
    let file = RotatingFileAppender::with_policy(&profile.output_path, profile.rotation_policy())
        .map_err(|e| LoggerError::logger_build(&profile.name, e))?;

    Ok(Logger::builder(&profile.name)
        .min_level(profile.level)
        .encoder(profile.format.encoder())
        .appender(file)
        .appender(ConsoleAppender::new())
        .show_caller(profile.show_caller)
        .development(profile.development)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Profile, RawProfile};
    use crate::core::{Encoder, LogLevel};
    use std::fs;
    use tempfile::tempdir;

    fn profile(name: &str, level: &str, path: &std::path::Path, json: bool) -> Profile {
        Profile::from_raw(RawProfile {
            name: name.to_string(),
            level: level.to_string(),
            file_name: path.to_string_lossy().into_owned(),
            json_encoder: json,
            ..RawProfile::default()
        })
    }

    #[test]
    fn test_build_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("app.log");

        let logger = build(&profile("default", "debug", &path, false)).unwrap();
        assert_eq!(logger.name(), "default");
        assert_eq!(logger.level(), Some(LogLevel::Debug));
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_build_selects_encoder() {
        let dir = tempdir().unwrap();

        let json = build(&profile("a", "info", &dir.path().join("a.log"), true)).unwrap();
        assert_eq!(json.encoder(), Encoder::Json);

        let console = build(&profile("b", "info", &dir.path().join("b.log"), false)).unwrap();
        assert_eq!(console.encoder(), Encoder::Console { colored: true });
    }

    #[test]
    fn test_records_reach_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("err.log");

        let logger = build(&profile("error", "error", &path, true)).unwrap();
        logger.warn("dropped");
        logger.error("kept");
        logger.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"msg\":\"kept\""));
        assert!(!contents.contains("dropped"));
    }

    #[test]
    fn test_unwritable_location_names_the_profile() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = build(&profile("audit", "info", &blocker.join("audit.log"), false));
        match result {
            Err(LoggerError::LoggerBuild { name, source }) => {
                assert_eq!(name, "audit");
                assert!(matches!(*source, LoggerError::SinkInit { .. }));
            }
            other => panic!("expected LoggerBuild, got {:?}", other.map(|l| l.name().to_string())),
        }
    }
}

//! Logger configuration: raw document, defaulting and validation
//!
//! A configuration document lists logger profiles:
//!
//! ```yaml
//! loggers:
//!   - name: default
//!     level: debug
//!     file_name: /var/log/app/app.log
//!     max_size: 100
//!     max_backups: 10
//!     max_age: 7
//!     compress: true
//!   - name: error
//!     level: error
//!     file_name: /var/log/app/err.log
//!     json_encoder: true
//!     show_caller: true
//! ```
//!
//! Every profile is defaulted on its own ([`Profile::from_raw`]) and the set
//! is then validated as a whole ([`resolve`]).

use crate::appenders::RotationPolicy;
use crate::core::{ConfigValidationError, Encoder, LogLevel, LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the mandatory profile that also serves as the fallback logger
pub const DEFAULT_PROFILE: &str = "default";

pub const DEFAULT_MAX_AGE_DAYS: u32 = 7;
pub const DEFAULT_MAX_SIZE_MB: u32 = 100;
pub const DEFAULT_MAX_BACKUPS: u32 = 10;

/// Configuration document as written by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default, alias = "zaplog")]
    pub loggers: Vec<RawProfile>,
}

/// One logger profile before defaulting; absent fields are empty or zero
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProfile {
    pub name: String,
    pub level: String,
    pub file_name: String,
    /// Days to keep rotated files
    pub max_age: u32,
    /// Megabytes before the active file is rotated
    pub max_size: u32,
    pub max_backups: u32,
    pub compress: bool,
    pub json_encoder: bool,
    pub development: bool,
    pub show_caller: bool,
}

/// Document syntax, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON, everything else is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

impl RawConfig {
    /// Parse a document; `origin` only labels errors
    pub fn parse(text: &str, format: ConfigFormat, origin: &Path) -> Result<Self> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| LoggerError::config_parse(origin, e.to_string())),
            ConfigFormat::Json => serde_json::from_str(text)
                .map_err(|e| LoggerError::config_parse(origin, e.to_string())),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Self::parse(text, ConfigFormat::Yaml, Path::new("<inline>"))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::parse(text, ConfigFormat::Json, Path::new("<inline>"))
    }

    /// Read and parse a document without resolving it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LoggerError::config_load(path, e))?;
        Self::parse(&text, ConfigFormat::from_path(path), path)
    }
}

/// Output encoding of a profile, resolved once when the logger is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Console,
}

impl LogFormat {
    pub fn encoder(&self) -> Encoder {
        match self {
            LogFormat::Json => Encoder::Json,
            LogFormat::Console => Encoder::console(),
        }
    }
}

/// A fully defaulted logger profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub level: LogLevel,
    pub output_path: PathBuf,
    pub max_age_days: u32,
    pub max_size_mb: u32,
    pub max_backups: u32,
    pub compress: bool,
    pub format: LogFormat,
    pub development: bool,
    pub show_caller: bool,
}

impl Profile {
    /// Apply the per-field defaults.
    ///
    /// Unknown or empty levels become `info`, and zero limits become 7 days,
    /// 100 MB and 10 backups. Name and path are carried over untouched so
    /// validation still sees them.
    pub fn from_raw(raw: RawProfile) -> Self {
        fn or_default(value: u32, default: u32) -> u32 {
            if value == 0 {
                default
            } else {
                value
            }
        }

        Self {
            level: LogLevel::from_config_name(&raw.level).unwrap_or(LogLevel::Info),
            output_path: PathBuf::from(raw.file_name),
            max_age_days: or_default(raw.max_age, DEFAULT_MAX_AGE_DAYS),
            max_size_mb: or_default(raw.max_size, DEFAULT_MAX_SIZE_MB),
            max_backups: or_default(raw.max_backups, DEFAULT_MAX_BACKUPS),
            compress: raw.compress,
            format: if raw.json_encoder {
                LogFormat::Json
            } else {
                LogFormat::Console
            },
            development: raw.development,
            show_caller: raw.show_caller,
            name: raw.name,
        }
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_PROFILE
    }

    /// Parameters handed to the rotating file sink
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy::new()
            .with_max_size_mb(u64::from(self.max_size_mb))
            .with_max_age_days(u64::from(self.max_age_days))
            .with_max_backups(self.max_backups as usize)
            .with_compression(self.compress)
            .with_local_time(true)
    }
}

/// Validated, ordered profile set containing exactly one `default`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    profiles: Vec<Profile>,
}

impl ResolvedConfig {
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn default_profile(&self) -> &Profile {
        // resolve() guarantees presence, the first entry is never reached
        self.get(DEFAULT_PROFILE).unwrap_or(&self.profiles[0])
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.profiles.iter()
    }
}

impl<'a> IntoIterator for &'a ResolvedConfig {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

/// Default every profile, then validate the set. Fails on the first problem.
pub fn resolve(raw: RawConfig) -> Result<ResolvedConfig> {
    let profiles: Vec<Profile> = raw.loggers.into_iter().map(Profile::from_raw).collect();
    validate(&profiles)?;
    Ok(ResolvedConfig { profiles })
}

fn validate(profiles: &[Profile]) -> std::result::Result<(), ConfigValidationError> {
    if profiles.is_empty() {
        return Err(ConfigValidationError::EmptyConfig);
    }

    let mut seen = HashSet::with_capacity(profiles.len());
    for (index, profile) in profiles.iter().enumerate() {
        if profile.name.is_empty() {
            return Err(ConfigValidationError::MissingName { index });
        }
        if profile.output_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingOutputPath {
                name: profile.name.clone(),
            });
        }
        if !seen.insert(profile.name.as_str()) {
            return Err(ConfigValidationError::DuplicateName {
                name: profile.name.clone(),
            });
        }
    }

    if !seen.contains(DEFAULT_PROFILE) {
        return Err(ConfigValidationError::NoDefaultProfile);
    }
    Ok(())
}

/// Read, parse and resolve a configuration file
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ResolvedConfig> {
    resolve(RawConfig::from_file(path)?)
}

//! Rotating file appender with automatic log rotation
//!
//! The active file is rotated once the next write would take it past the
//! configured size. The rotated file is renamed with a timestamp
//! (`app-2026-10-16T09-30-00.123.log`), and the backup set is then pruned by
//! count and age and optionally gzip-compressed.

use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// strftime pattern embedded in backup file names
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

const MEGABYTE: u64 = 1024 * 1024;

/// Configuration for rotating file appender
///
/// # Examples
///
/// ```
/// use named_logger_registry::appenders::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(50)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(7 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_size_bytes, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size that triggers rotation of the active file
    pub max_size_bytes: u64,
    /// Backups older than this are removed; `None` keeps them regardless of age
    pub max_age: Option<Duration>,
    /// Maximum number of backups to keep; 0 keeps all of them
    pub max_backups: usize,
    /// Whether to gzip rotated files
    pub compress: bool,
    /// Use local time instead of UTC in backup names
    pub local_time: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: 100 * MEGABYTE,
            max_age: None,
            max_backups: 0,
            compress: false,
            local_time: true,
        }
    }
}

impl RotationPolicy {
    /// Create a new rotation policy with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size_bytes = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_size_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(self, days: u64) -> Self {
        self.with_max_age(Duration::from_secs(days.saturating_mul(24 * 3600)))
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, enabled: bool) -> Self {
        self.local_time = enabled;
        self
    }

    fn now(&self) -> NaiveDateTime {
        if self.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }
}

/// A rotated file found next to the active log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub path: PathBuf,
    pub rotated_at: NaiveDateTime,
    pub compressed: bool,
}

/// Size-triggered rotating file appender
///
/// # Examples
///
/// ```no_run
/// use named_logger_registry::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(100)
///     .with_max_backups(10)
///     .with_max_age_days(7)
///     .with_compression(true);
/// let appender = RotatingFileAppender::with_policy("/var/log/app/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileAppender {
    /// Create a new rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::SinkInit`] if the directory or file cannot be created
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create a new rotating file appender with custom policy
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::SinkInit`] if the directory or file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LoggerError::sink_init(parent, e))?;
        }

        let (file, current_size) =
            Self::open_active(&base_path).map_err(|e| LoggerError::sink_init(&base_path, e))?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    fn open_active(path: &Path) -> std::io::Result<(File, u64)> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let size = file.metadata()?.len();
        Ok((file, size))
    }

    /// Get current file size
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Get base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Get rotation policy
    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    fn directory(&self) -> PathBuf {
        match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// `("app-", ".log")` for `app.log`
    fn backup_affixes(&self) -> (String, String) {
        let stem = self
            .base_path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("app");
        let ext = self
            .base_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (format!("{}-", stem), ext)
    }

    fn backup_path(&self, at: NaiveDateTime) -> PathBuf {
        let (prefix, ext) = self.backup_affixes();
        self.directory()
            .join(format!("{}{}{}", prefix, at.format(BACKUP_TIME_FORMAT), ext))
    }

    /// Backups next to the active file, newest first
    ///
    /// # Errors
    ///
    /// Returns error if the log directory cannot be listed
    pub fn backups(&self) -> Result<Vec<Backup>> {
        let (prefix, ext) = self.backup_affixes();
        let compressed_ext = format!("{}.gz", ext);

        let mut backups = Vec::new();
        for dir_entry in fs::read_dir(self.directory())? {
            let dir_entry = dir_entry?;
            let file_name = dir_entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };

            let (stamp, compressed) = if let Some(stamp) = rest.strip_suffix(&compressed_ext) {
                (stamp, true)
            } else if let Some(stamp) = rest.strip_suffix(&ext) {
                (stamp, false)
            } else {
                continue;
            };

            if let Ok(rotated_at) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
                backups.push(Backup {
                    path: dir_entry.path(),
                    rotated_at,
                    compressed,
                });
            }
        }

        backups.sort_by(|a, b| b.rotated_at.cmp(&a.rotated_at));
        Ok(backups)
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        // Explicitly drop writer to release file handle before the rename
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        // Backup names must sort in rotation order even when rotations land
        // in the same millisecond
        let mut stamp = self.policy.now();
        if let Some(newest) = self.backups().ok().and_then(|b| b.first().map(|b| b.rotated_at)) {
            if stamp <= newest {
                stamp = newest + ChronoDuration::milliseconds(1);
            }
        }
        let mut backup_path = self.backup_path(stamp);
        while backup_path.exists() || backup_path.with_extension(gz_extension(&backup_path)).exists() {
            stamp += ChronoDuration::milliseconds(1);
            backup_path = self.backup_path(stamp);
        }

        if self.base_path.exists() {
            fs::rename(&self.base_path, &backup_path).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        let (file, _) = Self::open_active(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;

        self.cleanup_backups();
        Ok(())
    }

    /// Enforce the count and age limits, then compress what is left
    ///
    /// Failures here never abort logging; they are reported and retried on
    /// the next rotation.
    fn cleanup_backups(&self) {
        let backups = match self.backups() {
            Ok(backups) => backups,
            Err(e) => {
                eprintln!("[WARN] Failed to list log backups for {}: {}", self.base_path.display(), e);
                return;
            }
        };

        let cutoff = self
            .policy
            .max_age
            .and_then(|age| ChronoDuration::from_std(age).ok())
            .and_then(|age| self.policy.now().checked_sub_signed(age));

        for (index, backup) in backups.iter().enumerate() {
            let over_count = self.policy.max_backups > 0 && index >= self.policy.max_backups;
            let too_old = cutoff.is_some_and(|cutoff| backup.rotated_at < cutoff);

            if over_count || too_old {
                if let Err(e) = fs::remove_file(&backup.path) {
                    eprintln!("[WARN] Failed to remove old backup {}: {}", backup.path.display(), e);
                }
            } else if self.policy.compress && !backup.compressed {
                if let Err(e) = compress_file(&backup.path) {
                    eprintln!("[WARN] {}", e);
                }
            }
        }
    }

    /// Try to reopen the log file (used for recovery after rotation failure)
    fn try_reopen_file(path: &Path) -> Result<(File, u64)> {
        Self::open_active(path).map_err(|e| {
            LoggerError::file_appender(
                path.display().to_string(),
                format!("Failed to reopen after rotation failure: {}", e),
            )
        })
    }
}

/// `log.gz` for `app-....log`, `gz` for an extension-less backup
fn gz_extension(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.gz", ext),
        None => "gz".to_string(),
    }
}

/// Compress a rotated file to `<name>.gz` and remove the original
///
/// The original is only deleted after the compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, Read};

    let gz_path = path.with_extension(gz_extension(path));
    let temp_gz_path = path.with_extension(format!("{}.tmp", gz_extension(path)));

    let compress_err = |message: String, source: std::io::Error| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::file_rotation(path.display().to_string(), format!("{}: {}", message, source))
    };

    let input = File::open(path)
        .map_err(|e| compress_err("Failed to open file for compression".to_string(), e))?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path)
        .map_err(|e| compress_err("Failed to create temporary compressed file".to_string(), e))?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| compress_err("Failed to read from file".to_string(), e))?;
        if bytes_read == 0 {
            break;
        }
        encoder
            .write_all(&buffer[..bytes_read])
            .map_err(|e| compress_err("Failed to compress data chunk".to_string(), e))?;
    }

    encoder
        .finish()
        .and_then(|mut inner| inner.flush())
        .map_err(|e| compress_err("Failed to finish compression".to_string(), e))?;

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        compress_err(format!("Failed to rename compressed file to {}", gz_path.display()), e)
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}. \
            Both compressed and uncompressed versions exist.",
            path.display(),
            e
        );
    }

    Ok(())
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, line: &str) -> Result<()> {
        let bytes_written = line.len() as u64 + 1;

        if self.current_size > 0 && self.current_size + bytes_written > self.policy.max_size_bytes {
            if let Err(e) = self.rotate() {
                // Keep writing to the current file rather than losing records
                eprintln!(
                    "[WARN] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.writer.is_none() {
                    match Self::try_reopen_file(&self.base_path) {
                        Ok((file, size)) => {
                            self.writer = Some(BufWriter::new(file));
                            self.current_size = size;
                        }
                        Err(reopen_err) => {
                            eprintln!(
                                "[ERROR] Failed to reopen log file after rotation failure: {}",
                                reopen_err
                            );
                            return Err(e);
                        }
                    }
                }

                // Allow the file to grow past the limit instead of retrying every write
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;

        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to write log entry: {}", e),
                )
            })?;
        self.current_size += bytes_written;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            // Best effort flush - ignore errors during drop
            let _ = writer.flush();
        }
    }
}

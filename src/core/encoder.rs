//! Record encoders
//!
//! Two encodings are supported:
//! - Json: one JSON object per line for machine consumption
//! - Console: tab-separated, human-readable line with a colorized level
//!
//! Both render the timestamp as ISO 8601 with milliseconds and the local
//! offset, and the level in capitals.

use super::field::fields_to_json;
use super::log_entry::LogEntry;
use chrono::{DateTime, Local};
use colored::Colorize;

/// strftime pattern shared by both encoders: `2026-10-16T09:30:00.123+0200`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Format a timestamp the way both encoders render it
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Encoding strategy chosen once when a logger is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    /// Example: `{"level":"INFO","ts":"2026-10-16T09:30:00.123+0200","msg":"started","port":8080}`
    Json,

    /// Example: `2026-10-16T09:30:00.123+0200	INFO	app/main.rs:12	started	{"port":8080}`
    Console { colored: bool },
}

impl Encoder {
    /// Console encoder with colorized levels
    #[must_use]
    pub fn console() -> Self {
        Encoder::Console { colored: true }
    }

    /// Encode one record as a single line without the trailing newline
    #[must_use]
    pub fn encode(&self, entry: &LogEntry) -> String {
        match self {
            Encoder::Json => Self::encode_json(entry),
            Encoder::Console { colored } => Self::encode_console(entry, *colored),
        }
    }

    fn encode_json(entry: &LogEntry) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "ts".to_string(),
            serde_json::Value::String(format_timestamp(&entry.timestamp)),
        );
        if let Some(caller) = entry.caller {
            json_obj.insert("caller".to_string(), serde_json::Value::String(caller.short()));
        }
        json_obj.insert(
            "msg".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        for (key, value) in fields_to_json(&entry.fields) {
            json_obj.entry(key).or_insert(value);
        }

        serde_json::Value::Object(json_obj).to_string()
    }

    fn encode_console(entry: &LogEntry, colored: bool) -> String {
        let level_str = if colored {
            entry
                .level
                .to_str()
                .color(entry.level.color_code())
                .to_string()
        } else {
            entry.level.to_str().to_string()
        };

        let mut parts = vec![format_timestamp(&entry.timestamp), level_str];
        if let Some(caller) = entry.caller {
            parts.push(caller.short());
        }
        parts.push(entry.message.clone());

        if !entry.fields.is_empty() {
            let fields = serde_json::Value::Object(fields_to_json(&entry.fields));
            parts.push(fields.to_string());
        }

        parts.join("\t")
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::console()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Caller, Field, LogLevel};
    use chrono::TimeZone;

    fn fixed_entry(level: LogLevel, message: &str) -> LogEntry {
        let mut entry = LogEntry::new(level, message.to_string());
        entry.timestamp = Local
            .with_ymd_and_hms(2026, 10, 16, 9, 30, 0)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123);
        entry
    }

    #[test]
    fn test_timestamp_format() {
        let entry = fixed_entry(LogLevel::Info, "x");
        let ts = format_timestamp(&entry.timestamp);
        assert!(ts.starts_with("2026-10-16T09:30:00.123"), "got {}", ts);
        // offset is appended as +hhmm / -hhmm
        assert_eq!(ts.len(), "2026-10-16T09:30:00.123+0000".len());
    }

    #[test]
    fn test_json_encoding() {
        let entry = fixed_entry(LogLevel::Error, "divide failed")
            .with_fields(vec![Field::string("op", "div"), Field::int("lhs", 10)]);

        let line = Encoder::Json.encode(&entry);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["msg"], "divide failed");
        assert_eq!(parsed["op"], "div");
        assert_eq!(parsed["lhs"], 10);
        assert!(parsed.get("caller").is_none());
        assert!(line.starts_with(r#"{"level":"ERROR","ts":"#));
    }

    #[test]
    fn test_json_encoding_with_caller() {
        let entry = fixed_entry(LogLevel::Info, "hello").with_caller(Caller {
            file: "src/bin/server.rs",
            line: 17,
        });

        let parsed: serde_json::Value =
            serde_json::from_str(&Encoder::Json.encode(&entry)).unwrap();
        assert_eq!(parsed["caller"], "bin/server.rs:17");
    }

    #[test]
    fn test_console_encoding_plain() {
        let entry = fixed_entry(LogLevel::Warn, "disk almost full")
            .with_caller(Caller {
                file: "src/main.rs",
                line: 9,
            })
            .with_fields(vec![Field::int("free_mb", 12)]);

        let line = Encoder::Console { colored: false }.encode(&entry);
        let columns: Vec<&str> = line.split('\t').collect();
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[1], "WARN");
        assert_eq!(columns[2], "src/main.rs:9");
        assert_eq!(columns[3], "disk almost full");
        assert_eq!(columns[4], r#"{"free_mb":12}"#);
    }

    #[test]
    fn test_console_encoding_without_optional_columns() {
        let entry = fixed_entry(LogLevel::Debug, "tick");
        let line = Encoder::Console { colored: false }.encode(&entry);
        assert_eq!(line.split('\t').count(), 3);
        assert!(line.ends_with("\tDEBUG\ttick"));
    }

    #[test]
    fn test_fields_never_replace_record_header() {
        let entry = fixed_entry(LogLevel::Error, "real message")
            .with_caller(Caller {
                file: "src/main.rs",
                line: 3,
            })
            .with_fields(vec![
                Field::string("msg", "user supplied"),
                Field::string("level", "DEBUG"),
                Field::string("ts", "yesterday"),
                Field::string("caller", "elsewhere"),
            ]);

        let parsed: serde_json::Value =
            serde_json::from_str(&Encoder::Json.encode(&entry)).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["msg"], "real message");
        assert_eq!(parsed["caller"], "src/main.rs:3");
        assert!(parsed["ts"].as_str().unwrap().starts_with("2026-10-16T09:30:00.123"));
        assert_eq!(parsed["fields.msg"], "user supplied");
        assert_eq!(parsed["fields.level"], "DEBUG");
        assert_eq!(parsed["fields.ts"], "yesterday");
        assert_eq!(parsed["fields.caller"], "elsewhere");

        let console = Encoder::Console { colored: false }.encode(&entry);
        let columns: Vec<&str> = console.split('\t').collect();
        assert_eq!(columns[1], "ERROR");
        assert_eq!(columns[3], "real message");
        assert!(columns[4].contains(r#""fields.msg":"user supplied""#));
    }

    #[test]
    fn test_default_is_colored_console() {
        assert_eq!(Encoder::default(), Encoder::Console { colored: true });
    }
}

//! Journal Configuration
//!
//! Explicit directory and file layout for the journal. A `JournalConfig`
//! is built once by the caller and handed to the store; nothing here
//! touches the filesystem until `ensure_dirs` is called.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Column order for CSV exports. Matches the field order of `JournalEntry`.
pub const CSV_FIELDS: [&str; 10] = [
    "date",
    "event",
    "thought",
    "emotion_primary",
    "emotion_secondary",
    "emotion_tertiary",
    "emotion_intensity",
    "cbt_distortion",
    "reframing",
    "ai_reflection",
];

const JOURNAL_FILENAME: &str = "journal.jsonl";
const CSV_FILENAME: &str = "journal.csv";
const EXPORT_PREFIX: &str = "journal_export";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_REFLECTION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_REFLECTION_TEMPERATURE: f32 = 0.6;

/// Configuration for the journal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalConfig {
    /// Directory holding the durable log and the current CSV
    pub data_dir: PathBuf,
    /// Directory receiving timestamped snapshots
    pub export_dir: PathBuf,
    /// Feeling wheel JSON; `None` uses the bundled wheel
    pub feeling_wheel_path: Option<PathBuf>,
    /// File name of the append-only log inside `data_dir`
    pub journal_file: String,
    /// File name of the current CSV export inside `data_dir`
    pub csv_file: String,
    /// Prefix of snapshot file names
    pub export_prefix: String,
    /// Chat model used for reflections
    pub model: String,
    /// Base URL of an OpenAI-compatible API
    pub api_base_url: String,
    /// Upper bound on a single reflection call
    pub reflection_timeout_secs: u64,
    /// Sampling temperature for reflections
    pub reflection_temperature: f32,
}

impl JournalConfig {
    /// Layout rooted at `base_dir`: `base/data` and `base/exports`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base = base_dir.as_ref();
        Self {
            data_dir: base.join("data"),
            export_dir: base.join("exports"),
            feeling_wheel_path: None,
            journal_file: JOURNAL_FILENAME.to_string(),
            csv_file: CSV_FILENAME.to_string(),
            export_prefix: EXPORT_PREFIX.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            reflection_timeout_secs: DEFAULT_REFLECTION_TIMEOUT_SECS,
            reflection_temperature: DEFAULT_REFLECTION_TEMPERATURE,
        }
    }

    /// Build from process environment.
    ///
    /// Reads `CBT_JOURNAL_HOME`, `CBT_JOURNAL_FEELING_WHEEL`,
    /// `CBT_JOURNAL_MODEL` and `OPENAI_BASE_URL`. The API key is never
    /// part of the config.
    pub fn from_env() -> Self {
        let base = std::env::var("CBT_JOURNAL_HOME").unwrap_or_else(|_| ".".to_string());
        let mut config = Self::new(base);

        if let Ok(path) = std::env::var("CBT_JOURNAL_FEELING_WHEEL") {
            config = config.with_feeling_wheel(path);
        }
        if let Ok(model) = std::env::var("CBT_JOURNAL_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.api_base_url = url;
        }
        config
    }

    pub fn with_feeling_wheel(mut self, path: impl Into<PathBuf>) -> Self {
        self.feeling_wheel_path = Some(path.into());
        self
    }

    pub fn journal_path(&self) -> PathBuf {
        self.data_dir.join(&self.journal_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join(&self.csv_file)
    }

    /// Snapshot path for the given `YYYYMMDD_HHMMSS` stamp.
    pub fn snapshot_path(&self, stamp: &str) -> PathBuf {
        self.export_dir
            .join(format!("{}_{}.csv", self.export_prefix, stamp))
    }

    /// Create the data and export directories. Safe to call repeatedly.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.export_dir)?;
        Ok(())
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Local time formatted for file names, e.g. `20250825_154210`.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_layout_under_base_dir() {
        let config = JournalConfig::new("/tmp/cbt");
        assert_eq!(config.journal_path(), PathBuf::from("/tmp/cbt/data/journal.jsonl"));
        assert_eq!(config.csv_path(), PathBuf::from("/tmp/cbt/data/journal.csv"));
        assert_eq!(
            config.snapshot_path("20250825_154210"),
            PathBuf::from("/tmp/cbt/exports/journal_export_20250825_154210.csv")
        );
    }

    #[test]
    fn test_with_feeling_wheel() {
        let config = JournalConfig::new("/tmp/cbt");
        assert!(config.feeling_wheel_path.is_none());

        let config = config.with_feeling_wheel("/tmp/cbt/wheel.json");
        assert_eq!(config.feeling_wheel_path, Some(PathBuf::from("/tmp/cbt/wheel.json")));
        assert_eq!(config.reflection_temperature, 0.6);
    }

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let config = JournalConfig::new(temp_dir.path());

        config.ensure_dirs().unwrap();
        config.ensure_dirs().unwrap();

        assert!(config.data_dir.is_dir());
        assert!(config.export_dir.is_dir());
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_csv_fields_order() {
        assert_eq!(CSV_FIELDS.first(), Some(&"date"));
        assert_eq!(CSV_FIELDS.last(), Some(&"ai_reflection"));
    }
}

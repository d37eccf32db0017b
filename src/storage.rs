//! Append-only journal persistence
//!
//! Entries live in a JSONL log: one self-contained JSON object per line,
//! written with a single append of the complete line. The log is only ever
//! read as a full scan from the start, so the store keeps no cursor state.
//! Corrections go through `overwrite`, which swaps in a complete new log.
//!
//! CSV exports are derived views and can be regenerated from the log.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::config::{timestamp, JournalConfig, CSV_FIELDS};
use crate::journal::JournalEntry;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize journal entry")]
    Serialize(#[source] serde_json::Error),

    /// A line of the log is not a valid entry. Loading stops here.
    #[error("Malformed journal entry on line {line} of {path:?}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write CSV export {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No journal entry at position {index} (journal has {len})")]
    NoSuchEntry { index: usize, len: usize },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> StorageError + '_ {
    move |source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

pub struct JournalStore {
    config: JournalConfig,
}

impl JournalStore {
    pub fn new(config: JournalConfig) -> Self {
        Self { config }
    }

    /// Create the store and its directories
    pub fn open(config: JournalConfig) -> Result<Self, StorageError> {
        config
            .ensure_dirs()
            .map_err(io_err(&config.data_dir))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    pub fn journal_path(&self) -> PathBuf {
        self.config.journal_path()
    }

    /// Append one entry to the log.
    ///
    /// If the log does not end in a newline (a write torn by a crash), the
    /// entry is started on a fresh line so the fragment stays on its own.
    pub fn append(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        let path = self.journal_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let mut line = serde_json::to_string(entry).map_err(StorageError::Serialize)?;
        line.push('\n');

        let mut options = OpenOptions::new();
        options.read(true).append(true).create(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&path).map_err(io_err(&path))?;
        if !ends_with_newline(&mut file).map_err(io_err(&path))? {
            warn!("Journal {:?} ends in a partial line; starting entry on a new line", path);
            line.insert(0, '\n');
        }
        file.write_all(line.as_bytes()).map_err(io_err(&path))?;
        file.flush().map_err(io_err(&path))?;

        debug!("Appended journal entry dated {} to {:?}", entry.date, path);
        Ok(())
    }

    /// Read every entry in append order. A missing log is an empty journal.
    pub fn load_all(&self) -> Result<Vec<JournalEntry>, StorageError> {
        let path = self.journal_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path).map_err(io_err(&path))?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (idx, line) in reader.split(b'\n').enumerate() {
            let line = line.map_err(io_err(&path))?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            // Raw bytes: a record torn inside a multi-byte character is a
            // parse failure on its line, not an I/O error.
            let entry = serde_json::from_slice(&line).map_err(|source| StorageError::Parse {
                path: path.clone(),
                line: idx + 1,
                source,
            })?;
            entries.push(entry);
        }

        debug!("Loaded {} journal entries from {:?}", entries.len(), path);
        Ok(entries)
    }

    /// Replace the whole log with `entries`, in order.
    ///
    /// The new log is written beside the old one and renamed over it.
    pub fn overwrite(&self, entries: &[JournalEntry]) -> Result<(), StorageError> {
        let path = self.journal_path();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir).map_err(io_err(&dir))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err(&dir))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            for entry in entries {
                serde_json::to_writer(&mut writer, entry).map_err(StorageError::Serialize)?;
                writer.write_all(b"\n").map_err(io_err(&path))?;
            }
            writer.flush().map_err(io_err(&path))?;
        }
        tmp.as_file().sync_all().map_err(io_err(&path))?;
        tmp.persist(&path).map_err(|e| StorageError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        info!("Rewrote journal {:?} with {} entries", path, entries.len());
        Ok(())
    }

    /// Remove the entry at `index` (append order) and rewrite the log.
    pub fn remove(&self, index: usize) -> Result<JournalEntry, StorageError> {
        let mut entries = self.load_all()?;
        if index >= entries.len() {
            return Err(StorageError::NoSuchEntry {
                index,
                len: entries.len(),
            });
        }
        let removed = entries.remove(index);
        self.overwrite(&entries)?;
        Ok(removed)
    }

    /// Write `entries` as CSV to `path` with the canonical header.
    pub fn export_csv(&self, entries: &[JournalEntry], path: &Path) -> Result<(), StorageError> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_err(path))?;
        writer.write_record(CSV_FIELDS).map_err(csv_err(path))?;
        for entry in entries {
            writer.write_record(entry.to_row()).map_err(csv_err(path))?;
        }
        writer.flush().map_err(io_err(path))?;
        Ok(())
    }

    /// Export to `journal.csv` in the data directory
    pub fn export_current(&self, entries: &[JournalEntry]) -> Result<PathBuf, StorageError> {
        let path = self.config.csv_path();
        std::fs::create_dir_all(&self.config.data_dir).map_err(io_err(&self.config.data_dir))?;
        self.export_csv(entries, &path)?;
        info!("Exported {} entries to {:?}", entries.len(), path);
        Ok(path)
    }

    /// Export to a timestamped snapshot in the export directory.
    ///
    /// Two snapshots taken within the same second share a name; the later
    /// one wins.
    pub fn export_snapshot(&self, entries: &[JournalEntry]) -> Result<PathBuf, StorageError> {
        std::fs::create_dir_all(&self.config.export_dir)
            .map_err(io_err(&self.config.export_dir))?;
        let path = self.config.snapshot_path(&timestamp());
        self.export_csv(entries, &path)?;
        info!("Exported snapshot of {} entries to {:?}", entries.len(), path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &Path) -> JournalStore {
        JournalStore::open(JournalConfig::new(dir)).unwrap()
    }

    fn entry(event: &str) -> JournalEntry {
        JournalEntry::new("2025-08-25", event, "I can't handle this", "Fear")
            .with_secondary("Anxious")
            .with_intensity(4)
            .with_distortion("Catastrophizing")
            .with_reframing("I have handled hard days before")
    }

    #[test]
    fn test_missing_log_loads_empty() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_writes_one_line_per_entry() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());

        store.append(&entry("first\nwith a newline")).unwrap();
        store.append(&entry("second – ünïcödé")).unwrap();

        let raw = std::fs::read_to_string(store.journal_path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.ends_with('\n'));
        assert!(raw.contains("ünïcödé"));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());
        store.append(&entry("good")).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(store.journal_path()).unwrap();
            file.write_all(b"{\"date\": \"2025-08-25\", \"event\": \"torn\n").unwrap();
        }
        store.append(&entry("after")).unwrap();

        match store.load_all() {
            Err(StorageError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_line_torn_inside_multibyte_char_is_parse_error() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());
        store.append(&entry("good")).unwrap();

        let full = serde_json::to_string(&entry("coffee at the café")).unwrap();
        let cut = full.find('é').unwrap() + 1;
        {
            let mut file = OpenOptions::new().append(true).open(store.journal_path()).unwrap();
            file.write_all(&full.as_bytes()[..cut]).unwrap();
        }

        match store.load_all() {
            Err(StorageError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_append_after_torn_fragment_starts_new_line() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());
        store.append(&entry("before")).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(store.journal_path()).unwrap();
            file.write_all(b"{\"date\":\"2025-08-26\",\"event\":\"cut of").unwrap();
        }

        let saved = entry("saved after crash");
        store.append(&saved).unwrap();

        let raw = std::fs::read_to_string(store.journal_path()).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "{\"date\":\"2025-08-26\",\"event\":\"cut of");
        assert_eq!(serde_json::from_str::<JournalEntry>(lines[2]).unwrap(), saved);

        match store.load_all() {
            Err(StorageError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());
        store.append(&entry("one")).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(store.journal_path()).unwrap();
            file.write_all(b"\n   \n").unwrap();
        }
        store.append(&entry("two")).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].event, "two");
    }

    #[test]
    fn test_remove_rewrites_log() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());
        for e in ["a", "b", "c"] {
            store.append(&entry(e)).unwrap();
        }

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.event, "b");

        let events: Vec<String> = store.load_all().unwrap().into_iter().map(|e| e.event).collect();
        assert_eq!(events, vec!["a", "c"]);

        assert!(matches!(
            store.remove(5),
            Err(StorageError::NoSuchEntry { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_snapshot_name_pattern() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());

        let path = store.export_snapshot(&[entry("x")]).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(path.starts_with(&store.config().export_dir));
        assert!(name.starts_with("journal_export_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "journal_export_".len() + 15 + ".csv".len());
    }

    #[test]
    fn test_export_current_writes_header() {
        let temp_dir = tempdir().unwrap();
        let store = store(temp_dir.path());

        let path = store.export_current(&[]).unwrap();
        let raw = std::fs::read_to_string(path).unwrap();
        assert_eq!(raw.trim_end(), CSV_FIELDS.join(","));
    }
}

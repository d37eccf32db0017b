//! CBT Journal
//!
//! Storage and data model for a Cognitive Behavioral Therapy journal:
//! - Journal entry schema
//! - Feeling wheel (primary → secondary → tertiary emotions)
//! - Cognitive distortion catalog
//! - Append-only JSONL log with CSV snapshot export
//! - Optional AI reflection through an OpenAI-compatible API

pub mod config;
pub mod distortions;
pub mod emotions;
pub mod journal;
pub mod reflection;
pub mod storage;
pub mod telemetry;

// Re-exports for convenience
pub use config::{JournalConfig, CSV_FIELDS};
pub use emotions::{EmotionWheel, TaxonomyError};
pub use journal::JournalEntry;
pub use reflection::{Reflector, ReflectionOutcome, AI_ERROR_PREFIX};
pub use storage::{JournalStore, StorageError};

//! Emotion Wheel
//!
//! Read-only three-level feeling wheel (primary → secondary → tertiary),
//! loaded once from JSON and shared by reference afterwards. Lookups for
//! unknown names return empty results instead of errors.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::journal::JournalEntry;

const BUILTIN_WHEEL: &str = include_str!("../data/feeling_wheel.json");

/// Construction failures. Lookups never produce these.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Feeling wheel JSON not found at {}", .path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read feeling wheel at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse feeling wheel from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why an entry's emotion selection does not fit the wheel
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmotionPathError {
    #[error("Unknown primary emotion '{0}'")]
    UnknownPrimary(String),

    #[error("'{secondary}' is not a secondary emotion of '{primary}'")]
    UnknownSecondary { primary: String, secondary: String },

    #[error("Specific emotion '{0}' was chosen without a secondary emotion")]
    TertiaryWithoutSecondary(String),

    #[error("'{tertiary}' is not reachable via '{primary}' → '{secondary}'")]
    UnknownTertiary {
        primary: String,
        secondary: String,
        tertiary: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecondaryEmotion {
    #[serde(rename = "secondary_emotion")]
    pub name: String,
    #[serde(rename = "tertiary_emotions", default)]
    pub tertiaries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrimaryEmotion {
    #[serde(rename = "primary_emotion")]
    pub name: String,
    #[serde(rename = "secondary_emotions", default)]
    pub secondaries: Vec<SecondaryEmotion>,
}

/// The whole wheel, in source order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmotionWheel {
    emotions: Vec<PrimaryEmotion>,
}

impl EmotionWheel {
    /// Load a wheel from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TaxonomyError::Missing { path: path.to_path_buf() });
        }

        let json = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&json, path.display().to_string())
    }

    /// Parse a wheel from an in-memory JSON document
    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        Self::parse(json, "<memory>".to_string())
    }

    /// The wheel shipped with the crate
    pub fn builtin() -> Result<Self, TaxonomyError> {
        Self::parse(BUILTIN_WHEEL, "<builtin>".to_string())
    }

    fn parse(json: &str, origin: String) -> Result<Self, TaxonomyError> {
        let wheel: EmotionWheel =
            serde_json::from_str(json).map_err(|source| TaxonomyError::Parse {
                origin: origin.clone(),
                source,
            })?;

        debug!(
            "Loaded feeling wheel from {} ({} primary emotions)",
            origin,
            wheel.emotions.len()
        );
        Ok(wheel)
    }

    pub fn entries(&self) -> &[PrimaryEmotion] {
        &self.emotions
    }

    /// All primary emotion names
    pub fn primary_emotions(&self) -> Vec<&str> {
        self.emotions.iter().map(|p| p.name.as_str()).collect()
    }

    /// Secondary emotions under `primary`, or empty if unknown
    pub fn secondary_emotions(&self, primary: &str) -> Vec<&str> {
        self.find_primary(primary)
            .map(|p| p.secondaries.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Tertiary emotions under the pair, or empty if it does not resolve
    pub fn tertiary_emotions(&self, primary: &str, secondary: &str) -> &[String] {
        self.find_secondary(primary, secondary)
            .map(|s| s.tertiaries.as_slice())
            .unwrap_or(&[])
    }

    /// True iff `tertiary` is reachable via `primary` → `secondary`
    pub fn path_exists(&self, primary: &str, secondary: &str, tertiary: &str) -> bool {
        self.tertiary_emotions(primary, secondary)
            .iter()
            .any(|t| t == tertiary)
    }

    /// Alias for [`EmotionWheel::path_exists`]
    pub fn validate_emotion_path(&self, primary: &str, secondary: &str, tertiary: &str) -> bool {
        self.path_exists(primary, secondary, tertiary)
    }

    /// Check an entry's emotion selection against the wheel.
    pub fn validate_entry(&self, entry: &JournalEntry) -> Result<(), EmotionPathError> {
        let primary = entry.emotion_primary.as_str();
        if self.find_primary(primary).is_none() {
            return Err(EmotionPathError::UnknownPrimary(primary.to_string()));
        }

        match (entry.emotion_secondary.as_deref(), entry.emotion_tertiary.as_deref()) {
            (None, None) => Ok(()),
            (None, Some(tertiary)) => {
                Err(EmotionPathError::TertiaryWithoutSecondary(tertiary.to_string()))
            }
            (Some(secondary), tertiary) => {
                if self.find_secondary(primary, secondary).is_none() {
                    return Err(EmotionPathError::UnknownSecondary {
                        primary: primary.to_string(),
                        secondary: secondary.to_string(),
                    });
                }
                match tertiary {
                    Some(t) if !self.path_exists(primary, secondary, t) => {
                        Err(EmotionPathError::UnknownTertiary {
                            primary: primary.to_string(),
                            secondary: secondary.to_string(),
                            tertiary: t.to_string(),
                        })
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    fn find_primary(&self, primary: &str) -> Option<&PrimaryEmotion> {
        self.emotions.iter().find(|p| p.name == primary)
    }

    fn find_secondary(&self, primary: &str, secondary: &str) -> Option<&SecondaryEmotion> {
        self.find_primary(primary)?
            .secondaries
            .iter()
            .find(|s| s.name == secondary)
    }
}

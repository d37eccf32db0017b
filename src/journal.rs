//! Journal Entry types

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::reflection::ReflectionOutcome;

fn default_intensity() -> i64 {
    1
}

/// One CBT journaling event.
///
/// Field order is the canonical column order used by CSV exports
/// (see [`crate::config::CSV_FIELDS`]). Range and presence checks are the
/// caller's job; the type itself accepts any values so that whatever was
/// written to the log can always be read back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JournalEntry {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// What happened
    pub event: String,
    /// The automatic thought about the event
    pub thought: String,
    pub emotion_primary: String,
    #[serde(default)]
    pub emotion_secondary: Option<String>,
    #[serde(default)]
    pub emotion_tertiary: Option<String>,
    /// Intensity on a 1-7 scale
    #[serde(default = "default_intensity")]
    pub emotion_intensity: i64,
    /// Name from the distortion catalog
    #[serde(default)]
    pub cbt_distortion: String,
    /// Balanced alternative thought
    #[serde(default)]
    pub reframing: String,
    /// Set only after a successful reflection
    #[serde(default)]
    pub ai_reflection: Option<String>,
}

impl JournalEntry {
    /// Create a new entry with default intensity and empty optional fields
    pub fn new(
        date: impl Into<String>,
        event: impl Into<String>,
        thought: impl Into<String>,
        emotion_primary: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            event: event.into(),
            thought: thought.into(),
            emotion_primary: emotion_primary.into(),
            emotion_secondary: None,
            emotion_tertiary: None,
            emotion_intensity: default_intensity(),
            cbt_distortion: String::new(),
            reframing: String::new(),
            ai_reflection: None,
        }
    }

    /// Today's local date in `YYYY-MM-DD` form
    pub fn today() -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.emotion_secondary = non_empty(secondary.into());
        self
    }

    pub fn with_tertiary(mut self, tertiary: impl Into<String>) -> Self {
        self.emotion_tertiary = non_empty(tertiary.into());
        self
    }

    pub fn with_intensity(mut self, intensity: i64) -> Self {
        self.emotion_intensity = intensity;
        self
    }

    pub fn with_distortion(mut self, distortion: impl Into<String>) -> Self {
        self.cbt_distortion = distortion.into();
        self
    }

    pub fn with_reframing(mut self, reframing: impl Into<String>) -> Self {
        self.reframing = reframing.into();
        self
    }

    /// Attach reflection text unless it is a tagged failure or blank.
    pub fn with_reflection(mut self, text: impl Into<String>) -> Self {
        self.ai_reflection = match ReflectionOutcome::from_tagged(text) {
            ReflectionOutcome::Reflection(body) => non_empty(body.trim().to_string()),
            ReflectionOutcome::Failed(_) => None,
        };
        self
    }

    /// Names of required fields that are blank.
    ///
    /// An entry is ready to save when this is empty.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let required = [
            ("event", &self.event),
            ("thought", &self.thought),
            ("emotion_primary", &self.emotion_primary),
            ("cbt_distortion", &self.cbt_distortion),
            ("reframing", &self.reframing),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Selected emotions joined as `Primary → Secondary → Tertiary`
    pub fn emotion_path(&self) -> String {
        let mut path = self.emotion_primary.clone();
        for level in [&self.emotion_secondary, &self.emotion_tertiary]
            .into_iter()
            .flatten()
        {
            path.push_str(" → ");
            path.push_str(level);
        }
        path
    }

    /// Field values as strings in CSV column order. Absent optionals are empty.
    pub fn to_row(&self) -> [String; 10] {
        [
            self.date.clone(),
            self.event.clone(),
            self.thought.clone(),
            self.emotion_primary.clone(),
            self.emotion_secondary.clone().unwrap_or_default(),
            self.emotion_tertiary.clone().unwrap_or_default(),
            self.emotion_intensity.to_string(),
            self.cbt_distortion.clone(),
            self.reframing.clone(),
            self.ai_reflection.clone().unwrap_or_default(),
        ]
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

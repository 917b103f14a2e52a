//! Label vocabularies and the per-song label record.
//!
//! Both vocabularies carry an explicit `Unknown` sentinel. It is a valid,
//! storable value meaning "could not be determined", distinct from a
//! missing column in a dataset.

use std::fmt;

/// Literal used for the sentinel in both vocabularies.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Stored values that mark a label as missing, compared after trimming and lower-casing.
const PLACEHOLDER_VALUES: [&str; 4] = ["", "unknown", "[]", "null"];

/// Language of the song's vocals (or lack thereof).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    CN,
    JP,
    EN,
    Inst,
    Pure,
    Unknown,
}

/// Mood bucket of a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Raise,
    Ease,
    Down,
    Reflect,
    CityPop,
    Unknown,
}

/// Lower-cases and folds spaces/hyphens to underscores so that `City Pop`,
/// `city-pop` and `CITY_POP` all compare equal.
fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::CN,
        Language::JP,
        Language::EN,
        Language::Inst,
        Language::Pure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::CN => "CN",
            Language::JP => "JP",
            Language::EN => "EN",
            Language::Inst => "Inst",
            Language::Pure => "Pure",
            Language::Unknown => UNKNOWN_LABEL,
        }
    }

    /// Maps a free-form label onto the vocabulary; anything outside it is `Unknown`.
    pub fn from_label(value: &str) -> Self {
        let normalized = normalize(value);
        Self::ALL
            .into_iter()
            .find(|l| normalize(l.as_str()) == normalized)
            .unwrap_or(Language::Unknown)
    }
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Raise,
        Emotion::Ease,
        Emotion::Down,
        Emotion::Reflect,
        Emotion::CityPop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Raise => "Raise",
            Emotion::Ease => "Ease",
            Emotion::Down => "Down",
            Emotion::Reflect => "Reflect",
            Emotion::CityPop => "City_Pop",
            Emotion::Unknown => UNKNOWN_LABEL,
        }
    }

    pub fn from_label(value: &str) -> Self {
        let normalized = normalize(value);
        if normalized == "citypop" {
            return Emotion::CityPop;
        }
        Self::ALL
            .into_iter()
            .find(|e| normalize(e.as_str()) == normalized)
            .unwrap_or(Emotion::Unknown)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two labels inferred for one song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelResult {
    pub language: Language,
    pub emotion: Emotion,
}

impl LabelResult {
    pub fn new(language: Language, emotion: Emotion) -> Self {
        Self { language, emotion }
    }

    /// Both fields set to the sentinel.
    pub fn unknown() -> Self {
        Self::new(Language::Unknown, Emotion::Unknown)
    }

    pub fn is_complete(&self) -> bool {
        self.language != Language::Unknown && self.emotion != Emotion::Unknown
    }

    pub fn is_unknown(&self) -> bool {
        self.language == Language::Unknown && self.emotion == Emotion::Unknown
    }
}

impl Default for LabelResult {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Whether a stored label value must be re-inferred.
///
/// `None` stands for an absent column or cell.
pub fn needs_fix(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let v = v.trim().to_lowercase();
            PLACEHOLDER_VALUES.contains(&v.as_str())
        }
    }
}

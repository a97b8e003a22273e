//! Utterance input type.

use serde::{Deserialize, Serialize};

/// Default locale tag for utterances that carry no explicit language.
pub const DEFAULT_LANG: &str = "en-us";

/// A natural-language input to be classified.
///
/// Immutable once constructed; engines consume it read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Raw input text.
    pub text: String,

    /// Locale tag (e.g. `en-us`). Engines use this for locale-aware
    /// normalization before scoring.
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

impl Utterance {
    /// Create an utterance in the default locale.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: DEFAULT_LANG.to_string(),
        }
    }

    /// Create an utterance with an explicit locale tag.
    pub fn with_lang(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
        }
    }

    /// Returns a copy with surrounding whitespace removed from the text.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            text: self.text.trim().to_string(),
            lang: self.lang.clone(),
        }
    }
}

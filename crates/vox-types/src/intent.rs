//! Namespaced intent identifiers and per-engine scoring results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Delimiter joining the skill and intent halves of a namespaced
/// identifier. Neither half may contain it.
pub const NAMESPACE_DELIMITER: char = ':';

/// Skill name of the sentinel identifier returned when no intent and
/// no fallback clears the acceptance threshold.
const UNKNOWN_SKILL: &str = "UnknownSkill";
const UNKNOWN_INTENT: &str = "unknown";

/// Pseudo-skill prefix for fallback resolutions.
const FALLBACK_PREFIX: &str = "fallback";

/// Error for identifier halves that would break the namespacing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("intent identifier half contains '{NAMESPACE_DELIMITER}': {half:?}")]
pub struct InvalidIntentId {
    pub half: String,
}

// ── IntentId ─────────────────────────────────────────────────────────

/// A namespaced intent identifier: `skill:intent`.
///
/// Uniquely identifies one registered handler. The canonical external
/// form joins the two halves with [`NAMESPACE_DELIMITER`]; parsing
/// splits on the first occurrence, so round-tripping recovers the
/// original halves for any strings free of the delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IntentId {
    skill: String,
    name: String,
}

impl IntentId {
    /// Build an identifier from a skill name and a local intent name.
    ///
    /// # Errors
    ///
    /// Rejects halves containing the delimiter character.
    pub fn new(skill: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidIntentId> {
        let skill = skill.into();
        let name = name.into();
        for half in [&skill, &name] {
            if half.contains(NAMESPACE_DELIMITER) {
                return Err(InvalidIntentId { half: half.clone() });
            }
        }
        Ok(Self { skill, name })
    }

    /// The identifier used for a fallback resolution owned by `skill`.
    #[must_use]
    pub fn fallback(skill: &str) -> Self {
        Self {
            skill: FALLBACK_PREFIX.to_string(),
            name: skill.to_string(),
        }
    }

    /// The sentinel identifier for "no acceptable match".
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            skill: UNKNOWN_SKILL.to_string(),
            name: UNKNOWN_INTENT.to_string(),
        }
    }

    /// The owning skill half. Ex. `TimeSkill:time.ask` -> `TimeSkill`.
    #[must_use]
    pub fn skill(&self) -> &str {
        &self.skill
    }

    /// The local intent half. Ex. `TimeSkill:time.ask` -> `time.ask`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.skill, NAMESPACE_DELIMITER, self.name)
    }
}

impl FromStr for IntentId {
    type Err = InvalidIntentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(NAMESPACE_DELIMITER) {
            Some((skill, name)) => Self::new(skill, name),
            None => Err(InvalidIntentId {
                half: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for IntentId {
    type Error = InvalidIntentId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IntentId> for String {
    fn from(id: IntentId) -> Self {
        id.to_string()
    }
}

// ── IntentResult ─────────────────────────────────────────────────────

/// One engine's scored interpretation of an utterance.
///
/// Ephemeral: created per query, discarded after dispatch. Confidence
/// is domain-defined with higher meaning better and `0.0` meaning
/// "no match".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Namespaced identifier (`skill:intent`).
    #[serde(default)]
    pub name: String,

    /// Match confidence, higher is better.
    pub confidence: f64,

    /// Extracted slot values, slot name -> matched text.
    #[serde(default)]
    pub matches: HashMap<String, String>,

    /// The original utterance text the result was produced from.
    #[serde(default)]
    pub utterance: String,
}

impl IntentResult {
    /// A result with no slot matches.
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
            matches: HashMap::new(),
            utterance: String::new(),
        }
    }

    /// Attach slot matches (builder-style).
    #[must_use]
    pub fn with_matches(mut self, matches: HashMap<String, String>) -> Self {
        self.matches = matches;
        self
    }

    /// Attach the source utterance text (builder-style).
    #[must_use]
    pub fn with_utterance(mut self, utterance: impl Into<String>) -> Self {
        self.utterance = utterance.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespacing_round_trip() {
        let id = IntentId::new("TimeSkill", "time.ask").unwrap();
        assert_eq!(id.to_string(), "TimeSkill:time.ask");

        let parsed: IntentId = "TimeSkill:time.ask".parse().unwrap();
        assert_eq!(parsed.skill(), "TimeSkill");
        assert_eq!(parsed.name(), "time.ask");
        assert_eq!(parsed, id);
    }

    #[test]
    fn delimiter_rejected_in_halves() {
        assert!(IntentId::new("Time:Skill", "ask").is_err());
        assert!(IntentId::new("TimeSkill", "time:ask").is_err());
    }

    #[test]
    fn parse_requires_delimiter() {
        assert!("nodelimiter".parse::<IntentId>().is_err());
    }

    #[test]
    fn fallback_form() {
        assert_eq!(IntentId::fallback("WolframSkill").to_string(), "fallback:WolframSkill");
    }

    #[test]
    fn unknown_sentinel() {
        assert_eq!(IntentId::unknown().to_string(), "UnknownSkill:unknown");
    }

    #[test]
    fn result_deserializes_with_defaults() {
        let result: IntentResult =
            serde_json::from_str(r#"{"confidence": 0.65, "matches": {"location": "new york"}}"#)
                .unwrap();
        assert_eq!(result.confidence, 0.65);
        assert_eq!(result.matches["location"], "new york");
        assert!(result.name.is_empty());
        assert!(result.utterance.is_empty());
    }
}

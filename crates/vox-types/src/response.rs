//! Handler output shapes and the arbiter's resolution triple.

use crate::IntentResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// What a bound skill handler returns for a matched intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerOutput {
    /// Result payload for presentation. `None` is the explicit
    /// "nothing to say" signal, distinct from an empty object.
    pub results: Option<Value>,

    /// Named side actions to run before the primary response,
    /// delivered in order.
    #[serde(default)]
    pub actions: Vec<String>,
}

impl HandlerOutput {
    /// A response carrying a result payload and no actions.
    pub fn results(results: Value) -> Self {
        Self {
            results: Some(results),
            actions: Vec::new(),
        }
    }

    /// The explicit "nothing to say" response.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            results: None,
            actions: Vec::new(),
        }
    }
}

/// What a fallback handler returns for a raw utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackOutput {
    /// The skill that owns this fallback; names the resolution as
    /// `fallback:<skill>` when it wins.
    pub skill: String,

    /// The fallback's confidence that its answer applies.
    pub confidence: f64,

    /// Result payload for presentation.
    pub results: Value,

    /// Named side actions, delivered in order.
    #[serde(default)]
    pub actions: Vec<String>,
}

impl FallbackOutput {
    /// A fallback reply with no actions.
    pub fn new(skill: impl Into<String>, confidence: f64, results: Value) -> Self {
        Self {
            skill: skill.into(),
            confidence,
            results,
            actions: Vec::new(),
        }
    }
}

/// The arbiter's final `(name, results, actions)` triple.
///
/// Always structurally complete: "no acceptable match" is expressed by
/// the unknown sentinel name with empty results, never by a partial
/// value or an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Namespaced identifier of the winning intent, `fallback:<skill>`,
    /// or the unknown sentinel.
    pub name: String,

    /// Result payload; `None` means "nothing to say".
    pub results: Option<Value>,

    /// Actions to deliver before the primary response.
    pub actions: Vec<String>,
}

/// Callback bound to a registered intent. Receives the winning
/// [`IntentResult`] and produces the skill's response.
pub type IntentHandler = Arc<dyn Fn(&IntentResult) -> HandlerOutput + Send + Sync>;

/// Catch-all callback evaluated when no intent clears the acceptance
/// threshold. Receives the trimmed utterance text.
pub type FallbackHandler = Arc<dyn Fn(&str) -> FallbackOutput + Send + Sync>;

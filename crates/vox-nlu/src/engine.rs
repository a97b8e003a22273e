//! The engine capability interface.

use crate::local::MatcherRule;
use crate::EngineError;
use async_trait::async_trait;
use std::collections::HashMap;
use vox_types::{IntentId, IntentResult, Utterance};

/// Opaque registration token for one intent.
///
/// Each adapter understands only the shape meant for it and rejects
/// the other, which is what lets the manager try adapters in priority
/// order until one accepts.
#[derive(Debug, Clone)]
pub enum IntentSpec {
    /// Stem of an intent definition file (`<stem>.intent`) that the
    /// out-of-process trained-model worker consumes.
    FileStem(String),

    /// A keyword rule handed to an in-process matcher.
    Rule(MatcherRule),
}

/// Vocabulary registered with an in-process matcher.
#[derive(Debug, Clone)]
pub enum VocabEntry {
    /// A concept keyword span, optionally aliasing another concept.
    Keyword {
        start: String,
        end: String,
        alias_of: Option<String>,
    },

    /// A regex-based slot extractor.
    Regex { pattern: String },
}

/// A pluggable scoring backend.
///
/// One long-lived instance per configured backend; lifetime is the
/// process lifetime of the manager. Implementations must be safe to
/// share behind `Arc<dyn IntentEngine>` across query tasks.
#[async_trait]
pub trait IntentEngine: Send + Sync {
    /// Short diagnostic name for this engine.
    fn name(&self) -> &str;

    /// Attempt to register an intent.
    ///
    /// Returns the namespaced identifier on acceptance, `None` when
    /// this engine cannot interpret the spec (the manager then tries
    /// the next engine).
    async fn try_register_intent(&self, skill: &str, spec: &IntentSpec) -> Option<IntentId>;

    /// Register vocabulary with the underlying engine. No-op for
    /// engines that take no vocabulary.
    async fn register_vocab(&self, _vocab: VocabEntry) {}

    /// Remove the binding for one namespaced identifier.
    async fn detach_intent(&self, _id: &IntentId) {}

    /// Remove every binding whose skill half matches.
    async fn detach_skill(&self, _skill: &str) {}

    /// Called once after all skills have registered their intents.
    async fn on_intents_loaded(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Score an utterance against everything registered.
    ///
    /// Returns a mapping from namespaced identifier to result. An
    /// empty map means "no match" and is not an error.
    async fn calc_intents(
        &self,
        utterance: &Utterance,
    ) -> Result<HashMap<String, IntentResult>, EngineError>;
}

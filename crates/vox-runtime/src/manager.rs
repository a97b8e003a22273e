//! Intent registry and arbiter.
//!
//! The manager holds every engine adapter, every handler binding, and
//! every fallback, and runs the arbitration that turns an utterance
//! into a [`Resolution`].
//!
//! # Arbitration
//!
//! 1. Query every engine in priority order; merge results per
//!    identifier, an entry winning only on strictly higher confidence
//!    (ties keep the earlier engine's entry).
//! 2. If the best merged confidence exceeds the acceptance threshold,
//!    invoke that identifier's bound handler.
//! 3. Otherwise run every fallback and take the strictly best one
//!    above the threshold, or the unknown sentinel.
//!
//! An engine that fails to score (timeout, lost worker) contributes an
//! empty result set instead of aborting the pass.

use crate::ManagerError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use vox_nlu::{IntentEngine, IntentSpec};
use vox_types::{
    FallbackHandler, FallbackOutput, IntentHandler, IntentId, IntentResult, Resolution, Utterance,
};

/// Confidence a result must strictly exceed to be accepted, on both
/// the primary and fallback paths.
pub const ACCEPT_THRESHOLD: f64 = 0.5;

/// Holds all engines, all handler bindings, and all fallbacks.
///
/// Engines are tried in the order given to [`IntentManager::new`];
/// put the trained-model worker first so it gets first refusal on
/// registrations and wins merge ties.
///
/// Thread-safe via interior `RwLock`: registration is read-mostly
/// after startup but may safely interleave with queries.
pub struct IntentManager {
    engines: Vec<Arc<dyn IntentEngine>>,
    handlers: RwLock<HashMap<String, IntentHandler>>,
    fallbacks: RwLock<Vec<FallbackHandler>>,
}

impl IntentManager {
    /// Create a manager over engines in fixed priority order.
    pub fn new(engines: Vec<Arc<dyn IntentEngine>>) -> Self {
        Self {
            engines,
            handlers: RwLock::new(HashMap::new()),
            fallbacks: RwLock::new(Vec::new()),
        }
    }

    /// Register an intent via the first engine that accepts it.
    ///
    /// Earlier engines get first refusal; once one accepts, the
    /// handler is stored under the returned namespaced identifier
    /// (re-registration overwrites) and no further engine is tried.
    /// If every engine refuses the registration is dropped with a
    /// diagnostic; this is not fatal.
    pub async fn register_intent(&self, skill: &str, spec: IntentSpec, handler: IntentHandler) {
        for engine in &self.engines {
            if let Some(id) = engine.try_register_intent(skill, &spec).await {
                debug!(intent = %id, engine = engine.name(), "intent registered");
                self.handlers.write().await.insert(id.to_string(), handler);
                return;
            }
        }
        warn!(skill, ?spec, "no engine accepted intent registration");
    }

    /// Append a general-knowledge fallback. Registration order is
    /// preserved and decides ties.
    pub async fn register_fallback(&self, handler: FallbackHandler) {
        self.fallbacks.write().await.push(handler);
    }

    /// Forward the loaded hook to every engine, once, after all
    /// skills have registered.
    pub async fn on_intents_loaded(&self) {
        for engine in &self.engines {
            if let Err(e) = engine.on_intents_loaded().await {
                warn!(engine = engine.name(), error = %e, "intents-loaded hook failed");
            }
        }
    }

    /// Find the best intent for an utterance and run its handler.
    ///
    /// Always produces a structurally complete [`Resolution`]; "no
    /// acceptable match" yields the unknown sentinel, never an error.
    ///
    /// # Errors
    ///
    /// [`ManagerError::UnboundIntent`] when an engine emits an
    /// identifier that was never bound. That is a programming error
    /// and aborts this query only.
    pub async fn calc_results(&self, utterance: &Utterance) -> Result<Resolution, ManagerError> {
        let utterance = utterance.trimmed();

        let mut merged: HashMap<String, IntentResult> = HashMap::new();
        for engine in &self.engines {
            match engine.calc_intents(&utterance).await {
                Ok(results) => merge_results(&mut merged, results),
                Err(e) => {
                    warn!(engine = engine.name(), error = %e,
                          "engine failed to score; contributing no results");
                }
            }
        }

        let best = merged
            .into_values()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence));

        if let Some(best) = best {
            if best.confidence > ACCEPT_THRESHOLD {
                let handler = self.handlers.read().await.get(&best.name).cloned();
                let handler = handler.ok_or_else(|| ManagerError::UnboundIntent {
                    name: best.name.clone(),
                })?;
                let output = handler(&best);
                return Ok(Resolution {
                    name: best.name,
                    results: output.results,
                    actions: output.actions,
                });
            }
        }

        Ok(self.run_fallbacks(&utterance.text).await)
    }

    /// Evaluate every fallback, keeping the strictly best.
    async fn run_fallbacks(&self, query: &str) -> Resolution {
        let fallbacks = self.fallbacks.read().await.clone();

        let mut best: Option<FallbackOutput> = None;
        for fallback in &fallbacks {
            let output = fallback(query);
            let current = best.as_ref().map_or(0.0, |b| b.confidence);
            if output.confidence > current {
                best = Some(output);
            }
        }

        match best {
            Some(output) if output.confidence > ACCEPT_THRESHOLD => Resolution {
                name: IntentId::fallback(&output.skill).to_string(),
                results: Some(output.results),
                actions: output.actions,
            },
            _ => Resolution {
                name: IntentId::unknown().to_string(),
                results: Some(Value::Object(serde_json::Map::new())),
                actions: Vec::new(),
            },
        }
    }
}

/// Merge new results into the accumulator, an incoming entry winning
/// only on strictly higher confidence. On exact ties the entry already
/// present (from the earlier-priority engine) is kept.
fn merge_results(merged: &mut HashMap<String, IntentResult>, new: HashMap<String, IntentResult>) {
    for (name, result) in new {
        match merged.get(&name) {
            Some(existing) if existing.confidence >= result.confidence => {}
            _ => {
                merged.insert(name, result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_strictly_higher() {
        let mut merged = HashMap::new();
        merge_results(
            &mut merged,
            HashMap::from([("a:b".to_string(), IntentResult::new("a:b", 0.6))]),
        );
        merge_results(
            &mut merged,
            HashMap::from([("a:b".to_string(), IntentResult::new("a:b", 0.9))]),
        );
        assert_eq!(merged["a:b"].confidence, 0.9);

        merge_results(
            &mut merged,
            HashMap::from([("a:b".to_string(), IntentResult::new("a:b", 0.7))]),
        );
        assert_eq!(merged["a:b"].confidence, 0.9);
    }

    #[test]
    fn merge_tie_keeps_first_seen() {
        let first = IntentResult::new("a:b", 0.5).with_utterance("from first engine");
        let second = IntentResult::new("a:b", 0.5).with_utterance("from second engine");

        let mut merged = HashMap::new();
        merge_results(&mut merged, HashMap::from([("a:b".to_string(), first)]));
        merge_results(&mut merged, HashMap::from([("a:b".to_string(), second)]));
        assert_eq!(merged["a:b"].utterance, "from first engine");
    }
}

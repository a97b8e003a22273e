//! In-process engine adapter.
//!
//! Wraps a synchronous, already-loaded scoring engine behind the
//! [`Matcher`] trait. The adapter owns normalization, namespacing and
//! detach bookkeeping; the matcher owns the scoring itself and stays
//! opaque to the rest of the system.

use crate::engine::{IntentEngine, IntentSpec, VocabEntry};
use crate::normalize::normalize;
use crate::EngineError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;
use vox_types::{IntentId, IntentResult, Utterance, NAMESPACE_DELIMITER};

/// A keyword rule for an in-process matcher.
///
/// `name` is the local intent name at registration time; the adapter
/// rewrites it to the namespaced form before handing the rule to the
/// matcher, so detach-by-skill can match on the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherRule {
    /// Intent name; local before registration, namespaced inside the
    /// matcher.
    pub name: String,

    /// Concepts that must all be present.
    pub required: Vec<String>,

    /// Concepts that refine confidence when present.
    pub optional: Vec<String>,
}

impl MatcherRule {
    /// A rule with required concepts only.
    pub fn new(name: impl Into<String>, required: Vec<String>) -> Self {
        Self {
            name: name.into(),
            required,
            optional: Vec::new(),
        }
    }
}

/// The matcher's best interpretation of one utterance.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    /// Namespaced rule name the candidate matched.
    pub name: String,

    /// Confidence, higher is better, `0.0` meaning no match.
    pub confidence: f64,

    /// Extracted slot values.
    pub matches: HashMap<String, String>,
}

/// Capability interface of the underlying synchronous scoring engine.
///
/// Registration is not arbitrated here: idempotent re-registration is
/// the matcher's own concern.
pub trait Matcher: Send {
    /// Register a concept keyword span.
    fn register_entity(&mut self, start: &str, end: &str, alias_of: Option<&str>);

    /// Register a regex-based slot extractor.
    fn register_regex_entity(&mut self, pattern: &str);

    /// Install a scoring rule under its (namespaced) name.
    fn register_parser(&mut self, rule: MatcherRule);

    /// Keep only the parsers whose name satisfies the predicate.
    fn retain_parsers(&mut self, keep: &dyn Fn(&str) -> bool);

    /// Top-1 match for a normalized utterance, if any.
    fn best_match(&self, utterance: &str) -> Option<MatchCandidate>;
}

/// In-process engine adapter over an opaque [`Matcher`].
pub struct LocalEngine<M: Matcher> {
    matcher: Mutex<M>,
}

impl<M: Matcher> LocalEngine<M> {
    pub fn new(matcher: M) -> Self {
        Self {
            matcher: Mutex::new(matcher),
        }
    }
}

#[async_trait]
impl<M: Matcher> IntentEngine for LocalEngine<M> {
    fn name(&self) -> &str {
        "local"
    }

    async fn try_register_intent(&self, skill: &str, spec: &IntentSpec) -> Option<IntentId> {
        let IntentSpec::Rule(rule) = spec else {
            return None;
        };
        if rule.name.is_empty() {
            return None;
        }
        let id = IntentId::new(skill, rule.name.clone()).ok()?;

        let mut namespaced = rule.clone();
        namespaced.name = id.to_string();
        self.matcher.lock().register_parser(namespaced);
        debug!(intent = %id, "registered local intent");
        Some(id)
    }

    async fn register_vocab(&self, vocab: VocabEntry) {
        let mut matcher = self.matcher.lock();
        match vocab {
            VocabEntry::Keyword {
                start,
                end,
                alias_of,
            } => matcher.register_entity(&start, &end, alias_of.as_deref()),
            VocabEntry::Regex { pattern } => matcher.register_regex_entity(&pattern),
        }
    }

    async fn detach_intent(&self, id: &IntentId) {
        let name = id.to_string();
        self.matcher.lock().retain_parsers(&|parser| parser != name);
    }

    async fn detach_skill(&self, skill: &str) {
        let prefix = format!("{skill}{NAMESPACE_DELIMITER}");
        self.matcher
            .lock()
            .retain_parsers(&|parser| !parser.starts_with(&prefix));
    }

    async fn calc_intents(
        &self,
        utterance: &Utterance,
    ) -> Result<HashMap<String, IntentResult>, EngineError> {
        let normalized = normalize(&utterance.text, &utterance.lang);
        let candidate = self.matcher.lock().best_match(&normalized);

        let mut results = HashMap::new();
        if let Some(candidate) = candidate {
            if candidate.confidence > 0.0 {
                results.insert(
                    candidate.name.clone(),
                    IntentResult {
                        name: candidate.name,
                        confidence: candidate.confidence,
                        matches: candidate.matches,
                        utterance: utterance.text.clone(),
                    },
                );
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Matcher stub that records registrations and replays a canned
    /// top-1 candidate.
    #[derive(Default)]
    struct StubMatcher {
        parsers: Vec<MatcherRule>,
        entities: Vec<(String, String)>,
        regexes: Vec<String>,
        candidate: Option<MatchCandidate>,
        last_query: std::sync::Arc<Mutex<String>>,
    }

    impl Matcher for StubMatcher {
        fn register_entity(&mut self, start: &str, end: &str, _alias_of: Option<&str>) {
            self.entities.push((start.into(), end.into()));
        }

        fn register_regex_entity(&mut self, pattern: &str) {
            self.regexes.push(pattern.into());
        }

        fn register_parser(&mut self, rule: MatcherRule) {
            self.parsers.push(rule);
        }

        fn retain_parsers(&mut self, keep: &dyn Fn(&str) -> bool) {
            self.parsers.retain(|p| keep(&p.name));
        }

        fn best_match(&self, utterance: &str) -> Option<MatchCandidate> {
            *self.last_query.lock() = utterance.to_string();
            self.candidate.clone()
        }
    }

    fn rule(name: &str) -> IntentSpec {
        IntentSpec::Rule(MatcherRule::new(name, vec!["TimeKeyword".into()]))
    }

    #[tokio::test]
    async fn registration_namespaces_the_rule() {
        let engine = LocalEngine::new(StubMatcher::default());
        let id = engine
            .try_register_intent("TimeSkill", &rule("time.ask"))
            .await
            .unwrap();
        assert_eq!(id.to_string(), "TimeSkill:time.ask");
        assert_eq!(engine.matcher.lock().parsers[0].name, "TimeSkill:time.ask");
    }

    #[tokio::test]
    async fn rejects_foreign_spec_shape() {
        let engine = LocalEngine::new(StubMatcher::default());
        let spec = IntentSpec::FileStem("time.ask".into());
        assert!(engine.try_register_intent("TimeSkill", &spec).await.is_none());
    }

    #[tokio::test]
    async fn rejects_delimiter_in_rule_name() {
        let engine = LocalEngine::new(StubMatcher::default());
        assert!(engine
            .try_register_intent("TimeSkill", &rule("time:ask"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn scoring_normalizes_but_reports_original_text() {
        let last_query = std::sync::Arc::new(Mutex::new(String::new()));
        let matcher = StubMatcher {
            candidate: Some(MatchCandidate {
                name: "TimeSkill:time.ask".into(),
                confidence: 0.82,
                matches: HashMap::new(),
            }),
            last_query: std::sync::Arc::clone(&last_query),
            ..StubMatcher::default()
        };
        let engine = LocalEngine::new(matcher);

        let results = engine
            .calc_intents(&Utterance::new("What's the time"))
            .await
            .unwrap();

        // Matcher saw the normalized form; the result keeps the original.
        assert_eq!(*last_query.lock(), "what is the time");
        let result = &results["TimeSkill:time.ask"];
        assert_eq!(result.utterance, "What's the time");
        assert_eq!(result.confidence, 0.82);
    }

    #[tokio::test]
    async fn zero_confidence_candidate_is_no_match() {
        let matcher = StubMatcher {
            candidate: Some(MatchCandidate {
                name: "TimeSkill:time.ask".into(),
                confidence: 0.0,
                matches: HashMap::new(),
            }),
            ..StubMatcher::default()
        };
        let engine = LocalEngine::new(matcher);
        let results = engine.calc_intents(&Utterance::new("hm")).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn detach_intent_and_skill() {
        let engine = LocalEngine::new(StubMatcher::default());
        engine.try_register_intent("TimeSkill", &rule("time.ask")).await.unwrap();
        engine.try_register_intent("TimeSkill", &rule("time.set")).await.unwrap();
        engine.try_register_intent("WeatherSkill", &rule("weather.ask")).await.unwrap();

        let id: IntentId = "TimeSkill:time.ask".parse().unwrap();
        engine.detach_intent(&id).await;
        assert_eq!(engine.matcher.lock().parsers.len(), 2);

        engine.detach_skill("TimeSkill").await;
        let parsers = &engine.matcher.lock().parsers;
        assert_eq!(parsers.len(), 1);
        assert_eq!(parsers[0].name, "WeatherSkill:weather.ask");
    }

    #[tokio::test]
    async fn vocab_forwards_to_matcher() {
        let engine = LocalEngine::new(StubMatcher::default());
        engine
            .register_vocab(VocabEntry::Keyword {
                start: "TimeKeyword".into(),
                end: "time".into(),
                alias_of: None,
            })
            .await;
        engine
            .register_vocab(VocabEntry::Regex {
                pattern: "in (?P<location>.+)".into(),
            })
            .await;

        let matcher = engine.matcher.lock();
        assert_eq!(matcher.entities.len(), 1);
        assert_eq!(matcher.regexes.len(), 1);
    }
}

//! Compiled-in skill registration.
//!
//! Skills are independently-authored handler modules bound through an
//! explicit table: each implements [`Skill`] and is listed at startup.
//! There is no directory scanning and no runtime code loading; the
//! registry is the table passed to [`load_skills`].

use crate::manager::IntentManager;
use async_trait::async_trait;
use tracing::info;
use vox_types::{FallbackHandler, IntentHandler};
use vox_nlu::IntentSpec;

/// Registration surface handed to each skill, pre-bound to the
/// skill's own name.
pub struct SkillRegistrar<'a> {
    manager: &'a IntentManager,
    skill: &'a str,
}

impl SkillRegistrar<'_> {
    /// Register an intent under this skill's namespace.
    pub async fn intent(&mut self, spec: IntentSpec, handler: IntentHandler) {
        self.manager.register_intent(self.skill, spec, handler).await;
    }

    /// Register a general-knowledge fallback.
    pub async fn fallback(&mut self, handler: FallbackHandler) {
        self.manager.register_fallback(handler).await;
    }
}

/// One independently-authored handler module.
#[async_trait]
pub trait Skill: Send + Sync {
    /// The skill's name; the first half of its namespaced intents.
    fn name(&self) -> &str;

    /// Register all of the skill's intents and fallbacks.
    async fn register(&self, registrar: &mut SkillRegistrar<'_>);
}

/// Drive every skill's registration, then fire the loaded hook so
/// engines can compile their models.
pub async fn load_skills(manager: &IntentManager, skills: &[Box<dyn Skill>]) {
    for skill in skills {
        info!(skill = skill.name(), "loading skill");
        let mut registrar = SkillRegistrar {
            manager,
            skill: skill.name(),
        };
        skill.register(&mut registrar).await;
    }
    manager.on_intents_loaded().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use vox_types::{HandlerOutput, IntentId, IntentResult, Utterance};

    /// Engine stub that accepts every registration and matches the
    /// last one at high confidence.
    #[derive(Default)]
    struct AcceptAll {
        loaded: Arc<AtomicBool>,
        registered: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl vox_nlu::IntentEngine for AcceptAll {
        fn name(&self) -> &str {
            "stub"
        }

        async fn try_register_intent(
            &self,
            skill: &str,
            spec: &IntentSpec,
        ) -> Option<IntentId> {
            let IntentSpec::FileStem(stem) = spec else {
                return None;
            };
            let id = IntentId::new(skill, stem.clone()).ok()?;
            self.registered.lock().unwrap().push(id.to_string());
            Some(id)
        }

        async fn on_intents_loaded(&self) -> Result<(), vox_nlu::EngineError> {
            self.loaded.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn calc_intents(
            &self,
            _utterance: &Utterance,
        ) -> Result<HashMap<String, IntentResult>, vox_nlu::EngineError> {
            let last = self.registered.lock().unwrap().last().cloned();
            Ok(last
                .map(|name| {
                    (name.clone(), IntentResult::new(name, 0.9))
                })
                .into_iter()
                .collect())
        }
    }

    struct TimeSkill;

    #[async_trait]
    impl Skill for TimeSkill {
        fn name(&self) -> &str {
            "TimeSkill"
        }

        async fn register(&self, registrar: &mut SkillRegistrar<'_>) {
            registrar
                .intent(
                    IntentSpec::FileStem("time.ask".into()),
                    Arc::new(|_: &IntentResult| {
                        HandlerOutput::results(json!({"time": "3:00 PM"}))
                    }),
                )
                .await;
        }
    }

    #[tokio::test]
    async fn skills_register_under_their_own_namespace() {
        let engine = Arc::new(AcceptAll::default());
        let loaded = Arc::clone(&engine.loaded);
        let manager = IntentManager::new(vec![engine]);

        load_skills(&manager, &[Box::new(TimeSkill)]).await;

        // Registration landed namespaced, and the loaded hook fired.
        assert!(loaded.load(Ordering::SeqCst));
        let resolution = manager
            .calc_results(&Utterance::new("what time is it"))
            .await
            .unwrap();
        assert_eq!(resolution.name, "TimeSkill:time.ask");
        assert_eq!(resolution.results, Some(json!({"time": "3:00 PM"})));
    }
}

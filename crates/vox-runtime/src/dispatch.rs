//! Query dispatcher.
//!
//! Decouples arbitration latency from the caller: every submitted
//! query runs on its own task, and the outcome is delivered to every
//! registered observer.
//!
//! # Ordering
//!
//! For a single query, observers see zero-or-more action
//! notifications in the action list's order, then exactly one primary
//! notification (a payload, or `None` for "nothing to say"). Across
//! concurrently submitted queries no ordering is guaranteed; callers
//! needing strict ordering must serialize submission.

use crate::manager::IntentManager;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vox_types::{Resolution, Utterance, DEFAULT_LANG};

/// One formatted notification delivered to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePayload {
    /// Namespaced intent name, fallback name, or action name.
    pub name: String,

    /// Result data for presentation; an empty object for actions.
    pub data: Value,
}

/// Observer callback. `None` is the explicit "nothing to say" signal.
pub type ResponseObserver = Arc<dyn Fn(Option<&ResponsePayload>) + Send + Sync>;

/// Launches queries on background tasks and fans responses out to
/// observers.
pub struct QueryDispatcher {
    manager: Arc<IntentManager>,
    observers: Arc<RwLock<Vec<ResponseObserver>>>,
    /// Handles of in-flight query tasks, joined on shutdown so the
    /// process does not exit with queries still resolving.
    tasks: Mutex<Vec<JoinHandle<()>>>,
    lang: String,
}

impl QueryDispatcher {
    pub fn new(manager: Arc<IntentManager>) -> Self {
        Self::with_lang(manager, DEFAULT_LANG)
    }

    pub fn with_lang(manager: Arc<IntentManager>, lang: impl Into<String>) -> Self {
        Self {
            manager,
            observers: Arc::new(RwLock::new(Vec::new())),
            tasks: Mutex::new(Vec::new()),
            lang: lang.into(),
        }
    }

    /// Register an observer. Observers are never unregistered; the
    /// set grows for the process lifetime.
    pub async fn on_response(&self, observer: ResponseObserver) {
        self.observers.write().await.push(observer);
    }

    /// Start resolving a query on a new task and return immediately.
    pub async fn submit(&self, text: impl Into<String>) {
        let text = text.into();
        let query_id = uuid::Uuid::new_v4();
        let manager = Arc::clone(&self.manager);
        let observers = Arc::clone(&self.observers);
        let lang = self.lang.clone();

        let handle = tokio::spawn(async move {
            debug!(%query_id, "resolving query");
            let utterance = Utterance::with_lang(text, lang);
            match manager.calc_results(&utterance).await {
                Ok(resolution) => {
                    debug!(%query_id, name = %resolution.name, "query resolved");
                    deliver(&observers, resolution).await;
                }
                Err(e) => warn!(%query_id, error = %e, "query aborted"),
            }
        });
        self.tasks.lock().await.push(handle);
    }

    /// Await every query submitted so far.
    pub async fn join_all(&self) {
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "query task panicked");
            }
        }
    }
}

/// Notify every observer: each action in order, then the primary
/// response (or `None` when there is nothing to say).
async fn deliver(observers: &RwLock<Vec<ResponseObserver>>, resolution: Resolution) {
    let observers = observers.read().await.clone();

    for action in &resolution.actions {
        let payload = ResponsePayload {
            name: action.clone(),
            data: Value::Object(serde_json::Map::new()),
        };
        for observer in &observers {
            observer(Some(&payload));
        }
    }

    match resolution.results {
        None => {
            for observer in &observers {
                observer(None);
            }
        }
        Some(data) => {
            let payload = ResponsePayload {
                name: resolution.name,
                data,
            };
            for observer in &observers {
                observer(Some(&payload));
            }
        }
    }
}

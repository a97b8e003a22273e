//! VOX runtime: registry, arbiter, dispatcher, and their plumbing.
//!
//! # Architecture
//!
//! ```text
//!  client front end
//!        │ submit(text)                  on_response(observer)
//!        ▼                                        ▲
//! ┌──────────────────┐    spawned task    ┌───────┴────────┐
//! │ QueryDispatcher  ├───────────────────►│   observers    │
//! └────────┬─────────┘                    └────────────────┘
//!          │ calc_results
//!          ▼
//! ┌──────────────────┐  calc_intents   ┌──────────────────┐
//! │  IntentManager   ├────────────────►│  IntentEngine(s) │
//! │  (registry +     │                 │  worker / local  │
//! │   arbiter)       │                 └──────────────────┘
//! └──────────────────┘
//! ```
//!
//! The manager is the only component that knows about all engines and
//! all handler bindings. The dispatcher decouples arbitration latency
//! from the caller: each submitted query runs on its own task and the
//! outcome is delivered to every registered observer.

pub mod config;
mod dispatch;
mod error;
mod manager;
mod paths;
mod skill;
mod wake;

pub use config::{ConfigError, PathsSection, TimeoutsConfig, VoxConfig, WorkerSection};
pub use dispatch::{QueryDispatcher, ResponseObserver, ResponsePayload};
pub use error::ManagerError;
pub use manager::{IntentManager, ACCEPT_THRESHOLD};
pub use paths::Paths;
pub use skill::{load_skills, Skill, SkillRegistrar};
pub use wake::WakeListener;

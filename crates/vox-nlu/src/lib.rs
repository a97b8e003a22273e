//! NLU engine adapters for VOX.
//!
//! An engine adapter wraps one natural-language-understanding backend
//! behind the common [`IntentEngine`] capability interface so the
//! manager can treat heterogeneous backends uniformly:
//!
//! ```text
//!                    IntentManager (vox-runtime)
//!                          │ calc_intents
//!           ┌──────────────┴──────────────┐
//!           ▼                             ▼
//!   ┌───────────────┐            ┌────────────────┐
//!   │ WorkerEngine  │            │  LocalEngine   │
//!   │ (out-of-proc) │            │  (in-process)  │
//!   ├───────────────┤            ├────────────────┤
//!   │ child process │            │ opaque Matcher │
//!   │ framed RPC    │            │ behind a trait │
//!   └───────────────┘            └────────────────┘
//! ```
//!
//! The matching algorithms themselves are opaque: [`LocalEngine`]
//! scores through whatever [`Matcher`] it is given, and
//! [`WorkerEngine`] delegates to a supervised external process over
//! the `vox-wire` framing.

mod engine;
mod error;
mod local;
mod normalize;
mod worker;

pub use engine::{IntentEngine, IntentSpec, VocabEntry};
pub use error::EngineError;
pub use local::{LocalEngine, MatchCandidate, Matcher, MatcherRule};
pub use normalize::normalize;
pub use worker::{
    BuildStep, ProcessLauncher, WorkerConfig, WorkerEngine, WorkerHandle, WorkerLauncher,
};

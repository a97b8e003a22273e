//! Core types for the VOX intent resolution runtime.
//!
//! This crate provides the foundational domain types shared by every
//! layer of the VOX (Voice Orchestration eXecutive) architecture.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SDK Layer                               │
//! │  (Stable, minimal dependencies)                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vox-types    : Utterance, IntentId, IntentResult  ◄── HERE  │
//! │  vox-wire     : length-prefixed framing, wire messages       │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vox-nlu      : IntentEngine trait, adapters                 │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Runtime Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vox-runtime  : manager, dispatcher, config, skills          │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Frontend Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vox-cli      : text client binary                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Domain Flow
//!
//! An [`Utterance`] enters the runtime, every engine scores it into
//! [`IntentResult`]s keyed by namespaced [`IntentId`], the arbiter
//! picks a winner and invokes the bound handler, and the outcome is
//! delivered as a [`Resolution`].

mod case;
mod intent;
mod response;
mod utterance;

pub use case::{to_camel, to_snake};
pub use intent::{IntentId, IntentResult, InvalidIntentId, NAMESPACE_DELIMITER};
pub use response::{
    FallbackHandler, FallbackOutput, HandlerOutput, IntentHandler, Resolution,
};
pub use utterance::{Utterance, DEFAULT_LANG};

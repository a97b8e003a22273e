//! Length-prefixed message transport for VOX local RPC.
//!
//! Every message on a VOX control channel is framed the same way:
//!
//! ```text
//! ┌──────────────┬──────────────────────────────┐
//! │ 4-byte ASCII │  exactly <len> bytes of       │
//! │ decimal len  │  UTF-8 JSON body              │
//! └──────────────┴──────────────────────────────┘
//! ```
//!
//! The framing is shared by two collaborators:
//!
//! - the out-of-process NLU worker's control channel
//!   ([`WorkerRequest`] verbs, JSON replies), and
//! - the wake-word notifier ([`WakeMessage`] bodies).
//!
//! There is no implicit message size limit beyond what the 4-byte
//! header can encode; callers wanting more must widen the header.

mod error;
mod frame;
mod message;

pub use error::WireError;
pub use frame::{read_frame, read_message, write_frame, write_message, HEADER_LEN, MAX_BODY_LEN};
pub use message::{WakeDetection, WakeMessage, WorkerRequest};

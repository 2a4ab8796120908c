//! # Skillet Core
//!
//! Data model and response state machine for the Skillet voice-skill
//! framework.
//!
//! This crate provides everything one dispatch accumulates and reads,
//! independent of the dispatch engine itself:
//!
//! - **Envelope model**: the inbound request shape ([`Envelope`],
//!   [`RequestKind`], [`Intent`], [`Session`])
//! - **Event classification**: envelope → canonical event name
//!   ([`event::event_name`])
//! - **Response object**: the mutable builder with its terminal state
//!   machine ([`Reply`], [`Status`])
//! - **Output descriptors**: speech, markup and cards ([`Speech`],
//!   [`ssml::Tag`], [`Card`])
//! - **Diagnostics**: the injected misuse-report sink ([`DiagnosticSink`])
//!
//! The dispatch engine lives in the `skillet` crate:
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌─────────┐
//! │ Envelope │────▶│   Skill   │────▶│ handler │
//! │  (JSON)  │     │ (skillet) │────▶│ handler │──▶ Reply ──▶ JSON
//! └──────────┘     └───────────┘     └─────────┘
//! ```

pub mod card;
pub mod diagnostics;
pub mod envelope;
pub mod error;
pub mod event;
pub mod intents;
pub mod reply;
pub mod speech;
pub mod ssml;

pub use card::{Card, CardImage};
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use envelope::{Application, Envelope, Intent, RequestKind, Session, Slot, User};
pub use error::{DispatchError, HandlerError};
pub use reply::{Reply, Status};
pub use speech::{IntoSpeech, Speech, SpeechKind};

//! # Skillet
//!
//! A middleware-style dispatch engine for single-shot voice-skill
//! requests, in the spirit of HTTP middleware chains: one inbound event
//! envelope, one ordered walk over registered middleware and event-scoped
//! handlers, one terminal response.
//!
//! ## Dispatch flow
//!
//! ```text
//! Envelope ──classify──▶ Reply ──▶ middleware ──▶ on("launch") ──▶ …
//!                                       │
//!                                  Err settlement
//!                                       ▼
//!                                 recover / on_error ──▶ Completion
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use skillet::{Reply, Skill, event, middleware::verify_application};
//!
//! let mut skill = Skill::new();
//! skill
//!     .use_middleware(verify_application("amzn1.ask.skill.1234"))
//!     .on(event::LAUNCH, |reply: Reply| async move {
//!         reply
//!             .say("Welcome to horoscopes. Which sign?")
//!             .reprompt("Which zodiac sign would you like?")
//!             .send();
//!         Ok(())
//!     })
//!     .on("GetZodiacHoroscopeIntent", |reply: Reply| async move {
//!         let sign = reply.slot("ZodiacSign").unwrap_or_default();
//!         reply.say(format!("A fine day for {sign}.")).end();
//!         Ok(())
//!     });
//!
//! let completion = skill.handle(envelope).await;
//! let body = completion.reply.to_value()?;
//! ```
//!
//! Each dispatch is fully independent; a `Skill` is immutable while
//! handling and shares nothing between dispatches beyond what the
//! application deliberately captures in its handlers.

pub mod handler;
pub mod logging;
pub mod middleware;
pub mod settle;
pub mod skill;

mod stack;

pub use handler::{BoxedErrorHandler, BoxedHandler, ErrorHandler, Handler, HandlerResult};
pub use skill::{Completion, Skill};

pub use skillet_core::{
    Card, CardImage, Diagnostic, DiagnosticSink, DispatchError, Envelope, HandlerError,
    IntoSpeech, Reply, RequestKind, Speech, SpeechKind, Status, TracingSink, event, intents,
    ssml,
};

//! The skill dispatcher.
//!
//! A [`Skill`] owns an ordered stack of middleware and event-scoped
//! handlers and drives one dispatch per inbound envelope. Traversal
//! semantics:
//!
//! 1. The envelope is classified and a [`Reply`] is built around it.
//! 2. Entries run strictly in registration order. While no error is in
//!    flight, middleware and matching event handlers run and error entries
//!    are skipped; once an entry settles with an error, only error entries
//!    run until one of them consumes the error. Skipped entries preserve
//!    the current mode.
//! 3. Nothing runs after the reply's terminal transition.
//! 4. A stack exhausted with an error in flight falls back to the
//!    [`on_error`](Skill::on_error) handler, then to failing the reply;
//!    exhausted with no error and nothing sent, the dispatch fails with
//!    [`DispatchError::Unhandled`].
//!
//! ```rust,ignore
//! let mut skill = Skill::new();
//! skill
//!     .use_middleware(verify_application("amzn1.ask.skill.1234"))
//!     .on(event::LAUNCH, |reply: Reply| async move {
//!         reply.say("Welcome to horoscopes.").send();
//!         Ok(())
//!     })
//!     .on_error(|err, reply| async move {
//!         reply.say("Something went wrong.").end();
//!         Ok(())
//!     });
//!
//! let completion = skill.handle(envelope).await;
//! let body = completion.reply.to_value()?;
//! ```

use std::sync::Arc;

use tracing::{Instrument, Level, debug, span, trace};

use skillet_core::{
    DiagnosticSink, DispatchError, Envelope, HandlerError, Reply, TracingSink,
};

use crate::handler::{ErrorHandler, Handler, HandlerResult};
use crate::settle::settle;
use crate::stack::StackEntry;

/// The outcome of one dispatch.
///
/// The Rust rendering of the `(error | null, response)` completion
/// callback: the reply is always available, the error only when the
/// dispatch failed. Awaiting [`Skill::handle`] delivers this exactly once.
#[derive(Debug)]
#[must_use]
pub struct Completion {
    /// The response object of the dispatch, terminal by now.
    pub reply: Reply,

    /// The failure error, `None` when the dispatch finished normally.
    pub error: Option<HandlerError>,
}

impl Completion {
    /// Whether the dispatch finished without a failure.
    pub fn finished(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a `Result`, pairing the error with the reply on
    /// failure so callers can still serialize a response body.
    pub fn into_result(self) -> Result<Reply, (HandlerError, Reply)> {
        match self.error {
            None => Ok(self.reply),
            Some(error) => Err((error, self.reply)),
        }
    }
}

/// An ordered middleware/handler stack for one voice skill.
///
/// Registration is append-only; entries execute in exact registration
/// order, with event-scoped handlers interleaved at the position they were
/// registered. A `Skill` is immutable during dispatch and can serve any
/// number of independent dispatches.
#[derive(Clone)]
pub struct Skill {
    stack: Vec<StackEntry>,
    fallback: Option<Arc<dyn ErrorHandler>>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for Skill {
    fn default() -> Self {
        Self::new()
    }
}

impl Skill {
    /// Creates an empty skill with the default tracing diagnostics sink.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            fallback: None,
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Replaces the diagnostics sink.
    ///
    /// Misuse reports from every subsequent dispatch of this skill, and
    /// from the replies it creates, go to this sink.
    pub fn with_diagnostics(&mut self, sink: impl DiagnosticSink + 'static) -> &mut Self {
        self.diagnostics = Arc::new(sink);
        self
    }

    /// Appends unconditional middleware, invoked for every dispatch.
    pub fn use_middleware<H>(&mut self, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        debug!("adding middleware");
        self.stack.push(StackEntry::Middleware(Arc::new(handler)));
        self
    }

    /// Appends a handler scoped to one event name.
    ///
    /// The handler runs only for dispatches whose classified event name
    /// matches `event`; otherwise the entry passes through without side
    /// effects.
    ///
    /// # Panics
    ///
    /// Panics if `event` is empty — registration defects surface at
    /// registration time, never inside a dispatch.
    pub fn on<H>(&mut self, event: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        let event = event.into();
        assert!(!event.is_empty(), "expected a non-empty event name");
        debug!(event = %event, "adding event handler");
        self.stack.push(StackEntry::Event {
            name: event,
            handler: Arc::new(handler),
        });
        self
    }

    /// Appends an error-mode entry at the current stack position.
    ///
    /// It runs only while an error is in flight, taking ownership of the
    /// error. In-stack error entries take precedence, in registration
    /// order, over the [`on_error`](Skill::on_error) fallback.
    pub fn recover<H>(&mut self, handler: H) -> &mut Self
    where
        H: ErrorHandler + 'static,
    {
        debug!("adding error-mode entry");
        self.stack.push(StackEntry::Error(Arc::new(handler)));
        self
    }

    /// Designates the application-wide fallback error handler, reached when
    /// no in-stack error entry consumed the error.
    pub fn on_error<H>(&mut self, handler: H) -> &mut Self
    where
        H: ErrorHandler + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Returns the number of registered stack entries.
    pub fn entry_count(&self) -> usize {
        self.stack.len()
    }

    /// Runs one dispatch.
    ///
    /// Builds a [`Reply`] around the envelope, walks the stack, and
    /// resolves to the [`Completion`] exactly once. Handler failures never
    /// escape as panics or errors from this future; they arrive in
    /// [`Completion::error`].
    pub async fn handle(&self, envelope: Envelope) -> Completion {
        let reply = Reply::new(envelope, Arc::clone(&self.diagnostics));
        let dispatch_span = span!(Level::DEBUG, "dispatch", event = %reply.event_name());

        self.run(&reply).instrument(dispatch_span).await;

        let error = reply.take_error();
        Completion { reply, error }
    }

    async fn run(&self, reply: &Reply) {
        let mut in_flight: Option<HandlerError> = None;

        for entry in &self.stack {
            if reply.sent() {
                break;
            }

            match entry {
                StackEntry::Middleware(handler) => {
                    if in_flight.is_some() {
                        trace!(entry = entry.describe(), "skipping, error in flight");
                        continue;
                    }
                    debug!(entry = entry.describe(), "executing");
                    let settlement = settle(handler.call(reply.clone())).await;
                    apply_settlement(reply, settlement, &mut in_flight);
                }
                StackEntry::Event { name, handler } => {
                    if in_flight.is_some() {
                        trace!(entry = entry.describe(), "skipping, error in flight");
                        continue;
                    }
                    if name != reply.event_name() {
                        trace!(entry = entry.describe(), "skipping, event does not match");
                        continue;
                    }
                    debug!(entry = entry.describe(), "executing");
                    let settlement = settle(handler.call(reply.clone())).await;
                    apply_settlement(reply, settlement, &mut in_flight);
                }
                StackEntry::Error(handler) => {
                    let Some(error) = in_flight.take() else {
                        trace!(entry = entry.describe(), "skipping, no error in flight");
                        continue;
                    };
                    debug!(entry = entry.describe(), "executing");
                    let settlement = settle(handler.call(error, reply.clone())).await;
                    apply_settlement(reply, settlement, &mut in_flight);
                }
            }
        }

        if reply.sent() {
            if in_flight.is_some() {
                // Terminal transition already fired, the error has nowhere
                // to be routed.
                reply.report_stray_error();
            }
            return;
        }

        match in_flight.take() {
            Some(error) => self.exhausted_with_error(reply, error).await,
            None => {
                debug!("stack exhausted with nothing sent");
                reply.fail(DispatchError::Unhandled {
                    event: reply.event_name().to_owned(),
                });
            }
        }
    }

    async fn exhausted_with_error(&self, reply: &Reply, error: HandlerError) {
        let Some(fallback) = &self.fallback else {
            reply.report_unhandled_error();
            reply.fail(error);
            return;
        };

        debug!("executing fallback error handler");
        let settlement = settle(fallback.call(error, reply.clone())).await;
        match settlement {
            Ok(()) if reply.sent() => {}
            // Consumed the error but never completed the reply: the
            // dispatch still ends, as an unhandled event.
            Ok(()) => reply.fail(DispatchError::Unhandled {
                event: reply.event_name().to_owned(),
            }),
            Err(_) if reply.sent() => reply.report_stray_error(),
            Err(next_error) => reply.fail(next_error),
        }
    }
}

fn apply_settlement(
    reply: &Reply,
    settlement: HandlerResult,
    in_flight: &mut Option<HandlerError>,
) {
    if let Err(error) = settlement {
        if reply.sent() {
            reply.report_stray_error();
        } else {
            debug!(error = %error, "entry settled with an error");
            *in_flight = Some(error);
        }
    }
}

impl std::fmt::Debug for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill")
            .field("entries", &self.stack)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn launch_envelope() -> Envelope {
        Envelope::from_value(json!({
            "version": "1.0",
            "request": { "type": "LaunchRequest" }
        }))
        .unwrap()
    }

    #[test]
    fn registrations_append_in_order() {
        let mut skill = Skill::new();
        skill
            .use_middleware(|reply: Reply| async move {
                reply.send();
                Ok(())
            })
            .on("launch", |reply: Reply| async move {
                reply.send();
                Ok(())
            })
            .recover(|error: HandlerError, _reply: Reply| async move { Err(error) });
        assert_eq!(skill.entry_count(), 3);
    }

    #[test]
    #[should_panic(expected = "non-empty event name")]
    fn empty_event_names_are_rejected_at_registration() {
        let mut skill = Skill::new();
        skill.on("", |reply: Reply| async move {
            reply.send();
            Ok(())
        });
    }

    #[tokio::test]
    async fn empty_stack_fails_with_unhandled() {
        let skill = Skill::new();
        let completion = skill.handle(launch_envelope()).await;
        assert!(!completion.finished());
        assert!(matches!(
            completion.error.unwrap().downcast_ref::<DispatchError>(),
            Some(DispatchError::Unhandled { event }) if event == "launch"
        ));
    }
}

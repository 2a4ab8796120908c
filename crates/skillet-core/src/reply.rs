//! The response object for one dispatch.
//!
//! A [`Reply`] is created around the inbound [`Envelope`] at the start of a
//! dispatch and accumulates the outbound response — speech, card, reprompt,
//! end-of-session — until a terminal transition fires. It is a cheaply
//! clonable shared handle (every stack entry receives a clone of the same
//! underlying object), with the mutable accumulation state behind a
//! `parking_lot::Mutex`.
//!
//! # Lifecycle
//!
//! The lifecycle is an explicit state machine:
//!
//! ```text
//! Pending ──send()/end()──▶ Finished
//!    └──────fail(err)─────▶ Failed
//! ```
//!
//! The transition is one-way and fires exactly once. A second terminal
//! call, or any mutator called after the transition, changes nothing and
//! reports the misuse through the injected [`DiagnosticSink`].
//!
//! # Example
//!
//! ```rust,ignore
//! skill.on("GetZodiacHoroscopeIntent", |reply: Reply| async move {
//!     let sign = reply.slot("ZodiacSign").unwrap_or_default();
//!     reply.say(format!("Today is a great day, {sign}.")).end();
//!     Ok(())
//! });
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::ser::Serialize;
use serde_json::{Map, Value};

use crate::card::Card;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::envelope::{Envelope, User};
use crate::error::HandlerError;
use crate::event::event_name;
use crate::speech::{IntoSpeech, Speech, SpeechKind};

/// Lifecycle state of a [`Reply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The dispatch is still running; mutators are live.
    Pending,
    /// The response was sent normally.
    Finished,
    /// The dispatch failed; the error travels with the outcome.
    Failed,
}

/// Marker returned when a terminal transition is attempted twice.
struct AlreadyComplete;

/// The shared, mutable response object for one dispatch.
///
/// Cloning is cheap and every clone refers to the same underlying state.
/// A `Reply` belongs exclusively to the dispatch that created it and is
/// never reused across dispatches.
#[derive(Clone)]
pub struct Reply {
    inner: Arc<ReplyInner>,
}

struct ReplyInner {
    envelope: Envelope,
    event_name: String,
    is_new: bool,
    user: Option<User>,
    slots: HashMap<String, String>,
    diagnostics: Arc<dyn DiagnosticSink>,
    state: Mutex<ReplyState>,
}

struct ReplyState {
    attributes: Map<String, Value>,
    speech: Option<Speech>,
    card: Option<Card>,
    reprompt: Option<Speech>,
    end_session: bool,
    status: Status,
    error: Option<HandlerError>,
}

impl ReplyState {
    /// The one-way terminal transition.
    ///
    /// Rejects a second attempt so completion can never fire twice.
    fn transition(&mut self, next: Status) -> Result<(), AlreadyComplete> {
        if self.status != Status::Pending {
            return Err(AlreadyComplete);
        }
        self.status = next;
        Ok(())
    }
}

impl Reply {
    /// Creates a pending reply around an envelope.
    ///
    /// The event name is classified once here; session attributes, user
    /// metadata and slot values are materialized from the envelope.
    pub fn new(envelope: Envelope, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        let attributes = envelope.attributes();
        let name = event_name(&envelope).to_owned();
        let is_new = envelope.is_new_session();
        let user = envelope.user().cloned();
        let slots = envelope.slot_values();

        Self {
            inner: Arc::new(ReplyInner {
                envelope,
                event_name: name,
                is_new,
                user,
                slots,
                diagnostics,
                state: Mutex::new(ReplyState {
                    attributes,
                    speech: None,
                    card: None,
                    reprompt: None,
                    end_session: false,
                    status: Status::Pending,
                    error: None,
                }),
            }),
        }
    }

    // ========================================================================
    // Read-only views
    // ========================================================================

    /// The raw inbound envelope. Never mutated by the engine.
    pub fn envelope(&self) -> &Envelope {
        &self.inner.envelope
    }

    /// The classified event name this dispatch routes on.
    pub fn event_name(&self) -> &str {
        &self.inner.event_name
    }

    /// The envelope's protocol version tag.
    pub fn version(&self) -> &str {
        &self.inner.envelope.version
    }

    /// Whether the envelope opened a new session.
    pub fn is_new(&self) -> bool {
        self.inner.is_new
    }

    /// The user behind the session, if the envelope carried one.
    pub fn user(&self) -> Option<&User> {
        self.inner.user.as_ref()
    }

    /// Intent slot values, materialized as a name → value map.
    pub fn slots(&self) -> &HashMap<String, String> {
        &self.inner.slots
    }

    /// Looks up one slot value by name.
    pub fn slot(&self, name: &str) -> Option<String> {
        self.inner.slots.get(name).cloned()
    }

    /// The current lifecycle state.
    pub fn status(&self) -> Status {
        self.inner.state.lock().status
    }

    /// Whether the terminal transition has fired.
    pub fn sent(&self) -> bool {
        self.status() != Status::Pending
    }

    /// Returns a copy of the accumulated session attributes.
    pub fn attributes(&self) -> Map<String, Value> {
        self.inner.state.lock().attributes.clone()
    }

    /// Looks up one session attribute by key.
    pub fn attribute(&self, key: &str) -> Option<Value> {
        self.inner.state.lock().attributes.get(key).cloned()
    }

    // ========================================================================
    // Mutators (chainable, no-ops after the terminal transition)
    // ========================================================================

    /// Sets the output speech, inferring plain text or markup from the
    /// content. Last write wins.
    pub fn say(&self, content: impl IntoSpeech) -> &Self {
        let speech = content.into_speech();
        self.mutate("say", |state| state.speech = Some(speech))
    }

    /// Sets the output speech with an explicit [`SpeechKind`].
    pub fn say_as(&self, kind: SpeechKind, content: impl IntoSpeech) -> &Self {
        let speech = Speech::coerce(kind, content);
        self.mutate("say", |state| state.speech = Some(speech))
    }

    /// Sets a simple card with a title and body. Last write wins.
    pub fn show(&self, title: impl Into<String>, content: impl Into<String>) -> &Self {
        self.show_card(Card::simple(title, content))
    }

    /// Sets a card of any kind. Last write wins.
    pub fn show_card(&self, card: Card) -> &Self {
        self.mutate("show", |state| state.card = Some(card))
    }

    /// Sets the reprompt speech, with the same inference as [`say`].
    ///
    /// [`say`]: Reply::say
    pub fn reprompt(&self, content: impl IntoSpeech) -> &Self {
        let speech = content.into_speech();
        self.mutate("reprompt", |state| state.reprompt = Some(speech))
    }

    /// Sets the reprompt speech with an explicit [`SpeechKind`].
    pub fn reprompt_as(&self, kind: SpeechKind, content: impl IntoSpeech) -> &Self {
        let speech = Speech::coerce(kind, content);
        self.mutate("reprompt", |state| state.reprompt = Some(speech))
    }

    /// Writes one session attribute, echoed back in the serialized response.
    pub fn set_attribute(&self, key: impl Into<String>, value: Value) -> &Self {
        let key = key.into();
        self.mutate("set_attribute", |state| {
            state.attributes.insert(key, value);
        })
    }

    // ========================================================================
    // Terminal transitions
    // ========================================================================

    /// Marks the session as ended and sends the response.
    pub fn end(&self) {
        let mut state = self.inner.state.lock();
        match state.transition(Status::Finished) {
            Ok(()) => state.end_session = true,
            Err(AlreadyComplete) => {
                drop(state);
                self.misuse_completion("end");
            }
        }
    }

    /// Sends the response, leaving the session open.
    pub fn send(&self) {
        let mut state = self.inner.state.lock();
        match state.transition(Status::Finished) {
            Ok(()) => {}
            Err(AlreadyComplete) => {
                drop(state);
                self.misuse_completion("send");
            }
        }
    }

    /// Fails the dispatch, short-circuiting any remaining stack entries.
    ///
    /// The error travels with the dispatch outcome.
    pub fn fail(&self, error: impl Into<HandlerError>) {
        let mut state = self.inner.state.lock();
        match state.transition(Status::Failed) {
            Ok(()) => state.error = Some(error.into()),
            Err(AlreadyComplete) => {
                drop(state);
                self.misuse_completion("fail");
            }
        }
    }

    /// Removes and returns the failure error, if the reply failed.
    ///
    /// The dispatcher calls this once when assembling the dispatch outcome;
    /// subsequent calls return `None`.
    pub fn take_error(&self) -> Option<HandlerError> {
        self.inner.state.lock().error.take()
    }

    /// Reports a post-completion error that has nowhere to be routed.
    pub fn report_stray_error(&self) {
        self.inner.diagnostics.emit(Diagnostic::ErrorAfterSent {
            event: &self.inner.event_name,
        });
    }

    /// Reports an error reaching the end of the stack unconsumed.
    pub fn report_unhandled_error(&self) {
        self.inner.diagnostics.emit(Diagnostic::UnhandledError {
            event: &self.inner.event_name,
        });
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serializes the accumulated response to a JSON value.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn mutate(&self, op: &str, apply: impl FnOnce(&mut ReplyState)) -> &Self {
        let mut state = self.inner.state.lock();
        if state.status != Status::Pending {
            drop(state);
            self.inner.diagnostics.emit(Diagnostic::MutationAfterSent {
                op,
                event: &self.inner.event_name,
            });
            return self;
        }
        apply(&mut state);
        self
    }

    fn misuse_completion(&self, op: &str) {
        self.inner.diagnostics.emit(Diagnostic::CompletionAfterSent {
            op,
            event: &self.inner.event_name,
        });
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reply")
            .field("event_name", &self.inner.event_name)
            .field("status", &self.status())
            .finish()
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseView<'a> {
    version: &'a str,
    session_attributes: &'a Map<String, Value>,
    response: ResponseBody<'a>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_speech: Option<&'a Speech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<&'a Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reprompt: Option<Reprompt<'a>>,
    should_end_session: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Reprompt<'a> {
    output_speech: &'a Speech,
}

impl Serialize for Reply {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let state = self.inner.state.lock();
        let view = ResponseView {
            version: self.version(),
            session_attributes: &state.attributes,
            response: ResponseBody {
                output_speech: state.speech.as_ref(),
                card: state.card.as_ref(),
                reprompt: state
                    .reprompt
                    .as_ref()
                    .map(|speech| Reprompt {
                        output_speech: speech,
                    }),
                should_end_session: state.end_session,
            },
        };
        view.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::TracingSink;
    use crate::ssml::speak;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl DiagnosticSink for RecordingSink {
        fn emit(&self, diagnostic: Diagnostic<'_>) {
            self.0.lock().push(format!("{diagnostic:?}"));
        }
    }

    fn intent_envelope() -> Envelope {
        Envelope::from_value(json!({
            "version": "1.0",
            "session": {
                "new": false,
                "application": { "applicationId": "app-1234" },
                "attributes": { "supportedHoroscopePeriods": { "daily": true } },
                "user": { "userId": "user-1234" }
            },
            "request": {
                "type": "IntentRequest",
                "intent": {
                    "name": "GetZodiacHoroscopeIntent",
                    "slots": {
                        "ZodiacSign": { "name": "ZodiacSign", "value": "virgo" }
                    }
                }
            }
        }))
        .unwrap()
    }

    fn reply() -> Reply {
        Reply::new(intent_envelope(), Arc::new(TracingSink))
    }

    fn recorded_reply() -> (Reply, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let sink_handle: Arc<dyn DiagnosticSink> = sink.clone();
        let reply = Reply::new(intent_envelope(), sink_handle);
        (reply, sink)
    }

    #[test]
    fn exposes_envelope_derived_fields() {
        let reply = reply();
        assert!(!reply.sent());
        assert!(!reply.is_new());
        assert_eq!(reply.version(), "1.0");
        assert_eq!(reply.event_name(), "GetZodiacHoroscopeIntent");
        assert_eq!(reply.user().unwrap().user_id, "user-1234");
        assert_eq!(reply.slot("ZodiacSign").as_deref(), Some("virgo"));
        assert!(reply.attribute("supportedHoroscopePeriods").is_some());
    }

    #[test]
    fn say_accepts_text_and_markup() {
        let reply = reply();
        reply.say("foo");
        assert_eq!(
            reply.to_value().unwrap()["response"]["outputSpeech"],
            json!({ "type": "PlainText", "text": "foo" })
        );

        reply.say(speak());
        assert_eq!(
            reply.to_value().unwrap()["response"]["outputSpeech"],
            json!({ "type": "SSML", "ssml": "<speak/>" })
        );
    }

    #[test]
    fn say_as_forces_the_kind() {
        let reply = reply();
        reply.say_as(SpeechKind::Ssml, "<speak></speak>");
        assert_eq!(
            reply.to_value().unwrap()["response"]["outputSpeech"],
            json!({ "type": "SSML", "ssml": "<speak></speak>" })
        );

        reply.say_as(SpeechKind::Text, "foobar");
        assert_eq!(
            reply.to_value().unwrap()["response"]["outputSpeech"],
            json!({ "type": "PlainText", "text": "foobar" })
        );
    }

    #[test]
    fn show_sets_a_simple_card() {
        let reply = reply();
        reply.show("foo", "bar");
        assert_eq!(
            reply.to_value().unwrap()["response"]["card"],
            json!({ "type": "Simple", "title": "foo", "content": "bar" })
        );
    }

    #[test]
    fn show_card_accepts_richer_cards() {
        let reply = reply();
        reply.show_card(Card::LinkAccount);
        assert_eq!(
            reply.to_value().unwrap()["response"]["card"],
            json!({ "type": "LinkAccount" })
        );
    }

    #[test]
    fn reprompt_nests_under_output_speech() {
        let reply = reply();
        reply.reprompt("foo");
        assert_eq!(
            reply.to_value().unwrap()["response"]["reprompt"],
            json!({ "outputSpeech": { "type": "PlainText", "text": "foo" } })
        );
    }

    #[test]
    fn mutators_chain() {
        let reply = reply();
        reply.say("foo").show("foo", "bar").reprompt("baz");
        let value = reply.to_value().unwrap();
        assert!(value["response"]["outputSpeech"].is_object());
        assert!(value["response"]["card"].is_object());
        assert!(value["response"]["reprompt"].is_object());
    }

    #[test]
    fn end_sends_and_flags_end_of_session() {
        let reply = reply();
        reply.end();
        assert!(reply.sent());
        assert_eq!(reply.status(), Status::Finished);
        assert_eq!(
            reply.to_value().unwrap()["response"]["shouldEndSession"],
            json!(true)
        );
    }

    #[test]
    fn send_leaves_the_session_open() {
        let reply = reply();
        reply.send();
        assert!(reply.sent());
        assert_eq!(
            reply.to_value().unwrap()["response"]["shouldEndSession"],
            json!(false)
        );
    }

    #[test]
    fn fail_stores_the_error() {
        let reply = reply();
        reply.fail(std::io::Error::other("boom"));
        assert_eq!(reply.status(), Status::Failed);
        let error = reply.take_error().expect("failure error");
        assert_eq!(error.to_string(), "boom");
        assert!(reply.take_error().is_none());
    }

    #[test]
    fn second_completion_is_rejected_and_reported() {
        let (reply, sink) = recorded_reply();
        reply.send();
        reply.fail(std::io::Error::other("late"));
        assert_eq!(reply.status(), Status::Finished);
        assert!(reply.take_error().is_none());
        assert_eq!(sink.0.lock().len(), 1);
        assert!(sink.0.lock()[0].contains("CompletionAfterSent"));
    }

    #[test]
    fn mutation_after_sent_is_a_reported_no_op() {
        let (reply, sink) = recorded_reply();
        reply.say("before");
        reply.send();
        reply.say("after").show("t", "c");
        assert_eq!(
            reply.to_value().unwrap()["response"]["outputSpeech"]["text"],
            json!("before")
        );
        assert!(reply.to_value().unwrap()["response"].get("card").is_none());
        assert_eq!(sink.0.lock().len(), 2);
    }

    #[test]
    fn serializes_the_full_response_shape() {
        let reply = reply();
        reply
            .say("foo")
            .show("foo", "bar")
            .reprompt(speak().text("foo"));
        reply.end();

        assert_eq!(
            reply.to_value().unwrap(),
            json!({
                "version": "1.0",
                "sessionAttributes": {
                    "supportedHoroscopePeriods": { "daily": true }
                },
                "response": {
                    "outputSpeech": { "type": "PlainText", "text": "foo" },
                    "card": { "type": "Simple", "title": "foo", "content": "bar" },
                    "reprompt": {
                        "outputSpeech": { "type": "SSML", "ssml": "<speak>foo</speak>" }
                    },
                    "shouldEndSession": true
                }
            })
        );
    }

    #[test]
    fn unset_fields_are_omitted() {
        let reply = reply();
        reply.send();
        let value = reply.to_value().unwrap();
        assert!(value["response"].get("outputSpeech").is_none());
        assert!(value["response"].get("card").is_none());
        assert!(value["response"].get("reprompt").is_none());
        assert_eq!(value["response"]["shouldEndSession"], json!(false));
    }

    #[test]
    fn session_attributes_are_writable_until_sent() {
        let reply = reply();
        reply.set_attribute("count", json!(2));
        reply.send();
        reply.set_attribute("count", json!(3));
        assert_eq!(
            reply.to_value().unwrap()["sessionAttributes"]["count"],
            json!(2)
        );
    }
}

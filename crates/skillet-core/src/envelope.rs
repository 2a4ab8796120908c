//! The inbound event envelope.
//!
//! An [`Envelope`] is the structured value a voice platform delivers for one
//! request: a request-type discriminator, an optional intent with named
//! slots, and optional session metadata. The envelope is owned by the caller
//! and is never mutated by the dispatch engine — the response object only
//! holds a read-only view of it.
//!
//! # Parsing
//!
//! Envelopes deserialize with serde. The request discriminator is an
//! internally tagged enum; unrecognized `type` values land on
//! [`RequestKind::Unknown`] instead of failing, which keeps event
//! classification total.
//!
//! ```rust,ignore
//! let envelope = Envelope::from_json(body)?;
//! let skill_outcome = skill.handle(envelope).await;
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One inbound request event, as delivered by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Protocol version tag. Defaults to `"1.0"` when absent.
    #[serde(default = "default_version")]
    pub version: String,

    /// Session metadata, absent for out-of-session requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,

    /// The request body with its type discriminator.
    pub request: RequestKind,
}

fn default_version() -> String {
    "1.0".to_owned()
}

impl Envelope {
    /// Parses an envelope from a raw JSON string.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Parses an envelope from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Returns the intent carried by an intent-type request.
    pub fn intent(&self) -> Option<&Intent> {
        match &self.request {
            RequestKind::Intent { intent } => Some(intent),
            _ => None,
        }
    }

    /// Returns the application id the envelope was addressed to.
    pub fn application_id(&self) -> Option<&str> {
        self.session
            .as_ref()?
            .application
            .as_ref()
            .map(|app| app.application_id.as_str())
    }

    /// Returns the session attribute map, empty when there is no session.
    pub fn attributes(&self) -> Map<String, Value> {
        self.session
            .as_ref()
            .map(|session| session.attributes.clone())
            .unwrap_or_default()
    }

    /// Returns the user associated with the session, if any.
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref()?.user.as_ref()
    }

    /// Whether this envelope opened a new session.
    pub fn is_new_session(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.new)
    }

    /// Materializes the intent's slots as a name → value map.
    ///
    /// Slots without a resolved value are skipped. Non-intent requests
    /// yield an empty map.
    pub fn slot_values(&self) -> HashMap<String, String> {
        let Some(intent) = self.intent() else {
            return HashMap::new();
        };
        intent
            .slots
            .values()
            .filter_map(|slot| {
                slot.value
                    .as_ref()
                    .map(|value| (slot.name.clone(), value.clone()))
            })
            .collect()
    }
}

/// The request body, discriminated by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestKind {
    /// The user opened the skill without a specific intent.
    #[serde(rename = "LaunchRequest")]
    Launch,

    /// The user invoked a named intent.
    #[serde(rename = "IntentRequest")]
    Intent {
        /// The resolved intent with its slot values.
        intent: Intent,
    },

    /// The platform ended the session.
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded {
        /// Platform-reported reason for the session ending.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Any request shape this crate does not recognize.
    #[serde(other)]
    Unknown,
}

/// A resolved intent with its named slot values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// The intent name, used verbatim as the event name for routing.
    pub name: String,

    /// Slot values keyed by slot name.
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

/// One named slot value inside an intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// The slot name.
    pub name: String,

    /// The resolved value, absent when the user did not fill the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Session metadata attached to in-session requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Whether this request opened the session.
    #[serde(default)]
    pub new: bool,

    /// Opaque session identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Free-form attribute blob carried across requests of one session.
    #[serde(default)]
    pub attributes: Map<String, Value>,

    /// The application the session belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,

    /// The user the session belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Identifies the skill an envelope was addressed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// The platform-assigned application id.
    pub application_id: String,
}

/// Identifies the user behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The platform-assigned user id.
    pub user_id: String,

    /// OAuth access token, present when account linking is set up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

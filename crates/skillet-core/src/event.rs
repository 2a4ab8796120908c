//! Event classification.
//!
//! Every dispatch starts by reducing the inbound [`Envelope`] to a single
//! canonical event name used for routing. Classification is a pure, total
//! function: request shapes this crate does not recognize map to the
//! [`UNKNOWN_EVENT`] sentinel rather than failing.
//!
//! | request discriminator | event name |
//! |---|---|
//! | launch request | [`LAUNCH`] |
//! | intent request | the intent's own name, verbatim |
//! | session-ended request | [`END`] |
//! | anything else | [`UNKNOWN_EVENT`] |

use crate::envelope::{Envelope, RequestKind};

/// Event name for launch-type requests.
pub const LAUNCH: &str = "launch";

/// Event name for session-ended requests.
pub const END: &str = "end";

/// Sentinel event name for unrecognized request shapes.
pub const UNKNOWN_EVENT: &str = "unknownEvent";

/// Returns the canonical event name for an envelope.
pub fn event_name(envelope: &Envelope) -> &str {
    match &envelope.request {
        RequestKind::Launch => LAUNCH,
        RequestKind::Intent { intent } => intent.name.as_str(),
        RequestKind::SessionEnded { .. } => END,
        RequestKind::Unknown => UNKNOWN_EVENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(request: serde_json::Value) -> Envelope {
        Envelope::from_value(json!({ "version": "1.0", "request": request })).unwrap()
    }

    #[test]
    fn launch_requests_classify_to_launch() {
        let env = envelope(json!({ "type": "LaunchRequest" }));
        assert_eq!(event_name(&env), LAUNCH);
    }

    #[test]
    fn intent_requests_classify_to_the_intent_name() {
        let env = envelope(json!({
            "type": "IntentRequest",
            "intent": { "name": "GetZodiacHoroscopeIntent", "slots": {} }
        }));
        assert_eq!(event_name(&env), "GetZodiacHoroscopeIntent");
    }

    #[test]
    fn session_ended_requests_classify_to_end() {
        let env = envelope(json!({ "type": "SessionEndedRequest" }));
        assert_eq!(event_name(&env), END);
    }

    #[test]
    fn unrecognized_requests_classify_to_the_sentinel() {
        let env = envelope(json!({ "type": "System.ExceptionEncountered" }));
        assert_eq!(event_name(&env), UNKNOWN_EVENT);
    }
}

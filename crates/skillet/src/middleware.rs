//! Bundled middleware.

use futures::future::{Ready, ready};
use thiserror::Error;
use tracing::trace;

use skillet_core::Reply;

use crate::handler::HandlerResult;

/// The envelope was addressed to a different application.
#[derive(Debug, Error)]
#[error("invalid applicationId: {actual:?}")]
pub struct InvalidApplication {
    /// The application id the envelope carried, if any.
    pub actual: Option<String>,
}

/// Middleware verifying the envelope's application id.
///
/// Certification requires a skill to reject requests addressed to another
/// application. Register this first; on a mismatch it fails the dispatch
/// with [`InvalidApplication`], short-circuiting the rest of the stack.
///
/// ```rust,ignore
/// skill.use_middleware(verify_application("amzn1.ask.skill.1234"));
/// ```
pub fn verify_application(
    expected: impl Into<String>,
) -> impl Fn(Reply) -> Ready<HandlerResult> + Send + Sync {
    let expected = expected.into();
    move |reply: Reply| {
        let actual = reply.envelope().application_id();
        if actual == Some(expected.as_str()) {
            trace!("applicationId matches");
        } else {
            trace!(actual, "applicationId mismatch");
            reply.fail(InvalidApplication {
                actual: actual.map(str::to_owned),
            });
        }
        ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skillet_core::{Envelope, Status};

    use crate::skill::Skill;

    fn envelope(app_id: &str) -> Envelope {
        Envelope::from_value(json!({
            "version": "1.0",
            "session": { "application": { "applicationId": app_id } },
            "request": { "type": "LaunchRequest" }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn matching_id_passes_through() {
        let mut skill = Skill::new();
        skill
            .use_middleware(verify_application("app-1234"))
            .on("launch", |reply: Reply| async move {
                reply.say("hi").send();
                Ok(())
            });

        let completion = skill.handle(envelope("app-1234")).await;
        assert!(completion.finished());
        assert_eq!(completion.reply.status(), Status::Finished);
    }

    #[tokio::test]
    async fn mismatched_id_fails_the_dispatch() {
        let mut skill = Skill::new();
        skill
            .use_middleware(verify_application("app-1234"))
            .on("launch", |reply: Reply| async move {
                reply.say("hi").send();
                Ok(())
            });

        let completion = skill.handle(envelope("someone-else")).await;
        let error = completion.error.expect("verification failure");
        let invalid = error.downcast_ref::<InvalidApplication>().unwrap();
        assert_eq!(invalid.actual.as_deref(), Some("someone-else"));
        assert_eq!(completion.reply.status(), Status::Failed);
    }
}

//! Built-in Amazon intent names.
//!
//! Constants for the standard intents every certified skill is expected to
//! handle. Use them as event names with the dispatcher's `on` registration:
//!
//! ```rust,ignore
//! skill.on(intents::HELP, |reply: Reply| async move {
//!     reply.say("Ask me for your horoscope.").send();
//!     Ok(())
//! });
//! ```

/// Cancel a transaction or task, or exit the skill entirely.
///
/// Examples: "cancel", "never mind", "forget it".
pub const CANCEL: &str = "AMAZON.CancelIntent";

/// Ask for help about how to use the skill.
///
/// Examples: "help", "help me", "can you help me".
pub const HELP: &str = "AMAZON.HelpIntent";

/// A negative response to a yes/no confirmation question.
///
/// Examples: "no", "no thanks".
pub const NO: &str = "AMAZON.NoIntent";

/// A positive response to a yes/no confirmation question.
///
/// Examples: "yes", "yes please", "sure".
pub const YES: &str = "AMAZON.YesIntent";

/// Repeat the last action.
///
/// Examples: "repeat", "say that again", "repeat that".
pub const REPEAT: &str = "AMAZON.RepeatIntent";

/// Restart an action, such as a game or a transaction.
///
/// Examples: "start over", "restart", "start again".
pub const START_OVER: &str = "AMAZON.StartOverIntent";

/// Stop an action or exit the skill.
///
/// Examples: "stop", "off", "shut up".
pub const STOP: &str = "AMAZON.StopIntent";

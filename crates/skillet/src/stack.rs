//! Tagged stack entries.
//!
//! Each registration appends one entry to the dispatcher's ordered stack.
//! The role an entry plays is an explicit tag fixed at registration time —
//! never inferred from the callable's shape — so error-mode routing and
//! event filtering survive any amount of wrapping.

use crate::handler::{BoxedErrorHandler, BoxedHandler};

/// One unit of work in the dispatcher's ordered stack.
#[derive(Clone)]
pub(crate) enum StackEntry {
    /// Unconditional middleware, invoked for every dispatch.
    Middleware(BoxedHandler),

    /// An event-scoped handler. Self-skips (no side effects) when the live
    /// dispatch's classified event name differs from the captured name.
    Event {
        /// The event name captured at registration.
        name: String,
        /// The wrapped handler.
        handler: BoxedHandler,
    },

    /// An error-mode entry, invoked only while an error is in flight.
    Error(BoxedErrorHandler),
}

impl StackEntry {
    /// Short label for trace output.
    pub(crate) fn describe(&self) -> &str {
        match self {
            StackEntry::Middleware(_) => "middleware",
            StackEntry::Event { name, .. } => name.as_str(),
            StackEntry::Error(_) => "error handler",
        }
    }
}

impl std::fmt::Debug for StackEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackEntry::Middleware(_) => f.write_str("Middleware"),
            StackEntry::Event { name, .. } => f.debug_struct("Event").field("name", name).finish(),
            StackEntry::Error(_) => f.write_str("Error"),
        }
    }
}

//! Caller-misuse diagnostics.
//!
//! The dispatch engine never panics or corrupts state when application code
//! misuses it after a response has been sent; it reports the misuse through
//! an injected [`DiagnosticSink`] and carries on. The sink is a collaborator
//! handed to the dispatcher (and threaded into each response object), not a
//! process-wide implicit logger — tests inject a recording sink, production
//! code typically keeps the [`TracingSink`] default.

use std::sync::Arc;

/// One structured misuse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic<'a> {
    /// A response mutator was called after the terminal transition.
    MutationAfterSent {
        /// The mutator that was called, e.g. `"say"`.
        op: &'a str,
        /// The classified event name of the dispatch.
        event: &'a str,
    },

    /// A second terminal transition (`send`/`end`/`fail`) was attempted.
    CompletionAfterSent {
        /// The terminal that was called.
        op: &'a str,
        /// The classified event name of the dispatch.
        event: &'a str,
    },

    /// A stack entry produced an error after the response was already sent,
    /// leaving the error nowhere to go.
    ErrorAfterSent {
        /// The classified event name of the dispatch.
        event: &'a str,
    },

    /// A handler error reached the end of the stack with no error handler
    /// registered anywhere.
    UnhandledError {
        /// The classified event name of the dispatch.
        event: &'a str,
    },
}

/// Structured sink for misuse diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Delivers one diagnostic. Implementations must not panic.
    fn emit(&self, diagnostic: Diagnostic<'_>);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn emit(&self, diagnostic: Diagnostic<'_>) {
        (**self).emit(diagnostic);
    }
}

/// Default sink forwarding diagnostics as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic<'_>) {
        match diagnostic {
            Diagnostic::MutationAfterSent { op, event } => {
                tracing::warn!(op, event, "response already sent, ignoring mutation");
            }
            Diagnostic::CompletionAfterSent { op, event } => {
                tracing::warn!(op, event, "response already sent, ignoring completion");
            }
            Diagnostic::ErrorAfterSent { event } => {
                tracing::warn!(event, "error raised after response was sent");
            }
            Diagnostic::UnhandledError { event } => {
                tracing::warn!(event, "unhandled error, add an error handler");
            }
        }
    }
}

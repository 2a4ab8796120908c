//! Error types for the dispatch engine.

use thiserror::Error;

/// Boxed error produced by application handlers.
///
/// Handlers fail with whatever error type the application uses; the engine
/// carries it opaquely through error-mode routing and into the dispatch
/// outcome.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Failures synthesized by the engine itself.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The stack was exhausted with no error in flight and nothing sent.
    #[error("no handler responded to event '{event}'")]
    Unhandled {
        /// The classified event name of the dispatch.
        event: String,
    },

    /// A stack entry panicked; the panic was contained and converted into
    /// a failure settlement.
    #[error("handler panicked: {message}")]
    HandlerPanic {
        /// The panic payload's message, when it carried one.
        message: String,
    },
}

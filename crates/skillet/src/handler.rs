//! Handler traits for stack entries.
//!
//! Every stack entry is an async function over the dispatch's [`Reply`]
//! returning one explicit [`HandlerResult`]. There is exactly one calling
//! convention: a synchronous handler is simply one whose future is
//! immediately ready, and a failing handler returns `Err` (or panics — the
//! settlement adapter contains that too, see [`crate::settle`]).
//!
//! Both traits have blanket implementations for plain async functions and
//! closures, so application code never implements them by hand:
//!
//! ```rust,ignore
//! async fn launch(reply: Reply) -> HandlerResult {
//!     reply.say("Welcome.").send();
//!     Ok(())
//! }
//!
//! skill.on(event::LAUNCH, launch);
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use skillet_core::{HandlerError, Reply};

/// The single settlement a stack entry produces.
pub type HandlerResult = Result<(), HandlerError>;

/// A normal-mode stack entry: middleware or an event-scoped handler.
///
/// Invoked only while no error is in flight.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs the handler against the live reply.
    async fn call(&self, reply: Reply) -> HandlerResult;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(Reply) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn call(&self, reply: Reply) -> HandlerResult {
        (self)(reply).await
    }
}

/// An error-mode stack entry.
///
/// Invoked only while an error is in flight; takes ownership of that error.
/// Returning `Ok(())` consumes the error and resumes normal-mode traversal;
/// returning `Err` keeps (or replaces) the error in flight.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    /// Runs the error handler with the in-flight error.
    async fn call(&self, error: HandlerError, reply: Reply) -> HandlerResult;
}

#[async_trait]
impl<F, Fut> ErrorHandler for F
where
    F: Fn(HandlerError, Reply) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn call(&self, error: HandlerError, reply: Reply) -> HandlerResult {
        (self)(error, reply).await
    }
}

/// A type-erased normal-mode handler stored in the stack.
pub type BoxedHandler = Arc<dyn Handler>;

/// A type-erased error-mode handler stored in the stack.
pub type BoxedErrorHandler = Arc<dyn ErrorHandler>;

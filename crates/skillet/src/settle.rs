//! The settlement adapter.
//!
//! Every stack-entry invocation runs through [`settle`], which guarantees
//! the dispatcher observes exactly one settlement per invocation no matter
//! how the handler completes:
//!
//! - an `Ok`/`Err` return passes through unchanged, whether the future was
//!   immediately ready or suspended first;
//! - a panic is contained with `catch_unwind` and converted into a
//!   [`DispatchError::HandlerPanic`] failure settlement, so nothing ever
//!   propagates out of a dispatch uncaught.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use skillet_core::DispatchError;

use crate::handler::HandlerResult;

/// Drives one handler future to its single settlement.
pub async fn settle<F>(handler_future: F) -> HandlerResult
where
    F: Future<Output = HandlerResult>,
{
    match AssertUnwindSafe(handler_future).catch_unwind().await {
        Ok(settlement) => settlement,
        Err(payload) => Err(DispatchError::HandlerPanic {
            message: panic_message(payload),
        }
        .into()),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}

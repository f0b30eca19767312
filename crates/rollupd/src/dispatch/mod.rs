//! Request dispatch: the negotiation loop and its collaborators.
//!
//! The loop alternates between one blocking negotiation call and the
//! processing of the request that call classified:
//!
//! 1. [`Session::finish`] reports the previous [`Verdict`](crate::Verdict)
//!    and waits for the next request.
//! 2. [`Session::read`] decodes the request exactly once. Decode failures
//!    settle the iteration as a rejection without invoking the handler.
//! 3. The [`RequestHandler`] runs with an [`OutputEmitter`] bound to the
//!    request kind; inspect requests cannot emit.
//! 4. [`settle_verdict`] combines the handler outcome and the emission report
//!    into the verdict carried to step 1.
//!
//! Only a failed negotiation call is fatal.

mod dispatch_loop;
mod emitter;
mod errors;
mod handler;
mod session;
mod verdict;

pub use dispatch_loop::{DispatchLoop, LoopExit, LoopSettings, Settlement};
pub use emitter::{EmissionReport, OutputEmitter};
pub use errors::{DispatchError, EmissionError, FatalError, HandlerError, OutputKind};
pub use handler::RequestHandler;
pub use session::Session;
pub use verdict::settle_verdict;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

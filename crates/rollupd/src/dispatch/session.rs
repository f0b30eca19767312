//! The single live handle to the rollup node.

use crate::protocol::{DecodeError, Request, RequestKind, Verdict};
use crate::transport::RollupTransport;

use super::emitter::OutputEmitter;
use super::errors::FatalError;

/// Process-wide context wrapping the node transport.
///
/// Created once at startup and owned by the dispatch loop. The session holds
/// nothing but the handle: the transport tracks the pending request and
/// refuses a second read of it.
pub struct Session<T> {
    transport: T,
}

impl<T> Session<T>
where
    T: RollupTransport,
{
    /// Wraps `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Reports `verdict` for the previous request and blocks until the node
    /// classifies the next one.
    ///
    /// # Errors
    ///
    /// Any transport failure is fatal.
    pub fn finish(&mut self, verdict: Verdict) -> Result<RequestKind, FatalError> {
        Ok(self.transport.finish(verdict)?)
    }

    /// Reads the pending request, which must have been classified as `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when no request is pending, the kinds differ,
    /// or the request data is malformed.
    pub fn read(&mut self, kind: RequestKind) -> Result<Request, DecodeError> {
        match kind {
            RequestKind::Advance => self.transport.read_advance().map(Request::Advance),
            RequestKind::Inspect => self.transport.read_inspect().map(Request::Inspect),
        }
    }

    /// Builds an emitter bound to the request of the given kind.
    pub fn outputs(&mut self, kind: RequestKind) -> OutputEmitter<'_> {
        OutputEmitter::new(&mut self.transport, kind)
    }
}

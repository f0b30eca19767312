//! Extension point for application logic.

use crate::protocol::{Advance, Inspect};

use super::emitter::OutputEmitter;
use super::errors::HandlerError;

/// Application logic invoked once per decoded request.
///
/// Both methods receive an [`OutputEmitter`]. For inspect requests the
/// emitter refuses every output, so read-only processing cannot produce
/// vouchers or notices even by mistake.
pub trait RequestHandler {
    /// Processes a state-advancing request.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the request must be rejected.
    fn advance(
        &mut self,
        request: &Advance,
        outputs: &mut OutputEmitter<'_>,
    ) -> Result<(), HandlerError>;

    /// Processes a read-only request.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the request must be rejected.
    fn inspect(
        &mut self,
        request: &Inspect,
        outputs: &mut OutputEmitter<'_>,
    ) -> Result<(), HandlerError>;
}

impl<H> RequestHandler for Box<H>
where
    H: RequestHandler + ?Sized,
{
    fn advance(
        &mut self,
        request: &Advance,
        outputs: &mut OutputEmitter<'_>,
    ) -> Result<(), HandlerError> {
        (**self).advance(request, outputs)
    }

    fn inspect(
        &mut self,
        request: &Inspect,
        outputs: &mut OutputEmitter<'_>,
    ) -> Result<(), HandlerError> {
        (**self).inspect(request, outputs)
    }
}

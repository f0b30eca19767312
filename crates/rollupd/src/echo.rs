//! Default request handler that echoes advance payloads back to the node.

use tracing::info;

use crate::dispatch::{HandlerError, OutputEmitter, RequestHandler};
use crate::protocol::{Advance, Inspect, Notice, Voucher};

const ECHO_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::echo");

/// Echoes every advance payload as a voucher addressed to its sender followed
/// by a notice, and answers inspect requests by logging them.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

impl EchoHandler {
    /// Builds the handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RequestHandler for EchoHandler {
    fn advance(
        &mut self,
        request: &Advance,
        outputs: &mut OutputEmitter<'_>,
    ) -> Result<(), HandlerError> {
        info!(
            target: ECHO_TARGET,
            sender = %request.sender,
            input_index = request.metadata.input_index,
            bytes = request.payload.len(),
            "echoing advance payload"
        );
        outputs.emit_voucher(&Voucher::new(request.sender, request.payload.clone()))?;
        outputs.emit_notice(&Notice::new(request.payload.clone()))?;
        Ok(())
    }

    fn inspect(
        &mut self,
        request: &Inspect,
        _outputs: &mut OutputEmitter<'_>,
    ) -> Result<(), HandlerError> {
        info!(
            target: ECHO_TARGET,
            bytes = request.payload.len(),
            "inspect request received"
        );
        Ok(())
    }
}

//! Output emission bound to the request currently being processed.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::protocol::{Notice, RequestKind, Voucher};
use crate::transport::{RollupTransport, TransportError};

use super::DISPATCH_TARGET;
use super::errors::{EmissionError, OutputKind};

/// Summary of the emissions attempted for one request.
#[derive(Debug, Clone, Default)]
pub struct EmissionReport {
    committed: usize,
    failure: Option<EmissionError>,
}

impl EmissionReport {
    /// Number of outputs the node accepted.
    #[must_use]
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// First emission the node failed to accept, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&EmissionError> {
        self.failure.as_ref()
    }

    pub(crate) fn into_failure(self) -> Option<EmissionError> {
        self.failure
    }
}

/// Forwards vouchers and notices to the node for the current request.
///
/// Emissions are sent synchronously in call order. The emitter refuses every
/// output while the current request is an inspect, and refuses further
/// outputs once one has failed, so the node never observes an output that
/// followed a gap.
pub struct OutputEmitter<'a> {
    transport: &'a mut dyn RollupTransport,
    request: RequestKind,
    report: EmissionReport,
}

impl<'a> OutputEmitter<'a> {
    pub(crate) fn new(transport: &'a mut dyn RollupTransport, request: RequestKind) -> Self {
        Self {
            transport,
            request,
            report: EmissionReport::default(),
        }
    }

    /// Kind of the request the emitter is bound to.
    #[must_use]
    pub fn request_kind(&self) -> RequestKind {
        self.request
    }

    /// Emits `voucher`.
    ///
    /// # Errors
    ///
    /// Returns [`EmissionError`] when the output is not permitted for the
    /// current request, an earlier output failed, or the node refused it.
    pub fn emit_voucher(&mut self, voucher: &Voucher) -> Result<(), EmissionError> {
        self.admit(OutputKind::Voucher)?;
        let result = self.transport.emit_voucher(voucher);
        self.record(OutputKind::Voucher, result)
    }

    /// Emits a notice.
    ///
    /// # Errors
    ///
    /// Returns [`EmissionError`] when the output is not permitted for the
    /// current request, an earlier output failed, or the node refused it.
    pub fn emit_notice(&mut self, notice: &Notice) -> Result<(), EmissionError> {
        self.admit(OutputKind::Notice)?;
        let result = self.transport.emit_notice(notice);
        self.record(OutputKind::Notice, result)
    }

    /// Emissions attempted so far.
    #[must_use]
    pub fn report(&self) -> &EmissionReport {
        &self.report
    }

    pub(crate) fn into_report(self) -> EmissionReport {
        self.report
    }

    fn admit(&self, output: OutputKind) -> Result<(), EmissionError> {
        let refusal = if self.request != RequestKind::Advance {
            EmissionError::NotPermitted {
                output,
                request: self.request,
            }
        } else if self.report.failure.is_some() {
            EmissionError::AfterFailure { output }
        } else {
            return Ok(());
        };
        warn!(
            target: DISPATCH_TARGET,
            kind = %self.request,
            output = %output,
            error = %refusal,
            "output refused"
        );
        Err(refusal)
    }

    fn record(
        &mut self,
        output: OutputKind,
        result: Result<(), TransportError>,
    ) -> Result<(), EmissionError> {
        match result {
            Ok(()) => {
                self.report.committed += 1;
                debug!(
                    target: DISPATCH_TARGET,
                    output = %output,
                    committed = self.report.committed,
                    "output committed"
                );
                Ok(())
            }
            Err(source) => {
                let error = EmissionError::Transport {
                    output,
                    committed: self.report.committed,
                    source: Arc::new(source),
                };
                self.report.failure = Some(error.clone());
                Err(error)
            }
        }
    }
}

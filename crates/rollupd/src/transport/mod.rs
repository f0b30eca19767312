//! Transport boundary between the request loop and the rollup node.
//!
//! The loop only depends on [`RollupTransport`]. Production wiring uses
//! [`HttpTransport`], which speaks the node's HTTP/JSON API; tests substitute
//! scripted or mocked transports.

mod errors;
mod http;
mod wire;

pub use errors::TransportError;
pub use http::{HttpTransport, HttpTransportOptions};

use crate::protocol::{Advance, DecodeError, Inspect, Notice, RequestKind, Verdict, Voucher};

/// Tracing target for transport operations.
pub(crate) const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Blocking request/response operations offered by the rollup node.
pub trait RollupTransport {
    /// Commits `verdict` for the previous request and blocks until the node
    /// classifies the next one.
    fn finish(&mut self, verdict: Verdict) -> Result<RequestKind, TransportError>;

    /// Decodes the pending advance request.
    ///
    /// The pending request is consumed: a second read, or a read of the wrong
    /// kind, fails with [`DecodeError::NoPendingRequest`] or
    /// [`DecodeError::KindMismatch`].
    fn read_advance(&mut self) -> Result<Advance, DecodeError>;

    /// Decodes the pending inspect request, consuming it like
    /// [`RollupTransport::read_advance`].
    fn read_inspect(&mut self) -> Result<Inspect, DecodeError>;

    /// Sends a voucher for the current advance request.
    fn emit_voucher(&mut self, voucher: &Voucher) -> Result<(), TransportError>;

    /// Sends a notice for the current advance request.
    fn emit_notice(&mut self, notice: &Notice) -> Result<(), TransportError>;
}

//! Error types for request dispatch failures.
//!
//! The loop separates two classes of failure by type. A failed negotiation
//! call leaves the protocol state unknown and surfaces as [`FatalError`], the
//! only error [`DispatchLoop::run`](super::DispatchLoop::run) returns.
//! Everything that happens while processing a single request (decoding,
//! handler logic, output emission) is a [`DispatchError`] and only turns the
//! verdict into a rejection.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::protocol::{DecodeError, RequestKind};
use crate::transport::TransportError;

/// Negotiation with the node failed; the loop cannot continue.
#[derive(Debug, Error)]
#[error("negotiation with the rollup node failed: {source}")]
pub struct FatalError {
    #[from]
    source: TransportError,
}

impl FatalError {
    /// Underlying transport failure.
    #[must_use]
    pub fn transport_error(&self) -> &TransportError {
        &self.source
    }

    /// Returns `true` when the negotiation call was interrupted by a shutdown
    /// request rather than failing.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.source.is_interrupted()
    }
}

/// Kind of output a handler attempted to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// A voucher.
    Voucher,
    /// A notice.
    Notice,
}

impl OutputKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Voucher => "voucher",
            Self::Notice => "notice",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors returned from an output emission.
#[derive(Debug, Clone, Error)]
pub enum EmissionError {
    /// Outputs may only be emitted while processing an advance request.
    #[error("{output} emission is not permitted while processing an {request} request")]
    NotPermitted {
        /// Output that was refused.
        output: OutputKind,
        /// Kind of the current request.
        request: RequestKind,
    },
    /// An earlier emission for the same request failed, so later outputs are
    /// refused to keep the node's view gap-free.
    #[error("{output} emission refused after an earlier emission failed")]
    AfterFailure {
        /// Output that was refused.
        output: OutputKind,
    },
    /// The node did not accept the output.
    #[error("{output} emission failed after {committed} committed output(s): {source}")]
    Transport {
        /// Output that failed.
        output: OutputKind,
        /// Outputs already accepted for this request.
        committed: usize,
        /// Underlying transport failure.
        #[source]
        source: Arc<TransportError>,
    },
}

/// Failures reported by request handler logic.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler declined the request.
    #[error("request rejected: {reason}")]
    Rejected {
        /// Human-readable reason.
        reason: String,
    },
    /// An output emission failed and the handler propagated it.
    #[error(transparent)]
    Emission(#[from] EmissionError),
    /// The handler failed with an underlying error.
    #[error("{message}: {source}")]
    Failed {
        /// Context for the failure.
        message: String,
        /// Underlying error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl HandlerError {
    /// Creates a rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Wraps an underlying error with context.
    pub fn failed(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            source: source.into(),
        }
    }
}

/// Recoverable failure observed while processing one request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The pending request could not be decoded.
    #[error("failed to decode request: {0}")]
    Decode(#[from] DecodeError),
    /// The handler reported a failure.
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),
    /// An emission failed but the handler carried on.
    #[error("output emission failed: {0}")]
    Emission(#[from] EmissionError),
}

impl DispatchError {
    /// Short label used in structured logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Handler(_) => "handler",
            Self::Emission(_) => "emission",
        }
    }
}

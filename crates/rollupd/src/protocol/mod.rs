//! Request, output, and verdict types exchanged with the rollup node.
//!
//! Exactly one [`Request`] is current at a time. It is produced by a
//! negotiation call, consumed by the iteration that classified it, and never
//! buffered across iterations. Outputs ([`Voucher`], [`Notice`]) may only be
//! produced while the current request is an advance.

use std::fmt;

use thiserror::Error;

use rollup_config::InitialVerdict;

mod address;
pub(crate) mod hex_bytes;

pub use address::{ADDRESS_LEN, Address};

/// Outcome of processing one request, reported on the next negotiation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The request was processed successfully.
    Accept,
    /// The request failed and its effects must be discarded by the node.
    Reject,
}

impl Verdict {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }

    /// Returns `true` for [`Verdict::Accept`].
    #[must_use]
    pub fn is_accept(self) -> bool {
        matches!(self, Self::Accept)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<InitialVerdict> for Verdict {
    fn from(initial: InitialVerdict) -> Self {
        match initial {
            InitialVerdict::Accept => Self::Accept,
            InitialVerdict::Reject => Self::Reject,
        }
    }
}

/// Classification of the pending request returned by a negotiation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// State-advancing transaction.
    Advance,
    /// Read-only query.
    Inspect,
}

impl RequestKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Inspect => "inspect",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Block metadata attached to an advance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceMetadata {
    /// Epoch the input belongs to.
    pub epoch_index: u64,
    /// Position of the input within its epoch.
    pub input_index: u64,
    /// Block that carried the input.
    pub block_number: u64,
    /// Block timestamp in seconds.
    pub timestamp: u64,
}

/// State-advancing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Account that submitted the input.
    pub sender: Address,
    /// Opaque input bytes.
    pub payload: Vec<u8>,
    /// Block metadata for the input.
    pub metadata: AdvanceMetadata,
}

/// Read-only request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspect {
    /// Opaque query bytes.
    pub payload: Vec<u8>,
}

/// The request currently being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// State-advancing request.
    Advance(Advance),
    /// Read-only request.
    Inspect(Inspect),
}

impl Request {
    /// Returns the classification of this request.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Advance(_) => RequestKind::Advance,
            Self::Inspect(_) => RequestKind::Inspect,
        }
    }

    /// Returns the request payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Advance(advance) => &advance.payload,
            Self::Inspect(inspect) => &inspect.payload,
        }
    }
}

/// Request for a future on-chain action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voucher {
    /// Contract or account the action targets.
    pub destination: Address,
    /// Opaque call data.
    pub payload: Vec<u8>,
}

impl Voucher {
    /// Builds a voucher targeting `destination`.
    pub fn new(destination: Address, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            destination,
            payload: payload.into(),
        }
    }
}

/// Attested, non-actionable log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Opaque notice bytes.
    pub payload: Vec<u8>,
}

impl Notice {
    /// Builds a notice carrying `payload`.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Errors raised while decoding the payload of the pending request.
///
/// Decode failures are recoverable: the iteration is rejected and the loop
/// continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Hex text did not start with `0x`.
    #[error("{field} is not 0x-prefixed hex")]
    MissingHexPrefix {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Hex digits were malformed or truncated.
    #[error("{field} contains malformed hex: {source}")]
    Hex {
        /// Name of the offending field.
        field: &'static str,
        /// Underlying hex error.
        #[source]
        source: hex::FromHexError,
    },
    /// An address did not have the expected width.
    #[error("address must be {expected} bytes, got {actual}")]
    AddressWidth {
        /// Required width in bytes.
        expected: usize,
        /// Width received.
        actual: usize,
    },
    /// The request data did not match the expected structure.
    #[error("malformed {kind} request data: {source}")]
    Structure {
        /// Kind of request being decoded.
        kind: RequestKind,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// No request is pending, or it was already read this iteration.
    #[error("no pending request to read")]
    NoPendingRequest,
    /// The read did not match the classification of the pending request.
    #[error("pending request is {actual}, not {expected}")]
    KindMismatch {
        /// Kind the caller attempted to read.
        expected: RequestKind,
        /// Kind the node classified.
        actual: RequestKind,
    },
}

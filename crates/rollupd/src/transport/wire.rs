//! JSON bodies exchanged with the rollup node's HTTP API.
//!
//! Payloads and addresses travel as `0x`-prefixed hex strings. Request data is
//! kept as a raw [`serde_json::Value`] until the loop reads it, so malformed
//! data surfaces as a recoverable [`DecodeError`] rather than a negotiation
//! failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::{
    Address, Advance, AdvanceMetadata, DecodeError, Inspect, Notice, RequestKind, Verdict, Voucher,
    hex_bytes,
};

use super::TransportError;

const ADVANCE_STATE: &str = "advance_state";
const INSPECT_STATE: &str = "inspect_state";

#[derive(Debug, Serialize)]
pub(super) struct FinishBody {
    status: &'static str,
}

impl FinishBody {
    pub(super) fn new(verdict: Verdict) -> Self {
        Self {
            status: verdict.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FinishResponse {
    pub(super) request_type: String,
    #[serde(default)]
    pub(super) data: Value,
}

/// Maps the node's request type onto a [`RequestKind`].
pub(super) fn classify(request_type: &str) -> Result<RequestKind, TransportError> {
    match request_type {
        ADVANCE_STATE => Ok(RequestKind::Advance),
        INSPECT_STATE => Ok(RequestKind::Inspect),
        other => Err(TransportError::UnknownRequestType {
            request_type: other.to_owned(),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct AdvanceData {
    metadata: AdvanceMetadataData,
    payload: String,
}

#[derive(Debug, Deserialize)]
struct AdvanceMetadataData {
    msg_sender: String,
    #[serde(default)]
    epoch_index: u64,
    #[serde(default)]
    input_index: u64,
    #[serde(default)]
    block_number: u64,
    #[serde(default)]
    timestamp: u64,
}

#[derive(Debug, Deserialize)]
struct InspectData {
    payload: String,
}

/// Decodes the `data` object of an `advance_state` request.
pub(super) fn decode_advance(data: Value) -> Result<Advance, DecodeError> {
    let raw: AdvanceData =
        serde_json::from_value(data).map_err(|source| DecodeError::Structure {
            kind: RequestKind::Advance,
            source,
        })?;
    let sender: Address = raw.metadata.msg_sender.parse()?;
    let payload = hex_bytes::decode("payload", &raw.payload)?;
    Ok(Advance {
        sender,
        payload,
        metadata: AdvanceMetadata {
            epoch_index: raw.metadata.epoch_index,
            input_index: raw.metadata.input_index,
            block_number: raw.metadata.block_number,
            timestamp: raw.metadata.timestamp,
        },
    })
}

/// Decodes the `data` object of an `inspect_state` request.
pub(super) fn decode_inspect(data: Value) -> Result<Inspect, DecodeError> {
    let raw: InspectData =
        serde_json::from_value(data).map_err(|source| DecodeError::Structure {
            kind: RequestKind::Inspect,
            source,
        })?;
    let payload = hex_bytes::decode("payload", &raw.payload)?;
    Ok(Inspect { payload })
}

#[derive(Debug, Serialize)]
pub(super) struct VoucherBody {
    destination: String,
    payload: String,
}

impl From<&Voucher> for VoucherBody {
    fn from(voucher: &Voucher) -> Self {
        Self {
            destination: voucher.destination.to_string(),
            payload: hex_bytes::encode(&voucher.payload),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NoticeBody {
    payload: String,
}

impl From<&Notice> for NoticeBody {
    fn from(notice: &Notice) -> Self {
        Self {
            payload: hex_bytes::encode(&notice.payload),
        }
    }
}

/// Acknowledgement returned for an accepted output.
#[derive(Debug, Deserialize)]
pub(super) struct OutputIndex {
    pub(super) index: u64,
}

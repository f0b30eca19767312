//! `0x`-prefixed hexadecimal text used for payloads and addresses on the wire.

use super::DecodeError;

const PREFIX: &str = "0x";

/// Encodes bytes as lowercase `0x`-prefixed hex.
pub(crate) fn encode(bytes: &[u8]) -> String {
    format!("{PREFIX}{}", hex::encode(bytes))
}

/// Decodes `0x`-prefixed hex text into bytes.
///
/// `field` names the value being decoded so errors point at it.
pub(crate) fn decode(field: &'static str, text: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = text
        .strip_prefix(PREFIX)
        .or_else(|| text.strip_prefix("0X"))
        .ok_or(DecodeError::MissingHexPrefix { field })?;
    hex::decode(digits).map_err(|source| DecodeError::Hex { field, source })
}

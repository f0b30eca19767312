//! Fixed-width account identifiers.

use std::fmt;
use std::str::FromStr;

use super::DecodeError;
use super::hex_bytes;

/// Width of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account identifier used for senders and voucher destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Wraps raw address bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds an address from a slice, rejecting any other width.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| DecodeError::AddressWidth {
            expected: ADDRESS_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(raw))
    }

    /// Borrows the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&hex_bytes::encode(&self.0))
    }
}

impl FromStr for Address {
    type Err = DecodeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let bytes = hex_bytes::decode("address", input)?;
        Self::from_slice(&bytes)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

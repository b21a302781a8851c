use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Account identity (20 bytes, 40 hex chars).
///
/// Used for the contract owner, escrow senders, and recipients. The all-zero
/// address is a sentinel and never a valid counterparty.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Zero address — used as sentinel, rejected as a recipient.
    pub fn zero() -> Self {
        Self([0u8; 20])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AddressParseError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 40 {
            return Err(AddressParseError::InvalidLength(s.len()));
        }
        let raw = hex::decode(s).map_err(|_| AddressParseError::InvalidHex)?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::zero()
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(D::Error::custom)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("address must be 40 hex chars, got {0}")]
    InvalidLength(usize),
    #[error("address contains non-hex characters")]
    InvalidHex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let addr = Address::from_bytes([0xab; 20]);
        let parsed = Address::from_hex(&addr.to_hex()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn accepts_unprefixed_hex() {
        let addr = Address::from_hex("00000000000000000000000000000000000000ff").unwrap();
        assert_eq!(addr.0[19], 0xff);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Address::from_hex("0xabcd"),
            Err(AddressParseError::InvalidLength(4))
        );
        assert_eq!(
            Address::from_hex(&"zz".repeat(20)),
            Err(AddressParseError::InvalidHex)
        );
    }

    #[test]
    fn zero_sentinel() {
        assert!(Address::zero().is_zero());
        assert!(!Address::from_bytes([1; 20]).is_zero());
        assert_eq!(Address::default(), Address::zero());
    }

    #[test]
    fn serde_as_hex_string() {
        let addr = Address::from_bytes([0x11; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}

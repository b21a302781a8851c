use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Fixed-width digest (BLAKE3, 32 bytes).
///
/// Used for hashed secrets and for the derived escrow key. The all-zero
/// digest is a sentinel: it marks "no secret" and is rejected on input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Compute the BLAKE3 hash of arbitrary data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Zero digest — used as sentinel.
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, DigestParseError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return Err(DigestParseError::InvalidLength(s.len()));
        }
        let raw = hex::decode(s).map_err(|_| DigestParseError::InvalidHex)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}..)", &self.to_hex()[..14])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Digest {
    fn default() -> Self {
        Self::zero()
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(D::Error::custom)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DigestParseError {
    #[error("digest must be 64 hex chars, got {0}")]
    InvalidLength(usize),
    #[error("digest contains non-hex characters")]
    InvalidHex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        let a = Digest::hash(b"open sesame");
        let b = Digest::hash(b"open sesame");
        assert_eq!(a, b);
        assert_ne!(a, Digest::hash(b"open please"));
    }

    #[test]
    fn hex_round_trip() {
        let digest = Digest::hash(b"secret");
        let parsed = Digest::from_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Digest::from_hex("0x1234"),
            Err(DigestParseError::InvalidLength(4))
        );
        assert_eq!(
            Digest::from_hex(&"gg".repeat(32)),
            Err(DigestParseError::InvalidHex)
        );
    }

    #[test]
    fn zero_sentinel() {
        assert!(Digest::zero().is_zero());
        assert!(!Digest::hash(b"x").is_zero());
    }
}

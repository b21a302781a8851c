use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;
use crate::digest::Digest;

/// Lookup key for an escrow record: `blake3(recipient ‖ hashed_secret)`.
///
/// The key is the capability. It is never stored independently — always
/// recomputed from the pair via [`escrow_key`] — so a claimant who supplies
/// the right secret but is not the embedded recipient derives a different
/// key and finds nothing.
pub type EscrowKey = Digest;

/// Derive the addressable hash for `(recipient, hashed_secret)`.
pub fn escrow_key(recipient: &Address, hashed_secret: &Digest) -> EscrowKey {
    let mut hasher = blake3::Hasher::new();
    hasher.update(recipient.as_bytes());
    hasher.update(hashed_secret.as_bytes());
    Digest(*hasher.finalize().as_bytes())
}

/// One escrow deposit, net of fee.
///
/// The all-zero record (`Default`) is the canonical "no escrow" value:
/// lookups of absent keys return it, and deletion zeroes the slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    pub sender: Address,
    pub recipient: Address,
    /// Deposited value minus the fee taken at deposit time.
    pub amount: Amount,
    /// Absolute height after which the sender may reclaim; 0 means no deadline.
    pub deadline_block: Amount,
}

impl EscrowRecord {
    pub fn is_zero(&self) -> bool {
        *self == EscrowRecord::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_binds_recipient_and_secret() {
        let alice = Address::from_bytes([1; 20]);
        let carol = Address::from_bytes([2; 20]);
        let secret = Digest::hash(b"password");

        let key = escrow_key(&carol, &secret);
        assert_eq!(key, escrow_key(&carol, &secret));
        assert_ne!(key, escrow_key(&alice, &secret));
        assert_ne!(key, escrow_key(&carol, &Digest::hash(b"other")));
    }

    #[test]
    fn default_record_is_zero() {
        assert!(EscrowRecord::default().is_zero());

        let record = EscrowRecord {
            sender: Address::from_bytes([1; 20]),
            recipient: Address::from_bytes([2; 20]),
            amount: 990,
            deadline_block: 0,
        };
        assert!(!record.is_zero());
    }
}

//! Core type definitions for the hawala remittance ledger.
//!
//! This crate provides the shared primitives every other hawala crate builds
//! on: fixed-width identities and digests, the checked `Amount` arithmetic
//! helpers, and the escrow record keyed by its derived addressable hash.

pub mod address;
pub mod amount;
pub mod digest;
pub mod escrow;

// Re-export primary types at crate root for ergonomic use.
pub use address::{Address, AddressParseError};
pub use amount::{checked_add, checked_sub, Amount, AmountOverflow};
pub use digest::{Digest, DigestParseError};
pub use escrow::{escrow_key, EscrowKey, EscrowRecord};

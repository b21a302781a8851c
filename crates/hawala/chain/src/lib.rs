//! # hawala-chain
//!
//! Single-contract in-memory chain emulation for exercising the hawala
//! remittance contract the way its original suite did: account balances,
//! a block-height counter, atomic call execution with all-or-nothing
//! rollback, and an append-only event log with fixed-width topics.
//!
//! The chain is the boundary layer the contract was designed for: it
//! supplies the call context (caller, attached value, height), applies the
//! transfers each receipt requests, and serializes emitted events into
//! [`LogEntry`] records.

pub mod chain;
pub mod log;

pub use chain::{Chain, ChainError, ContractCall};
pub use log::LogEntry;

//! # hawala-contract
//!
//! The remittance escrow state machine:
//!
//! - **Lifecycle** — an explicit phase enum (`Active → Paused → Killed →
//!   Withdrawn`) with a transition table; kill and withdrawal are one-way.
//! - **Escrow ledger** — commit-reveal deposits keyed by
//!   `blake3(recipient ‖ hashed_secret)`, absolute per-deposit fee into an
//!   owner-claimable commission, deadline-based sender reclaim.
//! - **Events** — every successful operation returns the events it emitted
//!   paired with the outbound transfers, so the boundary layer can apply
//!   value movement and serialize logs however its environment requires.
//!
//! The contract executes as a sequential state machine: operations are
//! atomic, and a returned error guarantees no state was mutated and no
//! event was emitted.

pub mod contract;
pub mod error;
pub mod event;
pub mod lifecycle;

pub use contract::{CallContext, DepositPolicy, Receipt, RemitContract, Transfer};
pub use error::ContractError;
pub use event::{address_topic, bool_topic, ContractEvent};
pub use lifecycle::Phase;

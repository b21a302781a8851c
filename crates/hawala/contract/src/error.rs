use thiserror::Error;

use hawala_types::{Amount, AmountOverflow, EscrowKey};

/// Typed failures of the remittance contract.
///
/// Every failure is synchronous and all-or-nothing: when an operation
/// returns an error, no state was mutated and no event was emitted. None of
/// these are retryable by the contract itself; the caller resubmits with
/// corrected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    // --- Access control ---
    #[error("caller is not the contract owner")]
    Unauthorized,

    // --- Lifecycle gating ---
    #[error("operation rejected: contract is paused")]
    ContractPaused,

    #[error("operation rejected: contract has been killed")]
    ContractKilled,

    #[error("kill requires the contract to be paused first")]
    RequiresPaused,

    #[error("emergency withdrawal requires the contract to be killed first")]
    RequiresKilled,

    #[error("contract has already been killed")]
    AlreadyKilled,

    #[error("emergency withdrawal has already been performed")]
    AlreadyWithdrawn,

    #[error("state change is a no-op: value already set")]
    NoOp,

    // --- Escrow validation ---
    #[error("invalid recipient")]
    InvalidRecipient,

    #[error("hashed secret must not be the zero digest")]
    InvalidSecret,

    #[error("deposited value must be greater than zero")]
    InvalidAmount,

    #[error("deposited value {value} does not exceed the escrow fee {fee}")]
    InsufficientAmount { value: Amount, fee: Amount },

    #[error("escrow already exists at key {0}")]
    EscrowAlreadyExists(EscrowKey),

    #[error("no escrow record at key {0}")]
    NoSuchEscrow(EscrowKey),

    // --- Reclaim ---
    #[error("escrow has no deadline; it can only be remitted")]
    NoDeadlineSet,

    #[error("deadline not reached: current height {height}, deadline {deadline}")]
    DeadlineNotReached { height: Amount, deadline: Amount },

    // --- Value movement ---
    #[error("value transfer could not be completed")]
    TransferFailed,

    #[error("operation does not accept attached value")]
    ValueNotAccepted,

    #[error(transparent)]
    AmountOverflow(#[from] AmountOverflow),
}

#[cfg(test)]
mod tests {
    use super::*;
    use hawala_types::Digest;

    #[test]
    fn display_carries_offending_values() {
        let err = ContractError::InsufficientAmount { value: 9, fee: 10 };
        let s = err.to_string();
        assert!(s.contains('9'));
        assert!(s.contains("10"));

        let err = ContractError::DeadlineNotReached {
            height: 5,
            deadline: 8,
        };
        assert!(err.to_string().contains('8'));
    }

    #[test]
    fn no_such_escrow_names_the_key() {
        let key = Digest::hash(b"missing");
        let err = ContractError::NoSuchEscrow(key);
        assert!(err.to_string().contains(&key.to_hex()));
    }

    #[test]
    fn overflow_converts_transparently() {
        let err: ContractError = AmountOverflow.into();
        assert_eq!(err, ContractError::AmountOverflow(AmountOverflow));
    }
}

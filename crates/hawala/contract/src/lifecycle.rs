//! Contract lifecycle as an explicit phase machine.
//!
//! The original three booleans (`paused`, `killed`, `withdrawn`) admit
//! combinations that must never exist, such as withdrawn-but-not-killed.
//! A single phase enum with a transition table makes those unrepresentable:
//! kill is only reachable from `Paused`, withdrawal only from `Killed`, and
//! both are one-way.

use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// Operational phase of the contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Normal operation; mutating calls are allowed.
    #[default]
    Active,
    /// Mutating calls are rejected; reversible.
    Paused,
    /// Permanently shut down; only emergency withdrawal remains.
    Killed,
    /// Held balance has been swept after kill. Terminal.
    Withdrawn,
}

impl Phase {
    /// `setPaused` transition. No-op transitions are rejected, not ignored.
    pub fn set_paused(self, paused: bool) -> Result<Phase, ContractError> {
        match (self, paused) {
            (Phase::Active, true) => Ok(Phase::Paused),
            (Phase::Paused, false) => Ok(Phase::Active),
            (Phase::Active, false) | (Phase::Paused, true) => Err(ContractError::NoOp),
            (Phase::Killed | Phase::Withdrawn, _) => Err(ContractError::ContractKilled),
        }
    }

    /// `kill` transition: only permitted while paused, and only once.
    pub fn kill(self) -> Result<Phase, ContractError> {
        match self {
            Phase::Paused => Ok(Phase::Killed),
            Phase::Active => Err(ContractError::RequiresPaused),
            Phase::Killed | Phase::Withdrawn => Err(ContractError::AlreadyKilled),
        }
    }

    /// Emergency-withdrawal transition: only after kill, and only once.
    pub fn mark_withdrawn(self) -> Result<Phase, ContractError> {
        match self {
            Phase::Killed => Ok(Phase::Withdrawn),
            Phase::Active | Phase::Paused => Err(ContractError::RequiresKilled),
            Phase::Withdrawn => Err(ContractError::AlreadyWithdrawn),
        }
    }

    /// Gate for operations tagged "requires unpaused, requires alive".
    pub fn require_open(self) -> Result<(), ContractError> {
        match self {
            Phase::Active => Ok(()),
            Phase::Paused => Err(ContractError::ContractPaused),
            Phase::Killed | Phase::Withdrawn => Err(ContractError::ContractKilled),
        }
    }

    pub fn is_paused(self) -> bool {
        self == Phase::Paused
    }

    pub fn is_killed(self) -> bool {
        matches!(self, Phase::Killed | Phase::Withdrawn)
    }

    pub fn is_withdrawn(self) -> bool {
        self == Phase::Withdrawn
    }
}

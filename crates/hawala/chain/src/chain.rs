//! In-memory chain used for tests, local demos, and embedding.
//!
//! One contract, a flat account-balance map, and a height counter. Every
//! external call is serialized through a single lock covering the whole
//! operation, matching the execution model the contract assumes: one call
//! fully completes — value transfer, state mutation, event emission —
//! before the next begins. A failed call restores the pre-call snapshot
//! wholesale, so partial state changes are never observable.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

use hawala_contract::{
    CallContext, ContractError, DepositPolicy, Receipt, RemitContract,
};
use hawala_types::{checked_add, checked_sub, Address, Amount, Digest, EscrowKey, EscrowRecord};

use crate::log::LogEntry;

/// External operation dispatched into the deployed contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractCall {
    SetPaused(bool),
    Kill,
    EmergencyWithdrawal,
    SetEscrowFee(Amount),
    Escrow {
        recipient: Address,
        hashed_secret: Digest,
        deadline_offset: Amount,
    },
    Remitt {
        hashed_secret: Digest,
    },
    Claim {
        recipient: Address,
        hashed_secret: Digest,
    },
    WithdrawCommission,
}

impl ContractCall {
    fn name(&self) -> &'static str {
        match self {
            ContractCall::SetPaused(_) => "setPaused",
            ContractCall::Kill => "kill",
            ContractCall::EmergencyWithdrawal => "emergencyWithdrawal",
            ContractCall::SetEscrowFee(_) => "setEscrowFee",
            ContractCall::Escrow { .. } => "escrow",
            ContractCall::Remitt { .. } => "remitt",
            ContractCall::Claim { .. } => "claim",
            ContractCall::WithdrawCommission => "withdrawCommission",
        }
    }
}

/// Failures surfaced by the chain boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("account {account} has insufficient funds: needs {needed}, holds {available}")]
    InsufficientFunds {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("chain state lock poisoned")]
    LockPoisoned,
}

struct ChainState {
    height: Amount,
    accounts: HashMap<Address, Amount>,
    contract: RemitContract,
    contract_balance: Amount,
    log: Vec<LogEntry>,
}

/// Single-contract chain emulation.
pub struct Chain {
    inner: RwLock<ChainState>,
}

impl Chain {
    /// Deploy a fresh contract at height 0 with the default deposit policy.
    pub fn deploy(owner: Address, escrow_fee: Amount) -> Self {
        Self::deploy_with_policy(owner, escrow_fee, DepositPolicy::default())
    }

    pub fn deploy_with_policy(owner: Address, escrow_fee: Amount, policy: DepositPolicy) -> Self {
        Self {
            inner: RwLock::new(ChainState {
                height: 0,
                accounts: HashMap::new(),
                contract: RemitContract::with_policy(owner, escrow_fee, policy),
                contract_balance: 0,
                log: Vec::new(),
            }),
        }
    }

    /// Mint funds into an account (test setup, the faucet's job).
    pub fn fund(&self, account: Address, amount: Amount) -> Result<(), ChainError> {
        let mut state = self.write()?;
        let balance = state.accounts.entry(account).or_insert(0);
        *balance = checked_add(*balance, amount).map_err(ContractError::from)?;
        Ok(())
    }

    /// Seed the contract address itself with a balance, as the original
    /// suite did by sending to the not-yet-deployed address.
    pub fn fund_contract(&self, amount: Amount) -> Result<(), ChainError> {
        let mut state = self.write()?;
        state.contract_balance =
            checked_add(state.contract_balance, amount).map_err(ContractError::from)?;
        Ok(())
    }

    /// Advance the height without executing anything.
    pub fn advance_blocks(&self, blocks: Amount) -> Result<Amount, ChainError> {
        let mut state = self.write()?;
        state.height = checked_add(state.height, blocks).map_err(ContractError::from)?;
        Ok(state.height)
    }

    // --- Queries ---

    pub fn height(&self) -> Result<Amount, ChainError> {
        Ok(self.read()?.height)
    }

    pub fn balance_of(&self, account: Address) -> Result<Amount, ChainError> {
        Ok(self.read()?.accounts.get(&account).copied().unwrap_or(0))
    }

    pub fn contract_balance(&self) -> Result<Amount, ChainError> {
        Ok(self.read()?.contract_balance)
    }

    pub fn logs(&self) -> Result<Vec<LogEntry>, ChainError> {
        Ok(self.read()?.log.clone())
    }

    pub fn owner(&self) -> Result<Address, ChainError> {
        Ok(self.read()?.contract.owner())
    }

    pub fn paused(&self) -> Result<bool, ChainError> {
        Ok(self.read()?.contract.paused())
    }

    pub fn killed(&self) -> Result<bool, ChainError> {
        Ok(self.read()?.contract.killed())
    }

    pub fn is_withdrawn(&self) -> Result<bool, ChainError> {
        Ok(self.read()?.contract.is_withdrawn())
    }

    pub fn escrow_fee(&self) -> Result<Amount, ChainError> {
        Ok(self.read()?.contract.escrow_fee())
    }

    pub fn commission(&self) -> Result<Amount, ChainError> {
        Ok(self.read()?.contract.commission())
    }

    pub fn remittance(&self, key: &EscrowKey) -> Result<EscrowRecord, ChainError> {
        Ok(self.read()?.contract.remittance(key))
    }

    pub fn live_escrow_total(&self) -> Result<Amount, ChainError> {
        Ok(self.read()?.contract.live_escrow_total())
    }

    // --- Execution ---

    /// Execute one call with attached value. The call mines its own block;
    /// a call that fails inside the contract still consumes a block, while
    /// a call its sender cannot fund is never included at all.
    pub fn call(
        &self,
        caller: Address,
        value: Amount,
        call: ContractCall,
    ) -> Result<Vec<LogEntry>, ChainError> {
        let mut state = self.write()?;

        let available = state.accounts.get(&caller).copied().unwrap_or(0);
        if available < value {
            return Err(ChainError::InsufficientFunds {
                account: caller,
                needed: value,
                available,
            });
        }

        state.height = checked_add(state.height, 1).map_err(ContractError::from)?;
        let height = state.height;

        let snapshot = (
            state.contract.clone(),
            state.accounts.clone(),
            state.contract_balance,
        );

        let outcome = Self::execute(&mut state, caller, value, &call, height);
        match outcome {
            Ok(entries) => {
                debug!(op = call.name(), caller = %caller, value, height, "call succeeded");
                Ok(entries)
            }
            Err(err) => {
                // All-or-nothing: restore the pre-call state wholesale.
                state.contract = snapshot.0;
                state.accounts = snapshot.1;
                state.contract_balance = snapshot.2;
                debug!(op = call.name(), caller = %caller, value, height, %err, "call reverted");
                Err(err)
            }
        }
    }

    fn execute(
        state: &mut ChainState,
        caller: Address,
        value: Amount,
        call: &ContractCall,
        height: Amount,
    ) -> Result<Vec<LogEntry>, ChainError> {
        // Move the attached value into the contract before dispatch.
        let balance = state.accounts.entry(caller).or_insert(0);
        *balance = checked_sub(*balance, value).map_err(ContractError::from)?;
        state.contract_balance =
            checked_add(state.contract_balance, value).map_err(ContractError::from)?;

        let ctx = CallContext {
            caller,
            value,
            height,
        };
        let contract_balance = state.contract_balance;
        let receipt = Self::dispatch(&mut state.contract, &ctx, call, contract_balance)?;

        Self::apply_transfers(state, &receipt)?;

        let entries: Vec<LogEntry> = receipt
            .events
            .into_iter()
            .map(|event| LogEntry::from_event(height, event))
            .collect();
        state.log.extend(entries.iter().cloned());
        Ok(entries)
    }

    fn dispatch(
        contract: &mut RemitContract,
        ctx: &CallContext,
        call: &ContractCall,
        contract_balance: Amount,
    ) -> Result<Receipt, ContractError> {
        match *call {
            ContractCall::SetPaused(paused) => contract.set_paused(ctx, paused),
            ContractCall::Kill => contract.kill(ctx),
            ContractCall::EmergencyWithdrawal => {
                contract.emergency_withdrawal(ctx, contract_balance)
            }
            ContractCall::SetEscrowFee(new_fee) => contract.set_escrow_fee(ctx, new_fee),
            ContractCall::Escrow {
                recipient,
                hashed_secret,
                deadline_offset,
            } => contract.escrow(ctx, recipient, hashed_secret, deadline_offset),
            ContractCall::Remitt { hashed_secret } => contract.remitt(ctx, hashed_secret),
            ContractCall::Claim {
                recipient,
                hashed_secret,
            } => contract.claim(ctx, recipient, hashed_secret),
            ContractCall::WithdrawCommission => contract.withdraw_commission(ctx),
        }
    }

    fn apply_transfers(state: &mut ChainState, receipt: &Receipt) -> Result<(), ChainError> {
        for transfer in &receipt.transfers {
            if state.contract_balance < transfer.amount {
                return Err(ContractError::TransferFailed.into());
            }
            let credited = state
                .accounts
                .get(&transfer.to)
                .copied()
                .unwrap_or(0)
                .checked_add(transfer.amount)
                .ok_or(ContractError::TransferFailed)?;
            state.contract_balance -= transfer.amount;
            state.accounts.insert(transfer.to, credited);
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, ChainState>, ChainError> {
        self.inner.read().map_err(|_| ChainError::LockPoisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, ChainState>, ChainError> {
        self.inner.write().map_err(|_| ChainError::LockPoisoned)
    }
}

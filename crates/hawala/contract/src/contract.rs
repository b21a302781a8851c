//! The remittance contract aggregate.
//!
//! `RemitContract` owns every piece of contract state — owner identity,
//! lifecycle phase, fee configuration, accumulated commission, and the
//! escrow map — and exposes one method per external operation. Each
//! operation validates fully before mutating anything, so a returned error
//! guarantees the state is untouched. Successful operations return a
//! [`Receipt`] pairing the emitted events with the outbound value
//! transfers; the execution environment applies the transfers and
//! serializes the events.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use hawala_types::{
    checked_add, checked_sub, escrow_key, Address, Amount, Digest, EscrowKey, EscrowRecord,
};

use crate::error::ContractError;
use crate::event::ContractEvent;
use crate::lifecycle::Phase;

/// Per-call environment: who is calling, how much value is attached, and
/// the height of the block including the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    pub value: Amount,
    pub height: Amount,
}

impl CallContext {
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: 0,
            height: 0,
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }

    pub fn at_height(mut self, height: Amount) -> Self {
        self.height = height;
        self
    }
}

/// What to do when a deposit lands on a key that already holds an escrow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositPolicy {
    /// Reject the second deposit (`EscrowAlreadyExists`). Primary policy.
    #[default]
    Reject,
    /// Add the net amount to the stored record. Legacy behavior kept for
    /// the older observed contract; fee is charged again, the parties and
    /// deadline stay as first stored.
    TopUp,
}

/// Value leaving the contract as part of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub to: Address,
    pub amount: Amount,
}

/// Result of a successful operation: events emitted plus transfers for the
/// environment to apply. Transfer failure aborts the whole operation; the
/// environment must then discard the state change wholesale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub events: Vec<ContractEvent>,
    pub transfers: Vec<Transfer>,
}

impl Receipt {
    fn event(event: ContractEvent) -> Self {
        Self {
            events: vec![event],
            transfers: Vec::new(),
        }
    }

    fn with_transfer(mut self, to: Address, amount: Amount) -> Self {
        self.transfers.push(Transfer { to, amount });
        self
    }
}

/// The commit-reveal remittance engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemitContract {
    owner: Address,
    phase: Phase,
    deposit_policy: DepositPolicy,
    escrow_fee: Amount,
    commission: Amount,
    remittances: HashMap<EscrowKey, EscrowRecord>,
}

impl RemitContract {
    /// Deploy with the fee fixed at construction, as the original did.
    pub fn new(owner: Address, escrow_fee: Amount) -> Self {
        Self::with_policy(owner, escrow_fee, DepositPolicy::default())
    }

    pub fn with_policy(owner: Address, escrow_fee: Amount, policy: DepositPolicy) -> Self {
        Self {
            owner,
            phase: Phase::Active,
            deposit_policy: policy,
            escrow_fee,
            commission: 0,
            remittances: HashMap::new(),
        }
    }

    // --- Read-only queries ---

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.phase.is_paused()
    }

    pub fn killed(&self) -> bool {
        self.phase.is_killed()
    }

    pub fn is_withdrawn(&self) -> bool {
        self.phase.is_withdrawn()
    }

    pub fn escrow_fee(&self) -> Amount {
        self.escrow_fee
    }

    pub fn commission(&self) -> Amount {
        self.commission
    }

    /// Record readback; absent keys yield the zero record.
    pub fn remittance(&self, key: &EscrowKey) -> EscrowRecord {
        self.remittances.get(key).copied().unwrap_or_default()
    }

    /// Sum of all live escrow amounts. Conservation:
    /// `contract balance == live_escrow_total + commission` when the
    /// contract has not been pre-funded or emergency-withdrawn.
    pub fn live_escrow_total(&self) -> Amount {
        self.remittances.values().map(|r| r.amount).sum()
    }

    // --- Administrative operations ---

    /// Flip the pause switch. Owner only; same-value transitions fail.
    pub fn set_paused(
        &mut self,
        ctx: &CallContext,
        paused: bool,
    ) -> Result<Receipt, ContractError> {
        require_no_value(ctx)?;
        self.require_owner(ctx.caller)?;
        self.phase = self.phase.set_paused(paused)?;
        Ok(Receipt::event(ContractEvent::LogSetPaused {
            who: ctx.caller,
            paused,
        }))
    }

    /// Irreversibly shut down. Owner only, and only while paused.
    pub fn kill(&mut self, ctx: &CallContext) -> Result<Receipt, ContractError> {
        require_no_value(ctx)?;
        self.require_owner(ctx.caller)?;
        self.phase = self.phase.kill()?;
        Ok(Receipt::event(ContractEvent::LogKill { who: ctx.caller }))
    }

    /// Sweep the entire held balance to the owner after kill. One shot.
    pub fn emergency_withdrawal(
        &mut self,
        ctx: &CallContext,
        contract_balance: Amount,
    ) -> Result<Receipt, ContractError> {
        require_no_value(ctx)?;
        self.require_owner(ctx.caller)?;
        self.phase = self.phase.mark_withdrawn()?;
        Ok(
            Receipt::event(ContractEvent::LogEmergencyWithdrawal { who: ctx.caller })
                .with_transfer(ctx.caller, contract_balance),
        )
    }

    /// Change the per-deposit fee. Owner only, open contract only.
    pub fn set_escrow_fee(
        &mut self,
        ctx: &CallContext,
        new_fee: Amount,
    ) -> Result<Receipt, ContractError> {
        require_no_value(ctx)?;
        self.phase.require_open()?;
        self.require_owner(ctx.caller)?;
        self.escrow_fee = new_fee;
        Ok(Receipt::event(ContractEvent::LogSetEscrowFee {
            who: ctx.caller,
            escrow_fee: new_fee,
        }))
    }

    // --- Escrow operations ---

    /// Deposit attached value under `blake3(recipient ‖ hashed_secret)`.
    ///
    /// The fee is absolute, charged once per deposit, and must be strictly
    /// less than the deposited value. A non-zero `deadline_offset` is
    /// resolved to an absolute height exactly once, here.
    pub fn escrow(
        &mut self,
        ctx: &CallContext,
        recipient: Address,
        hashed_secret: Digest,
        deadline_offset: Amount,
    ) -> Result<Receipt, ContractError> {
        self.phase.require_open()?;
        if recipient.is_zero() || recipient == ctx.caller {
            return Err(ContractError::InvalidRecipient);
        }
        if hashed_secret.is_zero() {
            return Err(ContractError::InvalidSecret);
        }
        if ctx.value == 0 {
            return Err(ContractError::InvalidAmount);
        }

        let key = escrow_key(&recipient, &hashed_secret);
        let existing = self.remittances.get(&key).copied();
        if existing.is_some() && self.deposit_policy == DepositPolicy::Reject {
            return Err(ContractError::EscrowAlreadyExists(key));
        }

        if ctx.value <= self.escrow_fee {
            return Err(ContractError::InsufficientAmount {
                value: ctx.value,
                fee: self.escrow_fee,
            });
        }
        let net_amount = checked_sub(ctx.value, self.escrow_fee)?;

        // All fallible arithmetic happens before any state is touched.
        let record = match existing {
            // Legacy top-up: parties and deadline stay as first stored.
            Some(mut record) => {
                record.amount = checked_add(record.amount, net_amount)?;
                record
            }
            None => {
                let deadline_block = if deadline_offset == 0 {
                    0
                } else {
                    checked_add(ctx.height, deadline_offset)?
                };
                EscrowRecord {
                    sender: ctx.caller,
                    recipient,
                    amount: net_amount,
                    deadline_block,
                }
            }
        };
        let commission = checked_add(self.commission, self.escrow_fee)?;

        let deadline_block = record.deadline_block;
        self.remittances.insert(key, record);
        self.commission = commission;

        Ok(Receipt::event(ContractEvent::LogEscrow {
            sender: ctx.caller,
            recipient,
            addressable_hash: key,
            hashed_password: hashed_secret,
            deadline_block,
            amount: ctx.value,
        }))
    }

    /// Recipient claim by secret reveal.
    ///
    /// The key embeds the caller as recipient, so a third party holding the
    /// correct secret derives a different key and finds no record. No
    /// explicit access check is needed — the key is the capability.
    pub fn remitt(
        &mut self,
        ctx: &CallContext,
        hashed_secret: Digest,
    ) -> Result<Receipt, ContractError> {
        require_no_value(ctx)?;
        self.phase.require_open()?;
        if hashed_secret.is_zero() {
            return Err(ContractError::InvalidSecret);
        }

        let key = escrow_key(&ctx.caller, &hashed_secret);
        let record = self
            .remittances
            .remove(&key)
            .ok_or(ContractError::NoSuchEscrow(key))?;

        Ok(Receipt::event(ContractEvent::LogRemitt {
            recipient: ctx.caller,
            hashed_password: hashed_secret,
            amount: record.amount,
        })
        .with_transfer(ctx.caller, record.amount))
    }

    /// Sender reclaim once the deadline has passed.
    pub fn claim(
        &mut self,
        ctx: &CallContext,
        recipient: Address,
        hashed_secret: Digest,
    ) -> Result<Receipt, ContractError> {
        require_no_value(ctx)?;
        self.phase.require_open()?;

        let key = escrow_key(&recipient, &hashed_secret);
        let record = self.remittance(&key);
        if record.is_zero() || record.sender != ctx.caller {
            return Err(ContractError::NoSuchEscrow(key));
        }
        if record.deadline_block == 0 {
            return Err(ContractError::NoDeadlineSet);
        }
        if ctx.height < record.deadline_block {
            return Err(ContractError::DeadlineNotReached {
                height: ctx.height,
                deadline: record.deadline_block,
            });
        }

        self.remittances.remove(&key);

        Ok(Receipt::event(ContractEvent::LogClaim {
            sender: ctx.caller,
            recipient,
            hashed_password: hashed_secret,
            amount: record.amount,
        })
        .with_transfer(ctx.caller, record.amount))
    }

    /// Pay the accumulated commission out to the owner.
    pub fn withdraw_commission(&mut self, ctx: &CallContext) -> Result<Receipt, ContractError> {
        require_no_value(ctx)?;
        self.phase.require_open()?;
        self.require_owner(ctx.caller)?;

        let withdrawn = self.commission;
        self.commission = 0;

        Ok(Receipt::event(ContractEvent::LogWithdrawCommission {
            who: ctx.caller,
            commission_balance: withdrawn,
        })
        .with_transfer(ctx.caller, withdrawn))
    }

    fn require_owner(&self, caller: Address) -> Result<(), ContractError> {
        if caller != self.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }
}

fn require_no_value(ctx: &CallContext) -> Result<(), ContractError> {
    if ctx.value != 0 {
        return Err(ContractError::ValueNotAccepted);
    }
    Ok(())
}

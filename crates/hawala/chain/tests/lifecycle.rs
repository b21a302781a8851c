//! Kill and emergency-withdrawal scenarios: the two-step irreversible
//! shutdown, owner gating, and the full-balance sweep.

use hawala_chain::{Chain, ChainError, ContractCall};
use hawala_contract::{address_topic, ContractError, ContractEvent};
use hawala_types::{Address, Amount};

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

fn owner() -> Address {
    addr(0x01)
}

fn bob() -> Address {
    addr(0x02)
}

fn deployed() -> Chain {
    Chain::deploy(owner(), 0)
}

fn paused_chain() -> Chain {
    let chain = deployed();
    chain
        .call(owner(), 0, ContractCall::SetPaused(true))
        .unwrap();
    chain
}

#[test]
fn initialized_as_unkilled() {
    let chain = deployed();
    assert!(!chain.killed().unwrap());
    assert!(!chain.is_withdrawn().unwrap());
}

#[test]
fn cannot_kill_an_unpaused_contract() {
    let chain = deployed();
    let err = chain.call(owner(), 0, ContractCall::Kill).unwrap_err();
    assert_eq!(err, ChainError::Contract(ContractError::RequiresPaused));
    assert!(!chain.killed().unwrap());
}

#[test]
fn non_owner_cannot_kill_a_paused_contract() {
    let chain = paused_chain();
    let err = chain.call(bob(), 0, ContractCall::Kill).unwrap_err();
    assert_eq!(err, ChainError::Contract(ContractError::Unauthorized));
}

#[test]
fn cannot_withdraw_from_an_unkilled_contract() {
    let chain = paused_chain();
    let err = chain
        .call(owner(), 0, ContractCall::EmergencyWithdrawal)
        .unwrap_err();
    assert_eq!(err, ChainError::Contract(ContractError::RequiresKilled));
}

#[test]
fn owner_can_kill_a_paused_contract() {
    let chain = paused_chain();
    let entries = chain.call(owner(), 0, ContractCall::Kill).unwrap();

    assert_eq!(entries.len(), 1, "should have received 1 event");
    assert_eq!(entries[0].event, ContractEvent::LogKill { who: owner() });
    // who is indexed.
    assert_eq!(entries[0].topics.len(), 2, "should have 2 topics");
    assert_eq!(entries[0].topics[1], address_topic(&owner()));

    assert!(chain.killed().unwrap());
}

#[test]
fn kill_is_rejected_the_second_time() {
    let chain = paused_chain();
    chain.call(owner(), 0, ContractCall::Kill).unwrap();

    let err = chain.call(owner(), 0, ContractCall::Kill).unwrap_err();
    assert_eq!(err, ChainError::Contract(ContractError::AlreadyKilled));
}

// Withdraw scenarios run against a contract whose address already holds a
// balance, so the sweep has something to move.

const EXISTING_BALANCE: Amount = 54_321;

fn killed_chain_with_balance() -> Chain {
    let chain = deployed();
    chain.fund_contract(EXISTING_BALANCE).unwrap();
    chain
        .call(owner(), 0, ContractCall::SetPaused(true))
        .unwrap();
    chain.call(owner(), 0, ContractCall::Kill).unwrap();
    chain
}

#[test]
fn emergency_withdrawal_sweeps_the_entire_balance() {
    let chain = killed_chain_with_balance();
    assert_eq!(chain.contract_balance().unwrap(), EXISTING_BALANCE);

    let entries = chain
        .call(owner(), 0, ContractCall::EmergencyWithdrawal)
        .unwrap();
    assert_eq!(entries.len(), 1, "should have received 1 event");
    assert_eq!(
        entries[0].event,
        ContractEvent::LogEmergencyWithdrawal { who: owner() }
    );
    assert_eq!(entries[0].topics.len(), 2, "should have 2 topics");
    assert_eq!(entries[0].topics[1], address_topic(&owner()));

    assert_eq!(chain.contract_balance().unwrap(), 0);
    assert_eq!(chain.balance_of(owner()).unwrap(), EXISTING_BALANCE);
    assert!(chain.is_withdrawn().unwrap());
}

#[test]
fn non_owner_cannot_emergency_withdraw() {
    let chain = killed_chain_with_balance();
    let err = chain
        .call(bob(), 0, ContractCall::EmergencyWithdrawal)
        .unwrap_err();
    assert_eq!(err, ChainError::Contract(ContractError::Unauthorized));
    assert_eq!(chain.contract_balance().unwrap(), EXISTING_BALANCE);
}

#[test]
fn emergency_withdrawal_works_exactly_once() {
    let chain = killed_chain_with_balance();
    chain
        .call(owner(), 0, ContractCall::EmergencyWithdrawal)
        .unwrap();

    let err = chain
        .call(owner(), 0, ContractCall::EmergencyWithdrawal)
        .unwrap_err();
    assert_eq!(err, ChainError::Contract(ContractError::AlreadyWithdrawn));
    assert_eq!(chain.balance_of(owner()).unwrap(), EXISTING_BALANCE);
}

#[test]
fn killed_contract_cannot_be_unpaused() {
    let chain = paused_chain();
    chain.call(owner(), 0, ContractCall::Kill).unwrap();

    let err = chain
        .call(owner(), 0, ContractCall::SetPaused(false))
        .unwrap_err();
    assert_eq!(err, ChainError::Contract(ContractError::ContractKilled));
}

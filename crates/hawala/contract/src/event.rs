//! Domain events emitted by contract operations.
//!
//! Events are the durable external contract: every successful mutating
//! operation returns the events it emitted, paired with the state change,
//! and the boundary layer serializes them into log entries. Indexed fields
//! become fixed-width topics; the field tables below match the original
//! log shapes exactly.

use serde::{Deserialize, Serialize};

use hawala_types::{Address, Amount, Digest, EscrowKey};

/// One emitted event, with every field in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ContractEvent {
    /// Pause switch flipped. `who` and `paused` indexed.
    LogSetPaused { who: Address, paused: bool },
    /// Contract killed. `who` indexed.
    LogKill { who: Address },
    /// Entire held balance swept after kill. `who` indexed.
    LogEmergencyWithdrawal { who: Address },
    /// Escrow fee changed. `who` indexed.
    LogSetEscrowFee { who: Address, escrow_fee: Amount },
    /// Deposit created. `sender`, `recipient`, `addressable_hash` indexed;
    /// `amount` is the GROSS deposited value, not net of fee.
    LogEscrow {
        sender: Address,
        recipient: Address,
        addressable_hash: EscrowKey,
        hashed_password: Digest,
        deadline_block: Amount,
        amount: Amount,
    },
    /// Recipient claimed by secret reveal. `recipient` indexed.
    LogRemitt {
        recipient: Address,
        hashed_password: Digest,
        amount: Amount,
    },
    /// Sender reclaimed after deadline. `sender` and `recipient` indexed.
    LogClaim {
        sender: Address,
        recipient: Address,
        hashed_password: Digest,
        amount: Amount,
    },
    /// Accumulated commission paid out. `who` indexed.
    LogWithdrawCommission {
        who: Address,
        commission_balance: Amount,
    },
}

impl ContractEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ContractEvent::LogSetPaused { .. } => "LogSetPaused",
            ContractEvent::LogKill { .. } => "LogKill",
            ContractEvent::LogEmergencyWithdrawal { .. } => "LogEmergencyWithdrawal",
            ContractEvent::LogSetEscrowFee { .. } => "LogSetEscrowFee",
            ContractEvent::LogEscrow { .. } => "LogEscrow",
            ContractEvent::LogRemitt { .. } => "LogRemitt",
            ContractEvent::LogClaim { .. } => "LogClaim",
            ContractEvent::LogWithdrawCommission { .. } => "LogWithdrawCommission",
        }
    }

    /// Canonical signature string hashed into topic 0.
    pub fn signature(&self) -> &'static str {
        match self {
            ContractEvent::LogSetPaused { .. } => "LogSetPaused(address,bool)",
            ContractEvent::LogKill { .. } => "LogKill(address)",
            ContractEvent::LogEmergencyWithdrawal { .. } => "LogEmergencyWithdrawal(address)",
            ContractEvent::LogSetEscrowFee { .. } => "LogSetEscrowFee(address,uint128)",
            ContractEvent::LogEscrow { .. } => {
                "LogEscrow(address,address,bytes32,bytes32,uint128,uint128)"
            }
            ContractEvent::LogRemitt { .. } => "LogRemitt(address,bytes32,uint128)",
            ContractEvent::LogClaim { .. } => "LogClaim(address,address,bytes32,uint128)",
            ContractEvent::LogWithdrawCommission { .. } => {
                "LogWithdrawCommission(address,uint128)"
            }
        }
    }

    /// Topics: the signature selector followed by one fixed-width topic per
    /// indexed field, in field order.
    pub fn topics(&self) -> Vec<Digest> {
        let selector = Digest::hash(self.signature().as_bytes());
        let mut topics = vec![selector];
        match self {
            ContractEvent::LogSetPaused { who, paused } => {
                topics.push(address_topic(who));
                topics.push(bool_topic(*paused));
            }
            ContractEvent::LogKill { who }
            | ContractEvent::LogEmergencyWithdrawal { who }
            | ContractEvent::LogSetEscrowFee { who, .. }
            | ContractEvent::LogWithdrawCommission { who, .. } => {
                topics.push(address_topic(who));
            }
            ContractEvent::LogEscrow {
                sender,
                recipient,
                addressable_hash,
                ..
            } => {
                topics.push(address_topic(sender));
                topics.push(address_topic(recipient));
                topics.push(*addressable_hash);
            }
            ContractEvent::LogRemitt { recipient, .. } => {
                topics.push(address_topic(recipient));
            }
            ContractEvent::LogClaim {
                sender, recipient, ..
            } => {
                topics.push(address_topic(sender));
                topics.push(address_topic(recipient));
            }
        }
        topics
    }
}

/// Serialize an address as a topic: left-zero-padded to the full 32 bytes.
pub fn address_topic(addr: &Address) -> Digest {
    let mut bytes = [0u8; 32];
    bytes[12..].copy_from_slice(addr.as_bytes());
    Digest::from_bytes(bytes)
}

/// Serialize a boolean as a topic: all-zero for false, LSB set for true.
pub fn bool_topic(value: bool) -> Digest {
    let mut bytes = [0u8; 32];
    if value {
        bytes[31] = 1;
    }
    Digest::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hawala_types::escrow_key;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn address_topic_is_left_padded() {
        let topic = address_topic(&addr(0xaa));
        assert_eq!(&topic.as_bytes()[..12], &[0u8; 12]);
        assert_eq!(&topic.as_bytes()[12..], &[0xaa; 20]);
    }

    #[test]
    fn bool_topic_encoding() {
        assert!(bool_topic(false).is_zero());
        let t = bool_topic(true);
        assert_eq!(t.as_bytes()[31], 1);
        assert_eq!(&t.as_bytes()[..31], &[0u8; 31]);
    }

    #[test]
    fn set_paused_has_three_topics() {
        let event = ContractEvent::LogSetPaused {
            who: addr(1),
            paused: true,
        };
        let topics = event.topics();
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[1], address_topic(&addr(1)));
        assert_eq!(topics[2], bool_topic(true));
    }

    #[test]
    fn escrow_has_four_topics_with_key_third() {
        let sender = addr(1);
        let recipient = addr(2);
        let secret = Digest::hash(b"pw");
        let key = escrow_key(&recipient, &secret);

        let event = ContractEvent::LogEscrow {
            sender,
            recipient,
            addressable_hash: key,
            hashed_password: secret,
            deadline_block: 0,
            amount: 1000,
        };
        let topics = event.topics();
        assert_eq!(topics.len(), 4);
        assert_eq!(topics[1], address_topic(&sender));
        assert_eq!(topics[2], address_topic(&recipient));
        assert_eq!(topics[3], key);
    }

    #[test]
    fn selectors_differ_per_event() {
        let kill = ContractEvent::LogKill { who: addr(1) };
        let withdrawal = ContractEvent::LogEmergencyWithdrawal { who: addr(1) };
        assert_ne!(kill.topics()[0], withdrawal.topics()[0]);
    }

    #[test]
    fn events_serialize_tagged() {
        let event = ContractEvent::LogSetEscrowFee {
            who: addr(1),
            escrow_fee: 22,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "log_set_escrow_fee");
        assert_eq!(json["escrow_fee"], 22);

        let back: ContractEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn names_match_variants() {
        let event = ContractEvent::LogRemitt {
            recipient: addr(3),
            hashed_password: Digest::hash(b"pw"),
            amount: 5,
        };
        assert_eq!(event.name(), "LogRemitt");
        assert_eq!(event.topics().len(), 2);
    }
}

use serde::{Deserialize, Serialize};

use hawala_contract::ContractEvent;
use hawala_types::{Amount, Digest};

/// One serialized log entry: the event name, its fixed-width topics
/// (selector first, then one per indexed field), and the typed event with
/// every field for assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Height of the block that included the emitting call.
    pub height: Amount,
    pub name: String,
    pub topics: Vec<Digest>,
    pub event: ContractEvent,
}

impl LogEntry {
    pub fn from_event(height: Amount, event: ContractEvent) -> Self {
        Self {
            height,
            name: event.name().to_string(),
            topics: event.topics(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hawala_contract::{address_topic, bool_topic};
    use hawala_types::Address;

    #[test]
    fn entry_captures_name_and_topics() {
        let who = Address::from_bytes([7; 20]);
        let entry = LogEntry::from_event(42, ContractEvent::LogSetPaused { who, paused: true });

        assert_eq!(entry.height, 42);
        assert_eq!(entry.name, "LogSetPaused");
        assert_eq!(entry.topics.len(), 3);
        assert_eq!(entry.topics[1], address_topic(&who));
        assert_eq!(entry.topics[2], bool_topic(true));
    }

    #[test]
    fn entry_round_trips_through_json() {
        let who = Address::from_bytes([7; 20]);
        let entry = LogEntry::from_event(3, ContractEvent::LogKill { who });

        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}

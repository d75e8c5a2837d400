// Message - A call the consensus driver asks the executor to run
use super::primitives::{Address, Balance, Gas};
use crate::system_contracts::SYSTEM_CALL_GAS;
use serde::{Deserialize, Serialize};

/// Call request addressed to a system contract
///
/// Built by the consensus driver per call; never persisted. A missing `to`
/// would denote contract creation, which the executor refuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender (usually the block producer or the reserved system address)
    pub from: Address,

    /// Destination contract
    pub to: Option<Address>,

    /// Opaque call payload (ABI-encoded by the driver)
    pub data: Vec<u8>,

    /// Gas budget for the call
    pub gas: Gas,

    /// Native currency attached to the call
    pub value: Balance,
}

impl Message {
    pub fn new(from: Address, to: Option<Address>, data: Vec<u8>, gas: Gas, value: Balance) -> Self {
        Self {
            from,
            to,
            data,
            gas,
            value,
        }
    }

    /// System message with the effectively unbounded system-call gas budget
    pub fn system(from: Address, to: Address, data: Vec<u8>, value: Balance) -> Self {
        Self::new(from, Some(to), data, SYSTEM_CALL_GAS, value)
    }

    /// Whether this message would create a contract
    pub fn is_creation(&self) -> bool {
        self.to.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system_contracts::{SYSTEM_ADDRESS, VALIDATOR_CONTRACT};

    #[test]
    fn test_system_message_gas() {
        let msg = Message::system(SYSTEM_ADDRESS, VALIDATOR_CONTRACT, vec![0xde, 0xad], 0);
        assert_eq!(msg.gas, u64::MAX / 2);
        assert_eq!(msg.to, Some(VALIDATOR_CONTRACT));
        assert!(!msg.is_creation());
    }

    #[test]
    fn test_creation_detected() {
        let msg = Message::new(SYSTEM_ADDRESS, None, vec![], 21_000, 0);
        assert!(msg.is_creation());
    }
}

// System contracts - Well-known addresses of protocol-privileged contracts
//
// The addresses are owned by the consensus driver and genesis; they live here
// so drivers and tests share one definition. The executor itself never
// consults this list.

use crate::types::{Address, Gas};

/// Reserved sender for calls made on behalf of the protocol
pub const SYSTEM_ADDRESS: Address = Address::from_bytes([
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
]);

/// Validator set management (deposits, epoch updates)
pub const VALIDATOR_CONTRACT: Address = Address::from_low_u64(0x1000);
/// Slashing of misbehaving validators
pub const SLASH_CONTRACT: Address = Address::from_low_u64(0x1001);
/// System reward pool
pub const SYSTEM_REWARD_CONTRACT: Address = Address::from_low_u64(0x1002);
pub const LIGHT_CLIENT_CONTRACT: Address = Address::from_low_u64(0x1003);
pub const TOKEN_HUB_CONTRACT: Address = Address::from_low_u64(0x1004);
pub const RELAYER_INCENTIVIZE_CONTRACT: Address = Address::from_low_u64(0x1005);
pub const RELAYER_HUB_CONTRACT: Address = Address::from_low_u64(0x1006);
/// Governance parameter updates
pub const GOV_HUB_CONTRACT: Address = Address::from_low_u64(0x1007);
pub const TOKEN_MANAGER_CONTRACT: Address = Address::from_low_u64(0x1008);
pub const CROSS_CHAIN_CONTRACT: Address = Address::from_low_u64(0x2000);
pub const STAKING_CONTRACT: Address = Address::from_low_u64(0x2001);

/// All system contracts, in address order
pub const SYSTEM_CONTRACTS: [Address; 11] = [
    VALIDATOR_CONTRACT,
    SLASH_CONTRACT,
    SYSTEM_REWARD_CONTRACT,
    LIGHT_CLIENT_CONTRACT,
    TOKEN_HUB_CONTRACT,
    RELAYER_INCENTIVIZE_CONTRACT,
    RELAYER_HUB_CONTRACT,
    GOV_HUB_CONTRACT,
    TOKEN_MANAGER_CONTRACT,
    CROSS_CHAIN_CONTRACT,
    STAKING_CONTRACT,
];

/// Gas budget of a system message (half of u64::MAX so gas arithmetic cannot overflow)
pub const SYSTEM_CALL_GAS: Gas = u64::MAX / 2;

/// Is `address` one of the protocol's system contracts?
pub fn is_system_contract(address: &Address) -> bool {
    SYSTEM_CONTRACTS.contains(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_contracts_sorted_and_unique() {
        for pair in SYSTEM_CONTRACTS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_is_system_contract() {
        assert!(is_system_contract(&VALIDATOR_CONTRACT));
        assert!(is_system_contract(&STAKING_CONTRACT));
        assert!(!is_system_contract(&SYSTEM_ADDRESS));
        assert!(!is_system_contract(&Address::from_low_u64(0x1009)));
    }

    #[test]
    fn test_system_address_value() {
        assert_eq!(
            SYSTEM_ADDRESS.to_string(),
            "0xfffffffffffffffffffffffffffffffffffffffe"
        );
    }
}

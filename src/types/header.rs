// Header - Block being produced or validated
use super::primitives::{Address, Balance, BlockNumber, Gas, Hash, Timestamp};
use serde::{Deserialize, Serialize};

/// Block header fields the execution context is derived from
///
/// Owned by the caller; the executor only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    /// Parent block hash
    pub parent_hash: Hash,

    /// Block producer (the sealing validator under proof-of-authority)
    pub coinbase: Address,

    /// Block height
    pub number: BlockNumber,

    /// Block timestamp
    pub timestamp: Timestamp,

    /// Difficulty (in-turn/out-of-turn weight under PoA, 0 after a randomness switch)
    pub difficulty: u64,

    /// Block gas limit
    pub gas_limit: Gas,

    /// Gas used by the block so far
    pub gas_used: Gas,

    /// Mix digest, the randomness source when difficulty is 0
    pub mix_digest: Hash,

    /// Base fee, present once the fee-market fork is active
    pub base_fee: Option<Balance>,

    /// Extra data (vanity + validator signature under PoA)
    pub extra_data: Vec<u8>,
}

impl Header {
    /// Header hash (block identifier)
    pub fn hash(&self) -> Hash {
        let mut bytes = Vec::with_capacity(160 + self.extra_data.len());
        bytes.extend_from_slice(self.parent_hash.as_bytes());
        bytes.extend_from_slice(self.coinbase.as_bytes());
        bytes.extend_from_slice(&self.number.to_be_bytes());
        bytes.extend_from_slice(&self.timestamp.to_be_bytes());
        bytes.extend_from_slice(&self.difficulty.to_be_bytes());
        bytes.extend_from_slice(&self.gas_limit.to_be_bytes());
        bytes.extend_from_slice(&self.gas_used.to_be_bytes());
        bytes.extend_from_slice(self.mix_digest.as_bytes());
        match self.base_fee {
            Some(fee) => {
                bytes.push(1);
                bytes.extend_from_slice(&fee.to_be_bytes());
            }
            None => bytes.push(0),
        }
        bytes.extend_from_slice(&(self.extra_data.len() as u64).to_be_bytes());
        bytes.extend_from_slice(&self.extra_data);
        Hash::hash(&bytes)
    }

    /// Child header template: parent hash linked, number incremented
    ///
    /// `None` when the parent is already at `u64::MAX`.
    pub fn child(&self, coinbase: Address, timestamp: Timestamp) -> Option<Header> {
        let number = self.number.checked_add(1)?;
        Some(Header {
            parent_hash: self.hash(),
            coinbase,
            number,
            timestamp,
            difficulty: self.difficulty,
            gas_limit: self.gas_limit,
            gas_used: 0,
            mix_digest: Hash::ZERO,
            base_fee: self.base_fee,
            extra_data: Vec::new(),
        })
    }
}

// Context - Block and transaction context of an execution
// Principle: Everything the engine may observe is derived before the call

pub mod block;

pub use block::*;

use crate::types::{Address, Balance, BlockNumber, Hash, Header};

/// Active consensus engine, as far as execution is concerned
pub trait ConsensusEngine {
    /// Account credited as the block's beneficiary
    fn author(&self, header: &Header) -> Result<Address, ContextError>;
}

/// Read-only view of the chain the block is built on
pub trait ChainContext {
    /// Consensus engine in charge of the chain
    fn engine(&self) -> &dyn ConsensusEngine;

    /// Header by hash and number, if known
    fn header(&self, hash: &Hash, number: BlockNumber) -> Option<Header>;
}

/// Transaction-level context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxContext {
    /// Account that originated the call
    pub origin: Address,

    /// Gas price seen by the engine
    pub gas_price: Balance,
}

/// Context derivation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("Cannot determine block author for block {number}: {reason}")]
    UnknownAuthor { number: BlockNumber, reason: String },
}

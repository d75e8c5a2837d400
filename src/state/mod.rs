// State - Account/storage capability the execution engine runs against
// Principle: The caller owns the state; a call only borrows it

pub mod memory;

pub use memory::*;

use crate::types::{Address, Balance, Hash, Nonce};

/// Handle returned by [`StateStore::snapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(pub u64);

/// Mutable account/storage database
///
/// The interface the execution engine expects: balances, nonces, code,
/// storage slots, and snapshot/revert so the engine can roll back a failed
/// call frame. Implementations must be deterministic: the same sequence of
/// operations yields the same state on every node.
pub trait StateStore {
    /// Does the account exist?
    fn exists(&self, address: &Address) -> bool;

    /// Create an empty account (no-op if it exists)
    fn create_account(&mut self, address: Address);

    fn balance(&self, address: &Address) -> Balance;

    /// Credit an account, creating it if needed
    fn add_balance(&mut self, address: Address, amount: Balance);

    /// Debit an account
    fn sub_balance(&mut self, address: Address, amount: Balance) -> Result<(), StateError>;

    fn nonce(&self, address: &Address) -> Nonce;

    fn set_nonce(&mut self, address: Address, nonce: Nonce);

    /// Contract code (empty for externally owned accounts)
    fn code(&self, address: &Address) -> Vec<u8>;

    fn set_code(&mut self, address: Address, code: Vec<u8>);

    /// Storage slot value (zero when unset)
    fn storage(&self, address: &Address, key: &Hash) -> Hash;

    fn set_storage(&mut self, address: Address, key: Hash, value: Hash);

    /// Mark the current state so it can be restored
    fn snapshot(&mut self) -> SnapshotId;

    /// Undo every change made since `id` was taken
    fn revert_to_snapshot(&mut self, id: SnapshotId);

    /// Move `amount` from `from` to `to`
    fn transfer(&mut self, from: Address, to: Address, amount: Balance) -> Result<(), StateError> {
        let available = self.balance(&from);
        if available < amount {
            return Err(StateError::InsufficientBalance {
                account: from,
                available,
                required: amount,
            });
        }
        self.sub_balance(from, amount)?;
        self.add_balance(to, amount);
        Ok(())
    }
}

/// State errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("Insufficient balance for {account}: available={available}, required={required}")]
    InsufficientBalance {
        account: Address,
        available: Balance,
        required: Balance,
    },

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

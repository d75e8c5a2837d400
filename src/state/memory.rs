// Memory state - Journaled in-memory StateStore
use super::{SnapshotId, StateError, StateStore};
use crate::types::{Address, Balance, Hash, Nonce};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Account record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub nonce: Nonce,
    pub balance: Balance,
    pub code: Vec<u8>,
    /// Non-zero storage slots only
    pub storage: BTreeMap<Hash, Hash>,
}

/// Undo record for one mutation
#[derive(Debug, Clone)]
enum JournalEntry {
    Created(Address),
    Balance { address: Address, prev: Balance },
    Nonce { address: Address, prev: Nonce },
    Code { address: Address, prev: Vec<u8> },
    Storage { address: Address, key: Hash, prev: Option<Hash> },
}

/// In-memory state with a change journal
///
/// Accounts live in a `BTreeMap` so iteration (and `state_root`) is
/// independent of insertion order. Every mutation appends an undo record;
/// `snapshot` remembers a journal position and `revert_to_snapshot` unwinds
/// back to it.
///
/// Not thread-safe; one block-processing pipeline owns one instance.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    accounts: BTreeMap<Address, Account>,
    journal: Vec<JournalEntry>,
    /// Live snapshots, oldest first: (id, journal length when taken)
    snapshots: Vec<(SnapshotId, usize)>,
    next_snapshot: u64,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Genesis-style construction; nothing is journaled
    pub fn with_accounts<I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (Address, Account)>,
    {
        Self {
            accounts: accounts.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Insert or replace an account without journaling (genesis/setup)
    pub fn insert_account(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    /// Number of undo records since the last `finalise`
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Accept all changes: drop the journal and every live snapshot
    pub fn finalise(&mut self) {
        self.journal.clear();
        self.snapshots.clear();
    }

    /// Deterministic digest of every account
    pub fn state_root(&self) -> Result<Hash, StateError> {
        if self.accounts.is_empty() {
            return Ok(Hash::ZERO);
        }
        let bytes = bincode::serialize(&self.accounts)
            .map_err(|e| StateError::SerializationFailed(e.to_string()))?;
        Ok(Hash::hash(&bytes))
    }

    fn touch(&mut self, address: Address) -> &mut Account {
        if !self.accounts.contains_key(&address) {
            self.journal.push(JournalEntry::Created(address));
        }
        self.accounts.entry(address).or_default()
    }

    fn set_balance(&mut self, address: Address, balance: Balance) {
        let account = self.touch(address);
        let prev = account.balance;
        account.balance = balance;
        self.journal.push(JournalEntry::Balance { address, prev });
    }

    fn undo(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::Created(address) => {
                self.accounts.remove(&address);
            }
            JournalEntry::Balance { address, prev } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.balance = prev;
                }
            }
            JournalEntry::Nonce { address, prev } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.nonce = prev;
                }
            }
            JournalEntry::Code { address, prev } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.code = prev;
                }
            }
            JournalEntry::Storage { address, key, prev } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    match prev {
                        Some(value) => {
                            account.storage.insert(key, value);
                        }
                        None => {
                            account.storage.remove(&key);
                        }
                    }
                }
            }
        }
    }
}

impl StateStore for MemoryState {
    fn exists(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    fn create_account(&mut self, address: Address) {
        self.touch(address);
    }

    fn balance(&self, address: &Address) -> Balance {
        self.accounts.get(address).map(|a| a.balance).unwrap_or(0)
    }

    fn add_balance(&mut self, address: Address, amount: Balance) {
        let balance = self.balance(&address).saturating_add(amount);
        self.set_balance(address, balance);
    }

    fn sub_balance(&mut self, address: Address, amount: Balance) -> Result<(), StateError> {
        let available = self.balance(&address);
        let balance = available
            .checked_sub(amount)
            .ok_or(StateError::InsufficientBalance {
                account: address,
                available,
                required: amount,
            })?;
        self.set_balance(address, balance);
        Ok(())
    }

    fn nonce(&self, address: &Address) -> Nonce {
        self.accounts.get(address).map(|a| a.nonce).unwrap_or(0)
    }

    fn set_nonce(&mut self, address: Address, nonce: Nonce) {
        let account = self.touch(address);
        let prev = account.nonce;
        account.nonce = nonce;
        self.journal.push(JournalEntry::Nonce { address, prev });
    }

    fn code(&self, address: &Address) -> Vec<u8> {
        self.accounts
            .get(address)
            .map(|a| a.code.clone())
            .unwrap_or_default()
    }

    fn set_code(&mut self, address: Address, code: Vec<u8>) {
        let account = self.touch(address);
        let prev = std::mem::replace(&mut account.code, code);
        self.journal.push(JournalEntry::Code { address, prev });
    }

    fn storage(&self, address: &Address, key: &Hash) -> Hash {
        self.accounts
            .get(address)
            .and_then(|a| a.storage.get(key).copied())
            .unwrap_or(Hash::ZERO)
    }

    fn set_storage(&mut self, address: Address, key: Hash, value: Hash) {
        let account = self.touch(address);
        // Zero slots are not stored so the state root stays canonical
        let prev = if value.is_zero() {
            account.storage.remove(&key)
        } else {
            account.storage.insert(key, value)
        };
        self.journal.push(JournalEntry::Storage { address, key, prev });
    }

    fn snapshot(&mut self) -> SnapshotId {
        let id = SnapshotId(self.next_snapshot);
        self.next_snapshot += 1;
        self.snapshots.push((id, self.journal.len()));
        id
    }

    fn revert_to_snapshot(&mut self, id: SnapshotId) {
        let Some(index) = self.snapshots.iter().position(|(sid, _)| *sid == id) else {
            warn!("Revert to unknown snapshot {:?} ignored", id);
            return;
        };
        let journal_len = self.snapshots[index].1;
        self.snapshots.truncate(index);

        while self.journal.len() > journal_len {
            if let Some(entry) = self.journal.pop() {
                self.undo(entry);
            }
        }
    }
}

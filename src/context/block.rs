// Block context - Header-derived values an execution needs to be deterministic
use super::ChainContext;
use crate::types::{Address, Balance, BlockNumber, Gas, Hash, Header, Timestamp};
use std::cell::RefCell;
use std::fmt;

/// Block-level execution context
///
/// Built per call from the header being processed and the chain it extends.
/// Holds a lazily filled ancestor-hash cache, so it is neither `Sync` nor
/// meant to outlive the call it was built for.
#[derive(Debug)]
pub struct BlockContext<'a> {
    /// Beneficiary of the block
    pub coinbase: Address,
    pub number: BlockNumber,
    pub timestamp: Timestamp,
    pub difficulty: u64,
    pub gas_limit: Gas,
    pub base_fee: Option<Balance>,
    /// Randomness source, set once difficulty is 0
    pub random: Option<Hash>,
    hashes: BlockHashes<'a>,
}

impl<'a> BlockContext<'a> {
    /// Derive the context for `header`
    ///
    /// `author` overrides the beneficiary; when `None` the consensus engine
    /// decides. An engine that cannot name the author yields the zero
    /// address, which every node derives identically.
    pub fn new(header: &Header, chain: &'a dyn ChainContext, author: Option<Address>) -> Self {
        let coinbase = match author {
            Some(author) => author,
            None => match chain.engine().author(header) {
                Ok(author) => author,
                Err(_) => Address::ZERO,
            },
        };

        let random = (header.difficulty == 0).then_some(header.mix_digest);

        Self {
            coinbase,
            number: header.number,
            timestamp: header.timestamp,
            difficulty: header.difficulty,
            gas_limit: header.gas_limit,
            base_fee: header.base_fee,
            random,
            hashes: BlockHashes::new(header, chain),
        }
    }

    /// Hash of ancestor block `number` (zero if unknown or not an ancestor)
    pub fn block_hash(&self, number: BlockNumber) -> Hash {
        self.hashes.get(number)
    }
}

/// Ancestor hash lookup anchored at one header
///
/// Walks parent links through the chain on demand and remembers every hash
/// it learns, so repeated lookups cost at most one walk.
pub struct BlockHashes<'a> {
    number: BlockNumber,
    parent_hash: Hash,
    chain: &'a dyn ChainContext,
    /// cache[i] = hash of block (number - 1 - i)
    cache: RefCell<Vec<Hash>>,
}

impl<'a> BlockHashes<'a> {
    pub fn new(header: &Header, chain: &'a dyn ChainContext) -> Self {
        Self {
            number: header.number,
            parent_hash: header.parent_hash,
            chain,
            cache: RefCell::new(Vec::new()),
        }
    }

    pub fn get(&self, target: BlockNumber) -> Hash {
        // Only strict ancestors have a hash
        if target >= self.number {
            return Hash::ZERO;
        }

        let mut cache = self.cache.borrow_mut();
        if cache.is_empty() {
            cache.push(self.parent_hash);
        }

        let index = self.number - target - 1;
        if let Some(hash) = cache.get(index as usize) {
            return *hash;
        }

        let mut last_hash = cache[cache.len() - 1];
        let mut last_number = self.number - cache.len() as u64;

        while let Some(header) = self.chain.header(&last_hash, last_number) {
            let Some(parent_number) = header.number.checked_sub(1) else {
                break;
            };
            cache.push(header.parent_hash);
            last_hash = header.parent_hash;
            last_number = parent_number;
            if target == last_number {
                return last_hash;
            }
        }

        Hash::ZERO
    }

    /// Number of hashes learned so far
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl fmt::Debug for BlockHashes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockHashes")
            .field("number", &self.number)
            .field("parent_hash", &self.parent_hash)
            .field("cached", &self.cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{CoinbaseAuthor, FailingAuthor, MemoryChain};

    #[test]
    fn test_context_copies_header_fields() {
        let chain = MemoryChain::with_length(4);
        let header = chain.next_header(Address::from_low_u64(0xAA), 1_700_000_000);

        let ctx = BlockContext::new(&header, &chain, None);
        assert_eq!(ctx.number, 4);
        assert_eq!(ctx.timestamp, 1_700_000_000);
        assert_eq!(ctx.difficulty, header.difficulty);
        assert_eq!(ctx.gas_limit, header.gas_limit);
        assert_eq!(ctx.base_fee, header.base_fee);
        assert_eq!(ctx.coinbase, Address::from_low_u64(0xAA));
        assert!(ctx.random.is_none());
    }

    #[test]
    fn test_author_override() {
        let chain = MemoryChain::with_length(2);
        let header = chain.next_header(Address::from_low_u64(0xAA), 10);

        let ctx = BlockContext::new(&header, &chain, Some(Address::from_low_u64(0xBB)));
        assert_eq!(ctx.coinbase, Address::from_low_u64(0xBB));
    }

    #[test]
    fn test_author_failure_yields_zero() {
        let chain = MemoryChain::with_length(2).with_engine(Box::new(FailingAuthor));
        let header = chain.next_header(Address::from_low_u64(0xAA), 10);

        let ctx = BlockContext::new(&header, &chain, None);
        assert_eq!(ctx.coinbase, Address::ZERO);
    }

    #[test]
    fn test_random_only_without_difficulty() {
        let chain = MemoryChain::with_length(1).with_engine(Box::new(CoinbaseAuthor));
        let mut header = chain.next_header(Address::ZERO, 10);
        header.mix_digest = Hash::hash(b"seed");

        header.difficulty = 2;
        assert!(BlockContext::new(&header, &chain, None).random.is_none());

        header.difficulty = 0;
        assert_eq!(
            BlockContext::new(&header, &chain, None).random,
            Some(Hash::hash(b"seed"))
        );
    }

    #[test]
    fn test_block_hashes_walk_ancestors() {
        let chain = MemoryChain::with_length(10);
        let header = chain.next_header(Address::ZERO, 100);
        let ctx = BlockContext::new(&header, &chain, None);

        for n in 0..10 {
            assert_eq!(ctx.block_hash(n), chain.canonical_hash(n).unwrap(), "block {}", n);
        }
    }

    #[test]
    fn test_block_hashes_non_ancestors_are_zero() {
        let chain = MemoryChain::with_length(3);
        let header = chain.next_header(Address::ZERO, 100);
        let ctx = BlockContext::new(&header, &chain, None);

        assert_eq!(ctx.block_hash(3), Hash::ZERO);
        assert_eq!(ctx.block_hash(4), Hash::ZERO);
        assert_eq!(ctx.block_hash(u64::MAX), Hash::ZERO);
    }

    #[test]
    fn test_block_hashes_cache() {
        let chain = MemoryChain::with_length(8);
        let header = chain.next_header(Address::ZERO, 100);
        let hashes = BlockHashes::new(&header, &chain);

        assert_eq!(hashes.get(7), chain.canonical_hash(7).unwrap());
        assert_eq!(hashes.cached(), 1);

        assert_eq!(hashes.get(2), chain.canonical_hash(2).unwrap());
        assert_eq!(hashes.cached(), 6);

        // Served from cache, no growth
        assert_eq!(hashes.get(5), chain.canonical_hash(5).unwrap());
        assert_eq!(hashes.cached(), 6);
    }

    #[test]
    fn test_block_hashes_missing_ancestor() {
        let chain = MemoryChain::with_length(6).without_header(3);
        let header = chain.next_header(Address::ZERO, 100);
        let hashes = BlockHashes::new(&header, &chain);

        assert_eq!(hashes.get(4), chain.canonical_hash(4).unwrap());
        assert_eq!(hashes.get(3), chain.canonical_hash(3).unwrap());
        // Header #3 is unknown so nothing below it resolves
        assert_eq!(hashes.get(2), Hash::ZERO);
    }
}

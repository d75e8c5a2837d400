//! Test doubles for the executor's collaborators.
//!
//! - [`ScriptEngine`]: an [`ExecutionEngine`] whose "bytecode" is a
//!   serialised list of [`Op`]s stored as contract code. It follows standard
//!   call semantics (value transfer, snapshot, revert on failure, full gas
//!   burn on hard failures) and records every call it sees.
//! - [`MemoryChain`]: a linear chain of headers implementing [`ChainContext`].
//! - [`CoinbaseAuthor`] / [`FailingAuthor`]: consensus engines.
//! - [`RecordingDiagnostics`]: keeps failure reports for assertions.

use crate::context::{ChainContext, ConsensusEngine, ContextError};
use crate::diagnostics::Diagnostics;
use crate::engine::gas::costs;
use crate::engine::{CallOutcome, Environment, ExecutionEngine, ExecutionError, GasMeter};
use crate::state::{Account, MemoryState, StateError, StateStore};
use crate::types::{Address, Balance, BlockNumber, Gas, Hash, Header, Message};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

// =============================================================================
// SCRIPTED CONTRACTS
// =============================================================================

/// Prefix identifying script code; anything else is invalid bytecode
pub const SCRIPT_MAGIC: &[u8; 4] = b"SCR1";

/// One step of a scripted contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Write `value` into `slot` of the executing contract
    Store { slot: Hash, value: Hash },
    /// Write the hash of the call data into `slot`
    StoreCalldataHash { slot: Hash },
    /// Add `by` to the counter held in `slot`
    Increment { slot: Hash, by: u64 },
    /// Pay `amount` from the contract to `to`
    Pay { to: Address, amount: Balance },
    /// Pay `amount` from the contract to the block coinbase
    PayCoinbase { amount: Balance },
    /// Revert with `reason` unless the contract holds at least `amount`
    RequireBalance { amount: Balance, reason: Vec<u8> },
    /// Revert with `reason` unless called by `caller`
    RequireCaller { caller: Address, reason: Vec<u8> },
    /// Spend gas
    Burn(Gas),
    /// Return the gas price (16 bytes, big-endian)
    ReturnGasPrice,
    /// Return the transaction origin
    ReturnOrigin,
    /// Return the hash of block `n`
    ReturnBlockHash(BlockNumber),
    Return(Vec<u8>),
    Revert(Vec<u8>),
    /// Hit an undefined opcode
    Invalid(u8),
}

/// Scripted contract code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script(pub Vec<Op>);

impl Script {
    pub fn new(ops: Vec<Op>) -> Self {
        Script(ops)
    }

    pub fn encode(&self) -> Result<Vec<u8>, StateError> {
        let body = bincode::serialize(&self.0)
            .map_err(|e| StateError::SerializationFailed(e.to_string()))?;
        let mut code = SCRIPT_MAGIC.to_vec();
        code.extend_from_slice(&body);
        Ok(code)
    }

    pub fn decode(code: &[u8]) -> Option<Script> {
        let body = code.strip_prefix(SCRIPT_MAGIC.as_slice())?;
        bincode::deserialize(body).ok().map(Script)
    }
}

/// Install a scripted contract at genesis (not journaled)
pub fn deploy(
    state: &mut MemoryState,
    address: Address,
    balance: Balance,
    script: Script,
) -> Result<(), StateError> {
    let account = Account {
        nonce: 1,
        balance,
        code: script.encode()?,
        storage: BTreeMap::new(),
    };
    state.insert_account(address, account);
    Ok(())
}

/// What the engine saw for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedCall {
    pub caller: Address,
    pub to: Address,
    pub origin: Address,
    pub gas_price: Balance,
    pub coinbase: Address,
    pub block_number: BlockNumber,
    pub base_fee: Option<Balance>,
    pub gas: Gas,
    pub value: Balance,
    /// Fee the call would cost at the bound gas price
    pub fee: Balance,
}

type Failure = (Vec<u8>, ExecutionError);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Execution engine running [`Script`] code
#[derive(Debug, Default)]
pub struct ScriptEngine {
    observed: Mutex<Vec<ObservedCall>>,
}

impl ScriptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls made through this engine
    pub fn calls(&self) -> usize {
        lock(&self.observed).len()
    }

    pub fn observed(&self) -> Vec<ObservedCall> {
        lock(&self.observed).clone()
    }

    fn charge(meter: &mut GasMeter, amount: Gas) -> Result<(), Failure> {
        meter
            .consume(amount)
            .map_err(|e| (Vec::new(), ExecutionError::from(e)))
    }

    fn charge_data(meter: &mut GasMeter, bytes: &[u8]) -> Result<(), Failure> {
        meter
            .consume_per_byte(costs::RETURN_DATA_BYTE, bytes.len())
            .map_err(|e| (Vec::new(), ExecutionError::from(e)))
    }

    fn run<S: StateStore + ?Sized>(
        env: &mut Environment<'_, S>,
        code: &[u8],
        caller: Address,
        contract: Address,
        data: &[u8],
        meter: &mut GasMeter,
    ) -> Result<Vec<u8>, Failure> {
        let script = Script::decode(code)
            .ok_or_else(|| (Vec::new(), ExecutionError::InvalidOpcode(code.first().copied().unwrap_or(0))))?;

        for op in script.0 {
            match op {
                Op::Store { slot, value } => {
                    Self::store(env, contract, slot, value, meter)?;
                }
                Op::StoreCalldataHash { slot } => {
                    Self::store(env, contract, slot, Hash::hash(data), meter)?;
                }
                Op::Increment { slot, by } => {
                    Self::charge(meter, costs::STORAGE_READ)?;
                    let current = env.state().storage(&contract, &slot);
                    let mut counter = [0u8; 8];
                    counter.copy_from_slice(&current.as_bytes()[24..]);
                    let next = u64::from_be_bytes(counter).wrapping_add(by);
                    Self::store(env, contract, slot, Hash::from_low_u64(next), meter)?;
                }
                Op::Pay { to, amount } => {
                    Self::pay(env, contract, to, amount, meter)?;
                }
                Op::PayCoinbase { amount } => {
                    let coinbase = env.block().coinbase;
                    Self::pay(env, contract, coinbase, amount, meter)?;
                }
                Op::RequireBalance { amount, reason } => {
                    Self::charge(meter, costs::BALANCE_READ)?;
                    if env.state().balance(&contract) < amount {
                        return Err((reason, ExecutionError::Reverted));
                    }
                }
                Op::RequireCaller { caller: expected, reason } => {
                    Self::charge(meter, costs::CONTEXT_READ)?;
                    if caller != expected {
                        return Err((reason, ExecutionError::Reverted));
                    }
                }
                Op::Burn(amount) => {
                    Self::charge(meter, amount)?;
                }
                Op::ReturnGasPrice => {
                    Self::charge(meter, costs::CONTEXT_READ)?;
                    return Ok(env.tx().gas_price.to_be_bytes().to_vec());
                }
                Op::ReturnOrigin => {
                    Self::charge(meter, costs::CONTEXT_READ)?;
                    return Ok(env.tx().origin.as_bytes().to_vec());
                }
                Op::ReturnBlockHash(number) => {
                    Self::charge(meter, costs::CONTEXT_READ)?;
                    return Ok(env.block().block_hash(number).as_bytes().to_vec());
                }
                Op::Return(bytes) => {
                    Self::charge_data(meter, &bytes)?;
                    return Ok(bytes);
                }
                Op::Revert(bytes) => {
                    Self::charge_data(meter, &bytes)?;
                    return Err((bytes, ExecutionError::Reverted));
                }
                Op::Invalid(opcode) => {
                    return Err((Vec::new(), ExecutionError::InvalidOpcode(opcode)));
                }
            }
        }

        Ok(Vec::new())
    }

    fn store<S: StateStore + ?Sized>(
        env: &mut Environment<'_, S>,
        contract: Address,
        slot: Hash,
        value: Hash,
        meter: &mut GasMeter,
    ) -> Result<(), Failure> {
        let cost = if env.state().storage(&contract, &slot).is_zero() {
            costs::STORAGE_WRITE_NEW
        } else {
            costs::STORAGE_WRITE_EXISTING
        };
        Self::charge(meter, cost)?;
        env.state_mut().set_storage(contract, slot, value);
        Ok(())
    }

    fn pay<S: StateStore + ?Sized>(
        env: &mut Environment<'_, S>,
        from: Address,
        to: Address,
        amount: Balance,
        meter: &mut GasMeter,
    ) -> Result<(), Failure> {
        Self::charge(meter, costs::VALUE_TRANSFER)?;
        env.state_mut()
            .transfer(from, to, amount)
            .map_err(|_| (Vec::new(), ExecutionError::InsufficientBalance))
    }
}

impl ExecutionEngine for ScriptEngine {
    fn call<S: StateStore + ?Sized>(
        &self,
        env: &mut Environment<'_, S>,
        caller: Address,
        to: Address,
        data: &[u8],
        gas: Gas,
        value: Balance,
    ) -> CallOutcome {
        let mut meter = GasMeter::new(gas, env.tx().gas_price);

        let outcome = 'call: {
            if value > 0 && env.state().balance(&caller) < value {
                break 'call CallOutcome::failure(Vec::new(), gas, ExecutionError::InsufficientBalance);
            }

            let snapshot = env.state_mut().snapshot();
            if !env.state().exists(&to) {
                if value == 0 {
                    break 'call CallOutcome::success(Vec::new(), gas);
                }
                env.state_mut().create_account(to);
            }
            if value > 0 {
                if let Err(e) = env.state_mut().transfer(caller, to, value) {
                    env.state_mut().revert_to_snapshot(snapshot);
                    break 'call CallOutcome::failure(
                        Vec::new(),
                        gas,
                        ExecutionError::Engine(e.to_string()),
                    );
                }
            }

            let code = env.state().code(&to);
            if code.is_empty() {
                break 'call CallOutcome::success(Vec::new(), gas);
            }

            match Self::run(env, &code, caller, to, data, &mut meter) {
                Ok(output) => CallOutcome::success(output, meter.remaining()),
                Err((output, error)) => {
                    env.state_mut().revert_to_snapshot(snapshot);
                    if error.consumes_all_gas() {
                        meter.consume_all();
                    }
                    CallOutcome::failure(output, meter.remaining(), error)
                }
            }
        };

        lock(&self.observed).push(ObservedCall {
            caller,
            to,
            origin: env.tx().origin,
            gas_price: env.tx().gas_price,
            coinbase: env.block().coinbase,
            block_number: env.block().number,
            base_fee: env.block().base_fee,
            gas,
            value,
            fee: meter.total_cost(),
        });

        outcome
    }
}

// =============================================================================
// CHAIN
// =============================================================================

/// Beneficiary is the header's coinbase (the sealing validator)
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinbaseAuthor;

impl ConsensusEngine for CoinbaseAuthor {
    fn author(&self, header: &Header) -> Result<Address, ContextError> {
        Ok(header.coinbase)
    }
}

/// Engine that can never name an author
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingAuthor;

impl ConsensusEngine for FailingAuthor {
    fn author(&self, header: &Header) -> Result<Address, ContextError> {
        Err(ContextError::UnknownAuthor {
            number: header.number,
            reason: "no seal".to_string(),
        })
    }
}

/// Linear in-memory chain starting at a genesis header
pub struct MemoryChain {
    headers: BTreeMap<BlockNumber, Header>,
    canonical: Vec<Hash>,
    engine: Box<dyn ConsensusEngine>,
}

impl MemoryChain {
    /// Block time used for generated headers
    pub const BLOCK_PERIOD: u64 = 3;

    /// Chain with blocks 0..length (at least the genesis block)
    pub fn with_length(length: u64) -> Self {
        let genesis = Header {
            number: 0,
            timestamp: 1_600_000_000,
            difficulty: 2,
            gas_limit: 30_000_000,
            base_fee: Some(0),
            extra_data: b"genesis".to_vec(),
            ..Default::default()
        };

        let mut chain = Self {
            headers: BTreeMap::new(),
            canonical: Vec::new(),
            engine: Box::new(CoinbaseAuthor),
        };
        chain.push(genesis);

        for number in 1..length.max(1) {
            let coinbase = Address::from_low_u64(0x100 + number % 3);
            let header = chain.next_header(coinbase, 1_600_000_000 + number * Self::BLOCK_PERIOD);
            chain.push(header);
        }
        chain
    }

    pub fn with_engine(mut self, engine: Box<dyn ConsensusEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Forget header `number` (its hash stays known through its child)
    pub fn without_header(mut self, number: BlockNumber) -> Self {
        self.headers.remove(&number);
        self
    }

    pub fn push(&mut self, header: Header) {
        self.canonical.push(header.hash());
        self.headers.insert(header.number, header);
    }

    /// Header extending the current tip (not added to the chain)
    pub fn next_header(&self, coinbase: Address, timestamp: u64) -> Header {
        let number = self.canonical.len() as u64;
        let parent_hash = self.canonical.last().copied().unwrap_or(Hash::ZERO);
        Header {
            parent_hash,
            coinbase,
            number,
            timestamp,
            difficulty: 2,
            gas_limit: 30_000_000,
            gas_used: 0,
            mix_digest: Hash::ZERO,
            base_fee: Some(0),
            extra_data: Vec::new(),
        }
    }

    pub fn canonical_hash(&self, number: BlockNumber) -> Option<Hash> {
        self.canonical.get(number as usize).copied()
    }

    pub fn len(&self) -> u64 {
        self.canonical.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

impl ChainContext for MemoryChain {
    fn engine(&self) -> &dyn ConsensusEngine {
        self.engine.as_ref()
    }

    fn header(&self, hash: &Hash, number: BlockNumber) -> Option<Header> {
        self.headers
            .get(&number)
            .filter(|header| header.hash() == *hash)
            .cloned()
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// One failure report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub to: Option<Address>,
    pub output: Vec<u8>,
    pub error: ExecutionError,
}

/// Keeps every failure report
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    records: Mutex<Vec<FailureRecord>>,
}

impl RecordingDiagnostics {
    pub fn records(&self) -> Vec<FailureRecord> {
        lock(&self.records).clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn call_failed(&self, message: &Message, output: &[u8], error: &ExecutionError) {
        lock(&self.records).push(FailureRecord {
            to: message.to,
            output: output.to_vec(),
            error: error.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_codec() {
        let script = Script::new(vec![
            Op::Store {
                slot: Hash::from_low_u64(1),
                value: Hash::from_low_u64(2),
            },
            Op::Return(b"ok".to_vec()),
        ]);
        let code = script.encode().unwrap();
        assert!(code.starts_with(SCRIPT_MAGIC));
        assert_eq!(Script::decode(&code), Some(script));
        assert_eq!(Script::decode(&[0xfe]), None);
    }

    #[test]
    fn test_memory_chain_links() {
        let chain = MemoryChain::with_length(5);
        assert_eq!(chain.len(), 5);

        for number in 1..5 {
            let hash = chain.canonical_hash(number).unwrap();
            let header = chain.header(&hash, number).unwrap();
            assert_eq!(header.parent_hash, chain.canonical_hash(number - 1).unwrap());
        }

        // Wrong hash for the number
        let genesis_hash = chain.canonical_hash(0).unwrap();
        assert!(chain.header(&genesis_hash, 1).is_none());
    }

    #[test]
    fn test_failing_author() {
        let header = Header::default();
        assert!(FailingAuthor.author(&header).is_err());
        assert_eq!(
            CoinbaseAuthor.author(&Header {
                coinbase: Address::from_low_u64(5),
                ..Default::default()
            }),
            Ok(Address::from_low_u64(5))
        );
    }
}

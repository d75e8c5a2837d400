// Engine - Execution engine capability and the environment it runs in
// Principle: The interpreter is external; this crate only binds its inputs

pub mod error;
pub mod gas;

pub use error::*;
pub use gas::*;

use crate::config::{ChainConfig, Rules};
use crate::context::{BlockContext, TxContext};
use crate::state::StateStore;
use crate::types::{Address, Balance, Gas};
use serde::{Deserialize, Serialize};

/// Interpreter options
///
/// System calls always run with the default (empty) configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmConfig {
    /// Engine-level debug output
    pub debug: bool,

    /// Skip the base-fee check for calls
    pub no_base_fee: bool,

    /// Additional EIPs to enable
    pub extra_eips: Vec<u32>,
}

/// Ephemeral execution environment
///
/// Pairs the block context, the transaction context and an exclusive borrow
/// of the state. One is built per call and dropped right after it.
#[derive(Debug)]
pub struct Environment<'a, S: ?Sized> {
    block: BlockContext<'a>,
    tx: TxContext,
    state: &'a mut S,
    chain_config: &'a ChainConfig,
    rules: Rules,
    config: VmConfig,
}

impl<'a, S: StateStore + ?Sized> Environment<'a, S> {
    pub fn new(
        block: BlockContext<'a>,
        tx: TxContext,
        state: &'a mut S,
        chain_config: &'a ChainConfig,
        config: VmConfig,
    ) -> Self {
        let rules = chain_config.rules(block.number);
        Self {
            block,
            tx,
            state,
            chain_config,
            rules,
            config,
        }
    }

    pub fn block(&self) -> &BlockContext<'a> {
        &self.block
    }

    pub fn tx(&self) -> &TxContext {
        &self.tx
    }

    pub fn state(&self) -> &S {
        &*self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut *self.state
    }

    pub fn chain_config(&self) -> &ChainConfig {
        self.chain_config
    }

    /// Fork rules at the block being executed
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }
}

/// Result of one call, as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// Return data, or the revert payload on failure
    pub output: Vec<u8>,

    /// Gas not consumed by the call
    pub leftover_gas: Gas,

    /// Failure reported by the engine
    pub error: Option<ExecutionError>,
}

impl CallOutcome {
    pub fn success(output: Vec<u8>, leftover_gas: Gas) -> Self {
        Self {
            output,
            leftover_gas,
            error: None,
        }
    }

    pub fn failure(output: Vec<u8>, leftover_gas: Gas, error: ExecutionError) -> Self {
        Self {
            output,
            leftover_gas,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Gas consumed out of `gas_limit`
    pub fn gas_used(&self, gas_limit: Gas) -> Gas {
        gas_limit.saturating_sub(self.leftover_gas)
    }

    /// Split into output and error
    pub fn into_result(self) -> Result<Vec<u8>, (Vec<u8>, ExecutionError)> {
        match self.error {
            None => Ok(self.output),
            Some(error) => Err((self.output, error)),
        }
    }
}

/// Contract execution engine
///
/// Performs a direct message call with standard call semantics: transfer
/// `value`, run the code at `to`, and on failure undo the frame's state
/// changes itself (the caller never rolls back). A revert keeps the
/// unused gas; every other failure consumes all of it.
pub trait ExecutionEngine {
    fn call<S: StateStore + ?Sized>(
        &self,
        env: &mut Environment<'_, S>,
        caller: Address,
        to: Address,
        data: &[u8],
        gas: Gas,
        value: Balance,
    ) -> CallOutcome;
}

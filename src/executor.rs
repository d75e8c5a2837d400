// System call executor - Runs one consensus-issued message against state
//
// Flow per call:
// 1. Derive the block context from the header (no beneficiary override)
// 2. Bind the transaction context: origin = sender, gas price from config (0)
// 3. Build a fresh environment with the default VM config
// 4. Make exactly one direct call through the injected engine
// 5. Hand back output and error as the engine produced them

use crate::config::{ChainConfig, SystemCallConfig};
use crate::context::{BlockContext, ChainContext, TxContext};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::engine::{Environment, ExecutionEngine, ExecutionError, VmConfig};
use crate::state::StateStore;
use crate::types::{Header, Message};

/// System call failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SystemCallError {
    /// The message has no destination. Contract creation is not a system
    /// call; this is a caller bug and no state was touched.
    #[error("system message has no destination (contract creation is not supported)")]
    MissingDestination,

    /// The engine reported a failure. `output` is whatever the engine
    /// returned (the revert payload for a revert), `error` is its error as-is.
    #[error("system call failed: {error}")]
    Execution {
        output: Vec<u8>,
        #[source]
        error: ExecutionError,
    },
}

impl SystemCallError {
    /// Output produced before the failure (empty if the call never ran)
    pub fn output(&self) -> &[u8] {
        match self {
            SystemCallError::MissingDestination => &[],
            SystemCallError::Execution { output, .. } => output,
        }
    }

    /// Engine error, if the call ran
    pub fn execution_error(&self) -> Option<&ExecutionError> {
        match self {
            SystemCallError::MissingDestination => None,
            SystemCallError::Execution { error, .. } => Some(error),
        }
    }
}

/// Adapter between the consensus driver and the execution engine
///
/// Holds no mutable state: it can be shared by several block-processing
/// pipelines as long as each brings its own state. It performs no
/// authorization check on `from`, enforces no gas limit of its own and
/// never retries; those are the driver's decisions.
#[derive(Debug, Clone)]
pub struct SystemCallExecutor<E, D = TracingDiagnostics> {
    engine: E,
    diagnostics: D,
    config: SystemCallConfig,
}

impl<E> SystemCallExecutor<E> {
    /// Executor reporting failures through `tracing`, zero gas price
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            diagnostics: TracingDiagnostics,
            config: SystemCallConfig::default(),
        }
    }
}

impl<E, D> SystemCallExecutor<E, D> {
    /// Replace the failure reporter
    pub fn with_diagnostics<D2>(self, diagnostics: D2) -> SystemCallExecutor<E, D2> {
        SystemCallExecutor {
            engine: self.engine,
            diagnostics,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: SystemCallConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn config(&self) -> &SystemCallConfig {
        &self.config
    }
}

impl<E: ExecutionEngine, D: Diagnostics> SystemCallExecutor<E, D> {
    /// Execute `message` as a direct call against `state`
    ///
    /// `state` must be positioned right before this call in the block's
    /// processing order. Whatever the engine did to it stays: on failure the
    /// engine has already undone its own frame, and this method adds no
    /// rollback, refund or balance adjustment.
    ///
    /// Nothing is logged on success; a failure is reported once through the
    /// diagnostics sink.
    pub fn execute<S: StateStore + ?Sized>(
        &self,
        message: &Message,
        state: &mut S,
        header: &Header,
        chain: &dyn ChainContext,
        chain_config: &ChainConfig,
    ) -> Result<Vec<u8>, SystemCallError> {
        let Some(to) = message.to else {
            return Err(SystemCallError::MissingDestination);
        };

        let block = BlockContext::new(header, chain, None);
        let tx = TxContext {
            origin: message.from,
            gas_price: self.config.gas_price(),
        };
        let mut env = Environment::new(block, tx, state, chain_config, VmConfig::default());

        let outcome = self.engine.call(
            &mut env,
            message.from,
            to,
            &message.data,
            message.gas,
            message.value,
        );
        drop(env);

        outcome.into_result().map_err(|(output, error)| {
            self.diagnostics.call_failed(message, &output, &error);
            SystemCallError::Execution { output, error }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MemoryChain, RecordingDiagnostics, ScriptEngine};
    use crate::state::MemoryState;
    use crate::system_contracts::{SYSTEM_ADDRESS, VALIDATOR_CONTRACT};
    use crate::types::Address;

    #[test]
    fn test_missing_destination_touches_nothing() {
        let chain = MemoryChain::with_length(2);
        let header = chain.next_header(Address::from_low_u64(7), 10);
        let mut state = MemoryState::new();
        let diagnostics = RecordingDiagnostics::default();
        let executor = SystemCallExecutor::new(ScriptEngine::new()).with_diagnostics(&diagnostics);

        let msg = Message::new(SYSTEM_ADDRESS, None, vec![1, 2, 3], 100_000, 0);
        let err = executor
            .execute(&msg, &mut state, &header, &chain, &ChainConfig::dev())
            .unwrap_err();

        assert_eq!(err, SystemCallError::MissingDestination);
        assert!(err.output().is_empty());
        assert!(err.execution_error().is_none());
        assert_eq!(state.journal_len(), 0);
        assert_eq!(executor.engine().calls(), 0);
        assert!(diagnostics.records().is_empty());
    }

    #[test]
    fn test_call_to_empty_account_succeeds_with_no_output() {
        let chain = MemoryChain::with_length(2);
        let header = chain.next_header(Address::from_low_u64(7), 10);
        let mut state = MemoryState::new();
        let executor = SystemCallExecutor::new(ScriptEngine::new());

        let msg = Message::system(SYSTEM_ADDRESS, VALIDATOR_CONTRACT, vec![], 0);
        let output = executor
            .execute(&msg, &mut state, &header, &chain, &ChainConfig::dev())
            .unwrap();

        assert!(output.is_empty());
        assert_eq!(executor.engine().calls(), 1);
    }

    #[test]
    fn test_chain_as_trait_object() {
        let memory = MemoryChain::with_length(3);
        let header = memory.next_header(Address::from_low_u64(7), 10);
        let chain: Box<dyn ChainContext> = Box::new(memory);
        let mut state = MemoryState::new();
        let executor = SystemCallExecutor::new(ScriptEngine::new());

        let msg = Message::system(SYSTEM_ADDRESS, VALIDATOR_CONTRACT, vec![], 0);
        let output = executor
            .execute(&msg, &mut state, &header, chain.as_ref(), &ChainConfig::dev())
            .unwrap();

        assert!(output.is_empty());
        assert_eq!(executor.engine().observed()[0].coinbase, Address::from_low_u64(7));
    }

    #[test]
    fn test_error_accessors() {
        let err = SystemCallError::Execution {
            output: b"reason".to_vec(),
            error: ExecutionError::Reverted,
        };
        assert_eq!(err.output(), b"reason");
        assert_eq!(err.execution_error(), Some(&ExecutionError::Reverted));
        assert_eq!(err.to_string(), "system call failed: execution reverted");
    }

    #[test]
    fn test_executor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SystemCallExecutor<ScriptEngine>>();
    }
}

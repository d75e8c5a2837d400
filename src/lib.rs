//! PoA Syscall - system-call execution adapter
//!
//! Bridges a proof-of-authority consensus engine and the contract execution
//! layer: the consensus driver builds a [`Message`] aimed at a system contract
//! (validator set, slashing, reward distribution, ...) and the
//! [`SystemCallExecutor`] runs it as exactly one direct call against the
//! caller's state, with a gas price fixed at zero.
//!
//! ## Collaborators
//!
//! ```text
//! consensus driver ──Message──▶ SystemCallExecutor ──call──▶ ExecutionEngine
//!                                       │                          │
//!                         BlockContext ◀┘ (Header + ChainContext)  ▼
//!                                                              StateStore
//! ```
//!
//! The execution engine, the state store and the chain context are traits the
//! caller injects; nothing here reaches into process-wide state.
//!
//! ## Determinism
//!
//! Two honest nodes executing the same message against the same header, chain
//! configuration and state must produce bit-identical output and state. All
//! inputs are bound before the call and the state is borrowed exclusively for
//! its duration.

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod executor;
pub mod state;
pub mod system_contracts;
pub mod types;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

#[cfg(test)]
mod tests;

pub use config::{ChainConfig, ConfigError, GasPricing, ParliaConfig, Rules, SystemCallConfig};
pub use context::{BlockContext, ChainContext, ConsensusEngine, ContextError, TxContext};
pub use diagnostics::{Diagnostics, NoopDiagnostics, TracingDiagnostics};
pub use engine::{CallOutcome, Environment, ExecutionEngine, ExecutionError, GasMeter, VmConfig};
pub use executor::{SystemCallError, SystemCallExecutor};
pub use state::{MemoryState, SnapshotId, StateError, StateStore};
pub use types::{Address, Balance, BlockNumber, Gas, Hash, Header, Message, Nonce, Timestamp};

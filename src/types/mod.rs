// Types - Values exchanged between the consensus driver and the executor
// Principle: Plain data, bound before the call, never mutated during it

pub mod primitives;
pub mod header;
pub mod message;

pub use primitives::*;
pub use header::*;
pub use message::*;

// Execution errors - Failures an engine reports for a call
use super::gas::GasError;

/// Engine-reported call failure
///
/// The executor hands these back untouched; it never inspects the kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("execution reverted")]
    Reverted,

    #[error("out of gas")]
    OutOfGas,

    #[error("invalid opcode: 0x{0:02x}")]
    InvalidOpcode(u8),

    #[error("insufficient balance for transfer")]
    InsufficientBalance,

    #[error("max call depth exceeded")]
    DepthLimit,

    #[error("write protection")]
    WriteProtection,

    #[error("gas uint64 overflow")]
    GasOverflow,

    #[error("{0}")]
    Engine(String),
}

impl ExecutionError {
    /// Reverts refund unused gas; every other failure consumes it all
    pub fn consumes_all_gas(&self) -> bool {
        !matches!(self, ExecutionError::Reverted)
    }
}

impl From<GasError> for ExecutionError {
    fn from(err: GasError) -> Self {
        match err {
            GasError::OutOfGas { .. } => ExecutionError::OutOfGas,
            GasError::Overflow => ExecutionError::GasOverflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ExecutionError::Reverted.to_string(), "execution reverted");
        assert_eq!(ExecutionError::InvalidOpcode(0xfe).to_string(), "invalid opcode: 0xfe");
        assert_eq!(ExecutionError::Engine("boom".into()).to_string(), "boom");
    }

    #[test]
    fn test_gas_error_conversion() {
        let err: ExecutionError = GasError::OutOfGas { needed: 5, remaining: 1 }.into();
        assert_eq!(err, ExecutionError::OutOfGas);
        assert!(err.consumes_all_gas());
        assert!(!ExecutionError::Reverted.consumes_all_gas());
    }
}

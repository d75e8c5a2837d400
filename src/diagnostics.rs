// Diagnostics - Where failed system calls are reported
//
// Reporting is observational: it never changes what the executor returns
// or the state the failed call left behind.

use crate::engine::ExecutionError;
use crate::types::Message;
use tracing::error;

/// Sink for failed-call reports
pub trait Diagnostics {
    /// Called once per failed call, before the error is returned
    fn call_failed(&self, message: &Message, output: &[u8], error: &ExecutionError);
}

/// Reports through `tracing` at error level (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn call_failed(&self, message: &Message, output: &[u8], err: &ExecutionError) {
        let to = message
            .to
            .map(|to| to.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        error!(
            from = %message.from,
            to = %to,
            msg = %String::from_utf8_lossy(output),
            err = %err,
            "apply message failed"
        );
    }
}

/// Discards reports
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn call_failed(&self, _message: &Message, _output: &[u8], _error: &ExecutionError) {}
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn call_failed(&self, message: &Message, output: &[u8], error: &ExecutionError) {
        (**self).call_failed(message, output, error)
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for std::sync::Arc<D> {
    fn call_failed(&self, message: &Message, output: &[u8], error: &ExecutionError) {
        (**self).call_failed(message, output, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system_contracts::{SLASH_CONTRACT, SYSTEM_ADDRESS};

    #[test]
    fn test_tracing_diagnostics_does_not_panic_on_binary_output() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let msg = Message::system(SYSTEM_ADDRESS, SLASH_CONTRACT, vec![], 0);
        TracingDiagnostics.call_failed(&msg, &[0xff, 0xfe, b'o', b'k'], &ExecutionError::Reverted);
        NoopDiagnostics.call_failed(&msg, b"ignored", &ExecutionError::OutOfGas);
    }
}

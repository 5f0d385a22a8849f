use log::error;

use crate::config::LOG_TARGET;

/// Destination of invariant diagnostics
pub trait LogSink: Send + Sync {
    /// Unrecoverable violation, the process is expected to halt right after
    fn fatal(&self, message: &str);

    /// Violation that does not stop ledger processing
    fn error(&self, message: &str);
}

/// Sink forwarding to the `log` facade under the invariant target.
///
/// The facade has no fatal level, fatal lines are logged as errors with a
/// `FATAL` prefix so they can be told apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn fatal(&self, message: &str) {
        error!(target: LOG_TARGET, "FATAL: {}", message);
    }

    fn error(&self, message: &str) {
        error!(target: LOG_TARGET, "{}", message);
    }
}

use autodeputy_application::{DiagnosticEntry, DiagnosticSink};
use tracing::error;

/// Diagnostic sink that emits each entry as one `tracing` error event.
///
/// The entry message becomes the event message; the backtrace travels in the
/// `backtrace` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnosticSink;

impl TracingDiagnosticSink {
    /// Creates the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingDiagnosticSink {
    fn log_error(&self, entry: &DiagnosticEntry) {
        error!(backtrace = %entry.backtrace, "{}", entry.message);
    }
}

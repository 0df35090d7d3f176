use thiserror::Error;

/// Errors from building or signing an outside execution.
#[derive(Debug, Error)]
pub enum OutsideExecutionError {
    /// The validity window is empty.
    #[error("execute_after ({execute_after}) must be before execute_before ({execute_before})")]
    InvalidTimeWindow {
        /// Earliest execution time, exclusive.
        execute_after: u64,
        /// Latest execution time, exclusive.
        execute_before: u64,
    },

    /// The signer failed.
    #[error("signing failed: {0}")]
    Signing(#[source] signature::Error),
}

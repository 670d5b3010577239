//! Build errors for machine construction.

use thiserror::Error;

/// Errors that can occur when building a counter machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Reset policy not specified. Call .reset_policy(policy) before .build()")]
    MissingResetPolicy,

    #[error("Limit must be at least 1")]
    ZeroLimit,
}

//! Cache and snapshot error types.

use thiserror::Error;

/// Errors that can occur reading or writing cached properties.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A cached entry exists but is not valid JSON for its property.
    #[error("Failed to decode cached '{property}': {source}")]
    Decode {
        property: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of a property or snapshot failed.
    #[error("Failed to encode '{property}': {source}")]
    Encode {
        property: String,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot version is not supported by this build.
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

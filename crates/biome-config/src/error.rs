//! Configuration error types.

/// Errors raised while loading, saving or checking a [`Config`](crate::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("failed to read biome settings: {0}")]
    ReadError(#[source] std::io::Error),

    /// The settings file or its directory could not be written.
    #[error("failed to write biome settings: {0}")]
    WriteError(#[source] std::io::Error),

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse biome settings: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("failed to serialize biome settings: {0}")]
    SerializeError(#[source] ron::Error),

    /// A value parsed fine but is out of its usable range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

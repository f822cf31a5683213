//! Error types for the engine's component boundaries.

use thiserror::Error;

/// Errors from loading or parsing configuration. A malformed or missing
/// file never aborts the whole load — individual sections fall back to
/// defaults with a logged warning — so this type only surfaces when the
/// caller asked to load a file that genuinely cannot be read or parsed at
/// all (e.g. `from_file` on a nonexistent path with no fallback requested).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Errors surfaced by the tension engine's core operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("repository failure: {0}")]
    RepositoryFailure(String),
    #[error("faction service error: {0}")]
    FactionService(#[from] FactionServiceError),
}

/// Errors from the `FactionService` read-only port.
#[derive(Debug, Error)]
pub enum FactionServiceError {
    #[error("faction not found: {0}")]
    NotFound(String),
    #[error("faction service unavailable: {0}")]
    Unavailable(String),
}

//! Error types.
//!
//! Invariant violations (hp outside `[0, hp_max]`) are not errors: they are
//! clamped at the single mutation entry point. Missing assets are not errors
//! either once they reach the compositor, which substitutes a placeholder.

use thiserror::Error;

use super::id::EntityId;

/// Failure of the roster store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding the snapshot failed.
    #[error("store encoding error: {0}")]
    Encode(#[from] bincode::Error),

    /// The record to update or delete does not exist.
    #[error("no stored record for {0}")]
    Missing(EntityId),

    /// The store refused the write (read-only, full, closed).
    #[error("store rejected write: {0}")]
    Rejected(String),
}

/// A logical asset could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("asset '{name}' is unavailable")]
    Unavailable { name: String },
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors reported by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The operation referenced an entity that is not in the roster.
    #[error("{0} not found in roster")]
    NotFound(EntityId),

    /// No bestiary template matches the requested id or name.
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    /// The roster store failed; the in-memory roster was left unchanged.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = EngineError::NotFound(EntityId(4));
        assert_eq!(e.to_string(), "Entity(4) not found in roster");

        let e: EngineError = StoreError::Missing(EntityId(2)).into();
        assert_eq!(e.to_string(), "persistence failed: no stored record for Entity(2)");

        let e = ResourceError::Unavailable { name: "icons/boots".into() };
        assert_eq!(e.to_string(), "asset 'icons/boots' is unavailable");
    }
}

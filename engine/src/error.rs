//! Error type shared by every engine entry point

/// Errors raised by the engine.
///
/// An unreachable acquisition target is not an error; see [`crate::Cost::Unreachable`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid cost tier {0} (expected 1-5)")]
    InvalidTier(u8),
    #[error("invalid player level {0} (expected 1-10)")]
    InvalidLevel(u8),
    #[error("invalid constants table: {0}")]
    InvalidConstants(String),
    #[error("invalid simulation parameter: {0}")]
    InvalidParameter(String),
}

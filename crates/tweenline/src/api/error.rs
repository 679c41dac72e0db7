use thiserror::Error;

use super::types::TweenId;

/// Errors reported by node construction and playback control.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    /// The operation makes no sense for the node's current configuration
    /// (completing an infinite loop, editing a sequence that already started).
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// A value handed to a factory or builder cannot be scheduled.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The handle no longer refers to an active node.
    #[error("tween {0:?} not found (killed, completed or nested)")]
    NotFound(TweenId),
}

impl TweenError {
    /// True for stale-handle errors, which callers can usually ignore.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TweenError::NotFound(_))
    }
}

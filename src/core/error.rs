//! # Errors
//!
//! One enum per collaborator plus the session-level error the event loop
//! terminates with. Variants carry enough info to decide retryability,
//! which only the retry decorator in `inventory::retry` acts on.

use std::time::Duration;

use thiserror::Error;

/// Failure while listing candidates. Always fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Collaborator misconfigured (bad URL). Not retryable.
    #[error("config error: {0}")]
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    #[error("network error: {0}")]
    Network(String),
    /// The inventory answered with an error status. Retryable if >= 500 or 429.
    #[error("inventory error (HTTP {status}): {message}")]
    Status { status: u16, message: String },
    /// The inventory answered with something we could not decode. Not retryable.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SourceError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Network(_) => true,
            SourceError::Status { status, .. } => retryable_status(*status),
            SourceError::Config(_) | SourceError::Parse(_) => false,
        }
    }
}

/// Failure while interrupting the confirmed selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("interrupt rejected (HTTP {status}): {message}")]
    Status { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    /// The call did not finish within the configured action timeout.
    #[error("interrupt timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}

impl ActionError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ActionError::Network(_) => true,
            ActionError::Status { status, .. } => retryable_status(*status),
            ActionError::Parse(_) | ActionError::TimedOut(_) => false,
        }
    }
}

fn retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

/// Why a session ended unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("failed to list Spot instances: {0}")]
    Source(#[from] SourceError),
    #[error("failed to interrupt Spot instances: {0}")]
    Action(#[from] ActionError),
    /// Drawing or terminal setup failed.
    #[error("terminal error: {0}")]
    Terminal(String),
    /// No tokio runtime to run the collaborator calls on.
    #[error("runtime error: {0}")]
    Runtime(String),
}

use thiserror::Error;
use zigjoin_model::StackStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("No joinable network found in scan results")]
    NoJoinableNetwork,

    #[error("Join command rejected by the stack: {0}")]
    ImmediateJoinFailure(StackStatus),

    #[error("Join abandoned before the stack reported a status")]
    JoinAbandoned,

    #[error("Stack status resolved more than once")]
    DuplicateResolution,

    #[error("Network did not come up: {0}")]
    NetworkNotUp(StackStatus),

    #[error("Driver error: {0}")]
    Driver(String),
}

impl JoinError {
    /// Status reported by the chip, when the error carries one.
    pub fn status(&self) -> Option<StackStatus> {
        match self {
            JoinError::ImmediateJoinFailure(status)
            | JoinError::NetworkNotUp(status) => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry the join without rescanning.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            JoinError::ImmediateJoinFailure(_)
                | JoinError::JoinAbandoned
                | JoinError::NetworkNotUp(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, JoinError>;

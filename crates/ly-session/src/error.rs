//! Error types for divination sessions.

use ly_core::{CoreError, Method};

use crate::session::SessionState;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while configuring or driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The question was empty or only whitespace.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// The method is a valid tag but is not cast by three coins.
    #[error("method '{0}' is not supported by the coin engine")]
    UnsupportedMethod(Method),

    /// An action that the current state does not allow.
    #[error("cannot {action} a session that is {state}")]
    InvalidTransition {
        /// State the session was in.
        state: SessionState,
        /// The rejected action.
        action: &'static str,
    },

    /// The background task driving the session panicked or was aborted.
    #[error("session task failed: {0}")]
    Driver(String),

    /// A core precondition was violated (e.g. the coin source ran dry).
    #[error(transparent)]
    Core(#[from] CoreError),
}

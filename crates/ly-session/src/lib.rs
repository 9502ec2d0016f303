//! Divination sessions for Liuyao.
//!
//! A [`DivinationSession`] walks through six coin tosses one round at a
//! time and resolves them into a [`ly_core::DivinationRecord`]. The
//! [`driver`] runs a session on a tokio task, pacing rounds and honouring
//! skips between them. [`interpret`] builds the request body for the
//! commentary service and attaches whatever comes back.

pub mod config;
pub mod driver;
pub mod error;
pub mod interpret;
pub mod session;

pub use config::{SessionConfig, SkipPolicy};
pub use driver::{
    Canceller, FixedPacing, NoPacing, Pacer, SessionHandle, SessionHooks, SessionOutcome,
    start_session,
};
pub use error::{SessionError, SessionResult};
pub use interpret::{
    Commentary, Focus, HexagramInfo, InterpretError, Interpretation, InterpretationRequest,
    Interpreter, Language, LocalInterpreter, Reading, ReadingRule, Style,
};
pub use session::{DivinationSession, LineEvent, SessionState, Step};

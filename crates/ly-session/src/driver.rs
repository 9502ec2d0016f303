//! Async driver: runs a session on a tokio task with caller-owned pacing.
//!
//! The driver loops `pause -> check for skip -> advance`. A skip is only
//! observed between rounds, so a round is either recorded in full or not at
//! all. A skip that lands after the sixth round is ignored.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use ly_core::{CoinSource, DivinationRecord};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::session::{DivinationSession, LineEvent, SessionState, Step};

/// Supplies the delay before each round.
pub trait Pacer: Send + 'static {
    /// Wait before tossing `round` (1-6).
    fn pause(&mut self, round: u8) -> impl Future<Output = ()> + Send;
}

/// No delay between rounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _round: u8) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

/// The same delay before every round.
#[derive(Debug, Clone, Copy)]
pub struct FixedPacing(pub Duration);

impl Pacer for FixedPacing {
    fn pause(&mut self, _round: u8) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(self.0)
    }
}

type LineCallback = Box<dyn FnMut(&LineEvent) + Send>;
type CancelCallback = Box<dyn FnMut() + Send>;

/// Optional observers of a running session.
#[derive(Default)]
pub struct SessionHooks {
    on_line_resolved: Option<LineCallback>,
    on_cancel_requested: Option<CancelCallback>,
}

impl SessionHooks {
    /// Called after each line is accepted.
    pub fn on_line_resolved(mut self, f: impl FnMut(&LineEvent) + Send + 'static) -> Self {
        self.on_line_resolved = Some(Box::new(f));
        self
    }

    /// Called when the driver observes a skip, before the skip is applied.
    pub fn on_cancel_requested(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_cancel_requested = Some(Box::new(f));
        self
    }

    fn line_resolved(&mut self, event: &LineEvent) {
        if let Some(f) = self.on_line_resolved.as_mut() {
            f(event);
        }
    }

    fn cancel_requested(&mut self) {
        if let Some(f) = self.on_cancel_requested.as_mut() {
            f();
        }
    }
}

/// How a driven session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// All six rounds were played.
    Completed(DivinationRecord),
    /// The session was skipped; the record is present under the synthesize policy.
    Cancelled(Option<DivinationRecord>),
}

impl SessionOutcome {
    /// The record, if the session produced one.
    pub fn record(&self) -> Option<&DivinationRecord> {
        match self {
            Self::Completed(record) => Some(record),
            Self::Cancelled(record) => record.as_ref(),
        }
    }

    /// Take the record, if the session produced one.
    pub fn into_record(self) -> Option<DivinationRecord> {
        match self {
            Self::Completed(record) => Some(record),
            Self::Cancelled(record) => record,
        }
    }

    /// Returns true if the session was skipped.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// A cloneable way to skip a running session from elsewhere.
#[derive(Debug, Clone)]
pub struct Canceller(Arc<watch::Sender<bool>>);

impl Canceller {
    /// Request a skip. Idempotent.
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Handle to a session running on a tokio task.
#[derive(Debug)]
pub struct SessionHandle {
    canceller: Canceller,
    task: JoinHandle<SessionResult<SessionOutcome>>,
}

impl SessionHandle {
    /// Request a skip; it takes effect before the next round.
    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    /// A cloneable canceller for this session.
    pub fn canceller(&self) -> Canceller {
        self.canceller.clone()
    }

    /// Wait for the session to complete or be cancelled.
    pub async fn result(self) -> SessionResult<SessionOutcome> {
        let Self { canceller, task } = self;
        let outcome = task
            .await
            .map_err(|e| SessionError::Driver(e.to_string()))?;
        drop(canceller);
        outcome
    }
}

/// Validate the configuration and start driving a session.
///
/// Must be called from within a tokio runtime.
pub fn start_session<S, P>(
    config: SessionConfig,
    source: S,
    pacer: P,
    hooks: SessionHooks,
) -> SessionResult<SessionHandle>
where
    S: CoinSource + Send + 'static,
    P: Pacer,
{
    let session = DivinationSession::new(config, source)?;
    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(drive(session, pacer, hooks, rx));
    Ok(SessionHandle {
        canceller: Canceller(Arc::new(tx)),
        task,
    })
}

async fn drive<S, P>(
    mut session: DivinationSession<S>,
    mut pacer: P,
    mut hooks: SessionHooks,
    mut cancel_rx: watch::Receiver<bool>,
) -> SessionResult<SessionOutcome>
where
    S: CoinSource,
    P: Pacer,
{
    session.start()?;
    loop {
        // Once the sixth line is in, a skip no longer applies.
        if let SessionState::Tossing { round } = session.state() {
            tokio::select! {
                biased;
                Ok(()) = cancel_rx.changed() => {}
                () = pacer.pause(round) => {}
            }

            let cancelled = *cancel_rx.borrow();
            if cancelled {
                debug!(state = %session.state(), "skip observed");
                hooks.cancel_requested();
                return session.cancel().map(SessionOutcome::Cancelled);
            }
        }

        match session.advance()? {
            Step::Line(event) => hooks.line_resolved(&event),
            Step::Completed(record) => return Ok(SessionOutcome::Completed(record)),
        }
    }
}

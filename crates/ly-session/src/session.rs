//! The staged six-round divination session.
//!
//! `DivinationSession` is a plain state machine. It never sleeps and never
//! spawns; whoever drives it decides how long to wait between rounds and
//! when to check for a skip. See [`crate::driver`] for the async driver.
//!
//! ```text
//! Preparing -> Tossing(1) -> ... -> Tossing(6) -> Resolving -> Completed
//!     \______________\_________________\______________\-> Cancelled
//! ```
//!
//! An exhausted coin source moves the session to `Failed`.

use tracing::{debug, info, warn};

use ly_core::resolve::{self, to_lines};
use ly_core::{CoinSource, DivinationRecord, LINE_COUNT, Line, Origin, Toss, toss};

use crate::config::{SessionConfig, SkipPolicy};
use crate::error::{SessionError, SessionResult};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Built, not yet started.
    Preparing,
    /// Waiting to toss the given round (1-6, round 1 is the bottom line).
    Tossing {
        /// The next round to toss.
        round: u8,
    },
    /// All six lines are in; the hexagrams are not yet derived.
    Resolving,
    /// The record has been handed out.
    Completed,
    /// Skipped by the caller.
    Cancelled,
    /// The coin source ran out mid-toss.
    Failed,
}

impl SessionState {
    /// Returns true once no further action is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preparing => write!(f, "preparing"),
            Self::Tossing { round } => write!(f, "tossing round {round}"),
            Self::Resolving => write!(f, "resolving"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One line accepted into the cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    /// The round that produced it (1-6).
    pub round: u8,
    /// Its position in the hexagram (0 = bottom).
    pub position: usize,
    /// The coins and resulting line.
    pub toss: Toss,
}

/// What a call to [`DivinationSession::advance`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A round was tossed and its line recorded.
    Line(LineEvent),
    /// The cast was resolved; the record is handed over.
    Completed(DivinationRecord),
}

/// A single divination, from first toss to record.
pub struct DivinationSession<S> {
    config: SessionConfig,
    source: S,
    state: SessionState,
    lines: Vec<Line>,
}

impl<S: CoinSource> DivinationSession<S> {
    /// Create a session. The configuration is validated here.
    pub fn new(config: SessionConfig, source: S) -> SessionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            state: SessionState::Preparing,
            lines: Vec::with_capacity(LINE_COUNT),
        })
    }

    /// The current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The lines accepted so far, bottom first.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Begin tossing.
    pub fn start(&mut self) -> SessionResult<()> {
        if self.state != SessionState::Preparing {
            return Err(self.invalid("start"));
        }
        debug!(question = %self.config.question, method = %self.config.method, "session started");
        self.state = SessionState::Tossing { round: 1 };
        Ok(())
    }

    /// Toss the next round, or resolve once all six lines are in.
    pub fn advance(&mut self) -> SessionResult<Step> {
        match self.state {
            SessionState::Tossing { round } => {
                let toss = toss(&mut self.source).map_err(|e| self.fail(e.into()))?;
                let position = self.lines.len();
                self.lines.push(toss.line);
                debug!(round, line = %toss.line, changing = toss.is_changing(), "line cast");
                self.state = if usize::from(round) < LINE_COUNT {
                    SessionState::Tossing { round: round + 1 }
                } else {
                    SessionState::Resolving
                };
                Ok(Step::Line(LineEvent {
                    round,
                    position,
                    toss,
                }))
            }
            SessionState::Resolving => {
                let lines = to_lines(&self.lines)?;
                let record = self.finish(lines, Origin::Observed);
                self.state = SessionState::Completed;
                Ok(Step::Completed(record))
            }
            _ => Err(self.invalid("advance")),
        }
    }

    /// Skip the rest of the session.
    ///
    /// Under [`SkipPolicy::Synthesize`] the partial cast is discarded and six
    /// fresh lines are tossed at once; under [`SkipPolicy::Abort`] no record
    /// is produced. Only allowed while `Preparing` or `Tossing`: once all six
    /// lines are in, the observed cast is resolved as is.
    pub fn cancel(&mut self) -> SessionResult<Option<DivinationRecord>> {
        if !matches!(
            self.state,
            SessionState::Preparing | SessionState::Tossing { .. }
        ) {
            return Err(self.invalid("cancel"));
        }
        debug!(state = %self.state, discarded = self.lines.len(), "session skipped");
        self.lines.clear();
        match self.config.skip_policy {
            SkipPolicy::Abort => {
                self.state = SessionState::Cancelled;
                info!("session cancelled without a result");
                Ok(None)
            }
            SkipPolicy::Synthesize => {
                let mut lines = [Line::YoungYang; LINE_COUNT];
                for slot in &mut lines {
                    *slot = toss(&mut self.source).map_err(|e| self.fail(e.into()))?.line;
                }
                self.state = SessionState::Cancelled;
                Ok(Some(self.finish(lines, Origin::Synthesized)))
            }
        }
    }

    /// Start if needed and play every remaining round without pause.
    pub fn run_to_completion(&mut self) -> SessionResult<DivinationRecord> {
        if self.state == SessionState::Preparing {
            self.start()?;
        }
        loop {
            if let Step::Completed(record) = self.advance()? {
                return Ok(record);
            }
        }
    }

    fn finish(&self, lines: ly_core::Lines, origin: Origin) -> DivinationRecord {
        let resolution = resolve::resolve(lines);
        info!(
            original = resolution.original.name,
            transformed = resolution.transformed.as_ref().map(|t| t.hexagram.name),
            changing = ?resolution.changing,
            ?origin,
            "cast resolved"
        );
        DivinationRecord::new(
            &resolution,
            self.config.method,
            origin,
            self.config.question.clone(),
            self.config.category,
        )
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        warn!(state = %self.state, error = %err, "session failed");
        self.state = SessionState::Failed;
        self.lines.clear();
        err
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use ly_core::{Category, CoreError, FixedCoins, Pattern};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn scripted(script: &str) -> DivinationSession<FixedCoins> {
        DivinationSession::new(
            SessionConfig::new("What should I know?").with_category(Category::Study),
            FixedCoins::parse(script).unwrap(),
        )
        .unwrap()
    }

    fn seeded(seed: u64) -> DivinationSession<StdRng> {
        DivinationSession::new(
            SessionConfig::new("What should I know?"),
            StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn walks_through_every_state() {
        let mut s = scripted(&"hhh ".repeat(6));
        assert_eq!(s.state(), SessionState::Preparing);
        s.start().unwrap();
        for round in 1..=6u8 {
            assert_eq!(s.state(), SessionState::Tossing { round });
            match s.advance().unwrap() {
                Step::Line(event) => {
                    assert_eq!(event.round, round);
                    assert_eq!(event.position, usize::from(round) - 1);
                    assert_eq!(event.toss.line, Line::OldYin);
                }
                Step::Completed(_) => panic!("completed early"),
            }
        }
        assert_eq!(s.state(), SessionState::Resolving);
        let Step::Completed(record) = s.advance().unwrap() else {
            panic!("expected a record");
        };
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(record.origin, Origin::Observed);
        assert_eq!(record.category, Some(Category::Study));
    }

    #[test]
    fn all_heads_scenario() {
        let record = scripted(&"hhh".repeat(6)).run_to_completion().unwrap();
        assert_eq!(record.original, [Line::OldYin; 6]);
        assert_eq!(Pattern::from_lines(&record.original).encode(), "000000");
        assert_eq!(record.original_hexagram().name, "坤为地");
        let transformed = record.transformed_hexagram().unwrap();
        assert_eq!(transformed.pattern.encode(), "111111");
        assert_eq!(transformed.name, "乾为天");
        assert_eq!(record.changing_lines, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn all_tails_scenario() {
        let record = scripted(&"ttt".repeat(6)).run_to_completion().unwrap();
        assert_eq!(record.original, [Line::OldYang; 6]);
        assert_eq!(record.original_hexagram().pattern.encode(), "111111");
        assert_eq!(
            record.transformed_hexagram().unwrap().pattern.encode(),
            "000000"
        );
        assert_eq!(record.changing_lines, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn static_cast_scenario() {
        let script = format!("htt {}", "hht ".repeat(5));
        let record = scripted(&script).run_to_completion().unwrap();
        assert_eq!(record.original[0], Line::YoungYin);
        assert!(record.original[1..].iter().all(|l| *l == Line::YoungYang));
        assert_eq!(record.original_hexagram().pattern.encode(), "011111");
        assert!(record.changing_lines.is_empty());
        assert!(record.transformed.is_none());
        assert!(record.transformed_hexagram().is_none());
    }

    #[test]
    fn rounds_fill_bottom_to_top() {
        // Round 1 yields 9 at the bottom, round 6 yields 6 at the top.
        let script = format!("ttt {}hhh", "hht ".repeat(4));
        let mut s = scripted(&script);
        let record = s.run_to_completion().unwrap();
        assert_eq!(record.original[0], Line::OldYang);
        assert_eq!(record.original[5], Line::OldYin);
        assert_eq!(record.changing_lines, vec![0, 5]);
    }

    #[test]
    fn accepted_lines_never_change() {
        let mut s = seeded(3);
        s.start().unwrap();
        let mut seen = Vec::new();
        for _ in 0..6 {
            if let Step::Line(event) = s.advance().unwrap() {
                seen.push(event.toss.line);
                assert_eq!(s.lines(), seen.as_slice());
            }
        }
        let Step::Completed(record) = s.advance().unwrap() else {
            panic!("expected a record");
        };
        assert_eq!(record.original.to_vec(), seen);
    }

    #[test]
    fn cancel_mid_session_synthesizes_a_valid_record() {
        let mut s = seeded(11);
        s.start().unwrap();
        for _ in 0..3 {
            s.advance().unwrap();
        }
        let record = s.cancel().unwrap().expect("synthesized record");
        assert_eq!(s.state(), SessionState::Cancelled);
        assert!(s.lines().is_empty());
        assert_eq!(record.origin, Origin::Synthesized);
        assert_eq!(
            record.changing_lines,
            ly_core::resolve::changing_lines(&record.original)
        );
        assert_eq!(
            record.transformed,
            (!record.changing_lines.is_empty()).then(|| ly_core::transform(record.original))
        );
    }

    #[test]
    fn cancel_with_abort_policy_yields_nothing() {
        let mut s = DivinationSession::new(
            SessionConfig::new("q").with_skip_policy(SkipPolicy::Abort),
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        s.start().unwrap();
        s.advance().unwrap();
        assert_eq!(s.cancel().unwrap(), None);
        assert_eq!(s.state(), SessionState::Cancelled);
    }

    #[test]
    fn cancel_before_start_is_allowed() {
        let mut s = seeded(5);
        assert!(s.cancel().unwrap().is_some());
        assert_eq!(s.state(), SessionState::Cancelled);
    }

    #[test]
    fn no_action_after_completion() {
        let mut s = seeded(9);
        s.run_to_completion().unwrap();
        assert!(matches!(
            s.cancel(),
            Err(SessionError::InvalidTransition {
                state: SessionState::Completed,
                action: "cancel"
            })
        ));
        assert!(s.advance().is_err());
        assert!(s.start().is_err());
    }

    #[test]
    fn cancel_after_last_round_keeps_observed_cast() {
        let mut s = scripted(&"ttt".repeat(6));
        s.start().unwrap();
        for _ in 0..6 {
            s.advance().unwrap();
        }
        assert_eq!(s.state(), SessionState::Resolving);
        assert!(matches!(
            s.cancel(),
            Err(SessionError::InvalidTransition {
                state: SessionState::Resolving,
                action: "cancel"
            })
        ));
        assert_eq!(s.lines(), [Line::OldYang; 6].as_slice());
        let Step::Completed(record) = s.advance().unwrap() else {
            panic!("expected a record");
        };
        assert_eq!(record.origin, Origin::Observed);
        assert_eq!(record.original, [Line::OldYang; 6]);
    }

    #[test]
    fn no_action_after_cancel() {
        let mut s = seeded(9);
        s.cancel().unwrap();
        assert!(s.cancel().is_err());
        assert!(s.advance().is_err());
    }

    #[test]
    fn advance_before_start_rejected() {
        let mut s = seeded(1);
        assert!(matches!(
            s.advance(),
            Err(SessionError::InvalidTransition {
                state: SessionState::Preparing,
                ..
            })
        ));
    }

    #[test]
    fn exhausted_source_fails_the_session() {
        let mut s = scripted("hhh hhh h");
        s.start().unwrap();
        s.advance().unwrap();
        s.advance().unwrap();
        let err = s.advance().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::CoinSourceExhausted { drawn: 1 })
        ));
        assert_eq!(s.state(), SessionState::Failed);
        assert!(s.lines().is_empty());
        assert!(s.advance().is_err());
        assert!(s.cancel().is_err());
    }

    #[test]
    fn synthesize_on_exhausted_source_fails() {
        let mut s = scripted("hhh");
        s.start().unwrap();
        s.advance().unwrap();
        assert!(s.cancel().is_err());
        assert_eq!(s.state(), SessionState::Failed);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let result = DivinationSession::new(SessionConfig::new(""), FixedCoins::default());
        assert!(matches!(result, Err(SessionError::EmptyQuestion)));
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Tossing { round: 3 }.to_string(), "tossing round 3");
        assert_eq!(SessionState::Cancelled.to_string(), "cancelled");
    }
}

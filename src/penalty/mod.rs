//! # Penalty Module
//!
//! The countdown-gated survival protocol entered when a quest is
//! forfeited: `Inactive -> Active(clicks) -> GateOpen -> Inactive`.
//!
//! The transition logic lives in [`PenaltyState`], which is pure and
//! clock-free. [`PenaltyEpisode`] wraps one live protocol run and owns its
//! side effects: the feedback cues and the periodic re-alarm task, whose
//! handle is cancelled exactly once when the gate opens. Episodes are
//! session-local; only the eventual survival outcome is persisted, via
//! [`crate::daily::record_survival`].

pub mod alarm;

pub use alarm::AlarmHandle;

use crate::config;
use crate::cue::{Cue, CueSink};
use std::sync::Arc;

/// Penalty protocol states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyState {
    /// No penalty in effect
    Inactive,
    /// Counting survive clicks down to the gate
    Active { clicks_remaining: u32 },
    /// Countdown complete; one confirming action remains
    GateOpen,
}

/// What a single survive interaction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurviveOutcome {
    /// Countdown decremented; the episode stays active
    Counted { clicks_remaining: u32 },
    /// The final countdown click opened the gate
    GateOpened,
    /// The confirming click ended the episode
    Survived,
    /// No penalty is active
    Idle,
}

impl PenaltyState {
    /// Enters the protocol with the full click countdown.
    pub fn begin() -> Self {
        PenaltyState::Active {
            clicks_remaining: config::PENALTY_CLICKS,
        }
    }

    /// Whether the protocol is in effect (counting or gate open).
    pub fn is_active(&self) -> bool {
        !matches!(self, PenaltyState::Inactive)
    }

    /// Processes one survive interaction.
    ///
    /// The countdown is monotonically non-increasing while active, the
    /// gate is never skipped, and exactly one post-gate interaction
    /// finalizes the episode.
    ///
    /// # Examples
    ///
    /// ```
    /// use arise::{PenaltyState, SurviveOutcome};
    ///
    /// let mut state = PenaltyState::Active { clicks_remaining: 2 };
    /// assert_eq!(state.survive(), SurviveOutcome::Counted { clicks_remaining: 1 });
    /// assert_eq!(state.survive(), SurviveOutcome::GateOpened);
    /// assert_eq!(state.survive(), SurviveOutcome::Survived);
    /// assert_eq!(state, PenaltyState::Inactive);
    /// ```
    pub fn survive(&mut self) -> SurviveOutcome {
        match *self {
            PenaltyState::Active { clicks_remaining } if clicks_remaining > 1 => {
                let clicks_remaining = clicks_remaining - 1;
                *self = PenaltyState::Active { clicks_remaining };
                SurviveOutcome::Counted { clicks_remaining }
            }
            PenaltyState::Active { .. } => {
                *self = PenaltyState::GateOpen;
                SurviveOutcome::GateOpened
            }
            PenaltyState::GateOpen => {
                *self = PenaltyState::Inactive;
                SurviveOutcome::Survived
            }
            PenaltyState::Inactive => SurviveOutcome::Idle,
        }
    }
}

/// One live penalty episode: the protocol state plus its side effects.
///
/// Owns the re-alarm task handle so a finished or abandoned episode can
/// never leave a timer running behind it.
pub struct PenaltyEpisode {
    state: PenaltyState,
    alarm: Option<AlarmHandle>,
    cues: Arc<dyn CueSink>,
}

impl PenaltyEpisode {
    /// Enters penalty mode: sounds the alarm, starts the periodic
    /// re-alarm, and arms the click countdown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(cues: Arc<dyn CueSink>) -> Self {
        cues.emit(Cue::Alarm);
        let alarm = AlarmHandle::spawn(Arc::clone(&cues));
        Self {
            state: PenaltyState::begin(),
            alarm: Some(alarm),
            cues,
        }
    }

    /// Current protocol state.
    pub fn state(&self) -> PenaltyState {
        self.state
    }

    /// Whether the episode still blocks other game actions.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Processes one survive interaction, emitting the matching cue.
    ///
    /// The re-alarm is stopped permanently for this episode at the
    /// gate-open transition. On [`SurviveOutcome::Survived`] the caller
    /// records the outcome through the daily cycle and persists.
    pub fn survive(&mut self) -> SurviveOutcome {
        let outcome = self.state.survive();
        match outcome {
            SurviveOutcome::Counted { .. } => self.cues.emit(Cue::Click),
            SurviveOutcome::GateOpened => {
                if let Some(alarm) = self.alarm.take() {
                    alarm.cancel();
                }
                self.cues.emit(Cue::LevelUp);
            }
            SurviveOutcome::Survived => self.cues.emit(Cue::Confirm),
            SurviveOutcome::Idle => {}
        }
        outcome
    }
}

impl Drop for PenaltyEpisode {
    fn drop(&mut self) {
        // An abandoned episode must not leave its re-alarm running.
        if let Some(alarm) = self.alarm.take() {
            alarm.cancel();
        }
    }
}

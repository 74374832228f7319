//! Audible/visual feedback cues.
//!
//! Game operations signal short feedback cues (the click of a countdown,
//! the penalty alarm) through a [`CueSink`]. The sink is display-only:
//! nothing downstream of a cue may mutate game state.

/// A short feedback signal emitted by game operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Penalty alarm, fired on entry and on probabilistic re-fires
    Alarm,
    /// One survive click counted
    Click,
    /// Action confirmed
    Confirm,
    /// Action rejected
    Error,
    /// Level-up fanfare; also the distinct gate-open signal
    LevelUp,
    /// Incoming system notification
    Notify,
}

/// Sink for feedback cues.
///
/// Implementations must be cheap and non-blocking; cues are emitted from
/// the state-transition path and from the penalty re-alarm task.
pub trait CueSink: Send + Sync {
    /// Emits a single cue.
    fn emit(&self, cue: Cue);
}

/// Cue sink that writes cues to the log.
#[derive(Debug, Default)]
pub struct LogCues;

impl CueSink for LogCues {
    fn emit(&self, cue: Cue) {
        log::debug!("cue: {:?}", cue);
    }
}

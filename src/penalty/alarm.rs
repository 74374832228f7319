//! Periodic probabilistic re-alarm for an active penalty episode.

use crate::config;
use crate::cue::{Cue, CueSink};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to the re-alarm task.
///
/// Owned by its penalty episode and cancelled exactly once, at the
/// gate-open transition (or when the episode is dropped). A handle never
/// outlives its episode, so repeated episodes cannot double-fire.
#[derive(Debug)]
pub struct AlarmHandle {
    task: JoinHandle<()>,
}

impl AlarmHandle {
    /// Spawns the re-alarm loop on the current tokio runtime.
    ///
    /// Every [`config::ALARM_INTERVAL`] the loop rolls a uniform value and
    /// re-fires the alarm cue when it exceeds
    /// [`config::ALARM_REFIRE_THRESHOLD`].
    pub fn spawn(cues: Arc<dyn CueSink>) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config::ALARM_INTERVAL);
            // The first tick of a tokio interval completes immediately;
            // entry already sounded the alarm.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if rand::random::<f64>() > config::ALARM_REFIRE_THRESHOLD {
                    cues.emit(Cue::Alarm);
                }
            }
        });
        Self { task }
    }

    /// Stops the re-alarm loop.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Whether the underlying task has already stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

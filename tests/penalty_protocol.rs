//! End-to-end exercise of the penalty survival protocol.

use arise::cue::{Cue, CueSink};
use arise::daily;
use arise::penalty::{AlarmHandle, PenaltyEpisode, PenaltyState, SurviveOutcome};
use arise::Player;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

/// Cue sink that remembers everything emitted.
#[derive(Default)]
struct RecordingCues {
    emitted: Mutex<Vec<Cue>>,
}

impl RecordingCues {
    fn count(&self, cue: Cue) -> usize {
        self.emitted
            .lock()
            .unwrap()
            .iter()
            .filter(|&&emitted| emitted == cue)
            .count()
    }
}

impl CueSink for RecordingCues {
    fn emit(&self, cue: Cue) {
        self.emitted.lock().unwrap().push(cue);
    }
}

#[tokio::test]
async fn test_full_survival_protocol() {
    let cues = Arc::new(RecordingCues::default());
    let sink: Arc<dyn CueSink> = cues.clone();

    let mut player = Player::new("jin@example.com".to_string(), "Jinwoo".to_string());
    let today = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
    let mut progress = daily::resolve_today(&player, today);
    let (gold_before, xp_before, level_before) = (player.gold, player.current_xp, player.level);

    let mut episode = PenaltyEpisode::trigger(sink);
    assert_eq!(
        episode.state(),
        PenaltyState::Active {
            clicks_remaining: 50
        }
    );
    assert!(cues.count(Cue::Alarm) >= 1);

    // 49 clicks count down to a single remaining click.
    for expected in (1..50).rev() {
        assert_eq!(
            episode.survive(),
            SurviveOutcome::Counted {
                clicks_remaining: expected
            }
        );
    }
    assert_eq!(
        episode.state(),
        PenaltyState::Active {
            clicks_remaining: 1
        }
    );
    assert_eq!(cues.count(Cue::Click), 49);

    // The 50th click opens the gate and signals it distinctly.
    assert_eq!(episode.survive(), SurviveOutcome::GateOpened);
    assert_eq!(episode.state(), PenaltyState::GateOpen);
    assert_eq!(cues.count(Cue::LevelUp), 1);

    // The 51st click finalizes survival.
    assert_eq!(episode.survive(), SurviveOutcome::Survived);
    assert!(!episode.is_active());
    daily::record_survival(&mut player, &mut progress);

    assert_eq!(player.history.len(), 1);
    assert!(player.history[0].penalty_survived);

    // Survival grants nothing.
    assert_eq!(player.gold, gold_before);
    assert_eq!(player.current_xp, xp_before);
    assert_eq!(player.level, level_before);

    // A finished episode stays finished.
    assert_eq!(episode.survive(), SurviveOutcome::Idle);
}

#[tokio::test]
async fn test_repeated_episodes_keep_independent_countdowns() {
    let sink: Arc<dyn CueSink> = Arc::new(RecordingCues::default());

    let mut first = PenaltyEpisode::trigger(Arc::clone(&sink));
    for _ in 0..51 {
        first.survive();
    }
    assert!(!first.is_active());

    // A fresh episode starts from the full countdown again.
    let second = PenaltyEpisode::trigger(sink);
    assert_eq!(
        second.state(),
        PenaltyState::Active {
            clicks_remaining: 50
        }
    );
}

#[tokio::test]
async fn test_alarm_handle_cancels() {
    let sink: Arc<dyn CueSink> = Arc::new(RecordingCues::default());
    let handle = AlarmHandle::spawn(sink);
    assert!(!handle.is_finished());
    handle.cancel();
}

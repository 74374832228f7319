//! # Daily Cycle Module
//!
//! One quest record per calendar date. "Today" is always an explicit
//! argument supplied by the caller, never read from the clock here; the
//! binary re-resolves it at each command dispatch so a session left open
//! across midnight picks up the new date on the next interaction.
//!
//! History has a single write path, [`upsert`], which replaces any entry
//! sharing the new entry's date. Everything quest-affecting funnels
//! through it, so the at-most-one-entry-per-date invariant holds
//! structurally.

use crate::config;
use crate::player::Player;
use crate::progression;
use crate::{AriseError, AriseResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single task-completion record tracked per calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub pushups: u32,
    pub situps: u32,
    pub squats: u32,
    pub running_km: u32,
    /// Set exactly once true per day, by quest completion
    pub completed: bool,
    /// Set when a penalty episode is survived on this date
    pub penalty_survived: bool,
}

impl DailyProgress {
    /// A zeroed record for the given date.
    pub fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            pushups: 0,
            situps: 0,
            squats: 0,
            running_km: 0,
            completed: false,
            penalty_survived: false,
        }
    }
}

/// Raw training counters a player can log against today's quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingField {
    Pushups,
    Situps,
    Squats,
    RunningKm,
}

impl TrainingField {
    /// Parses a counter name as typed by the player.
    pub fn from_name(name: &str) -> Option<TrainingField> {
        match name.to_lowercase().as_str() {
            "pushups" => Some(TrainingField::Pushups),
            "situps" => Some(TrainingField::Situps),
            "squats" => Some(TrainingField::Squats),
            "running" | "km" => Some(TrainingField::RunningKm),
            _ => None,
        }
    }
}

/// Derives today's quest record from the player's history.
///
/// Resumes the most recent entry when its date matches, otherwise
/// synthesizes a fresh zeroed record. Never mutates history; the record is
/// only committed when a quest-affecting action calls [`upsert`].
///
/// # Examples
///
/// ```
/// use arise::daily::resolve_today;
/// use arise::Player;
/// use chrono::NaiveDate;
///
/// let player = Player::new("jin@example.com".to_string(), "Jinwoo".to_string());
/// let today = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
///
/// let progress = resolve_today(&player, today);
/// assert_eq!(progress.date, today);
/// assert!(!progress.completed);
/// assert!(player.history.is_empty());
/// ```
pub fn resolve_today(player: &Player, today: NaiveDate) -> DailyProgress {
    match player.history.last() {
        Some(last) if last.date == today => last.clone(),
        _ => DailyProgress::fresh(today),
    }
}

/// Replace-by-date upsert: the single write path into history.
///
/// Removes any entry whose date matches, then appends. Only "today" (the
/// maximum date) is ever upserted, so history stays date-ordered.
pub fn upsert(history: &mut Vec<DailyProgress>, entry: DailyProgress) {
    history.retain(|h| h.date != entry.date);
    history.push(entry);
}

/// Bumps one raw training counter on today's record.
///
/// In-memory only; the record is committed to history by the next
/// quest-affecting action.
pub fn log_training(progress: &mut DailyProgress, field: TrainingField, amount: u32) {
    let counter = match field {
        TrainingField::Pushups => &mut progress.pushups,
        TrainingField::Situps => &mut progress.situps,
        TrainingField::Squats => &mut progress.squats,
        TrainingField::RunningKm => &mut progress.running_km,
    };
    *counter += amount;
}

/// What completing the daily quest changed, for feedback selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestOutcome {
    pub leveled_up: bool,
    pub rank_changed: bool,
}

/// Completes today's quest: awards experience and gold, marks the record,
/// bumps the streak, commits the record, and re-checks rank progression.
///
/// Rejects a day that is already completed; `completed` transitions to
/// true at most once per date.
pub fn complete_quest(
    player: &mut Player,
    progress: &mut DailyProgress,
) -> AriseResult<QuestOutcome> {
    if progress.completed {
        return Err(AriseError::InvalidAction(
            "Daily Quest already completed.".to_string(),
        ));
    }

    let leveled_up = progression::apply_experience(
        player,
        config::QUEST_XP_REWARD,
        config::QUEST_GOLD_REWARD,
    );

    progress.completed = true;
    player.streak += 1;
    upsert(&mut player.history, progress.clone());

    let rank_changed = progression::check_progression(player);

    Ok(QuestOutcome {
        leveled_up,
        rank_changed,
    })
}

/// Records a survived penalty episode on today's record and commits it.
///
/// Survival grants nothing: no experience, no gold, no loot. It only
/// prevents further penalty.
pub fn record_survival(player: &mut Player, progress: &mut DailyProgress) {
    progress.penalty_survived = true;
    upsert(&mut player.history, progress.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn player() -> Player {
        Player::new("a@b.c".to_string(), "Hunter".to_string())
    }

    #[test]
    fn test_resolve_today_synthesizes_fresh_record() {
        let p = player();
        let progress = resolve_today(&p, date(5));
        assert_eq!(progress, DailyProgress::fresh(date(5)));
    }

    #[test]
    fn test_resolve_today_resumes_matching_entry() {
        let mut p = player();
        let mut entry = DailyProgress::fresh(date(5));
        entry.pushups = 40;
        upsert(&mut p.history, entry.clone());

        assert_eq!(resolve_today(&p, date(5)), entry);
    }

    #[test]
    fn test_resolve_today_is_idempotent() {
        let mut p = player();
        upsert(&mut p.history, DailyProgress::fresh(date(4)));

        let first = resolve_today(&p, date(5));
        let second = resolve_today(&p, date(5));
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_today_ignores_stale_entry_after_midnight() {
        let mut p = player();
        let mut yesterday = DailyProgress::fresh(date(4));
        yesterday.completed = true;
        upsert(&mut p.history, yesterday);

        let progress = resolve_today(&p, date(5));
        assert_eq!(progress.date, date(5));
        assert!(!progress.completed);
    }

    #[test]
    fn test_upsert_keeps_one_entry_per_date() {
        let mut history = Vec::new();
        upsert(&mut history, DailyProgress::fresh(date(5)));

        let mut updated = DailyProgress::fresh(date(5));
        updated.squats = 30;
        upsert(&mut history, updated.clone());

        assert_eq!(history.len(), 1);
        assert_eq!(history[0], updated);
    }

    #[test]
    fn test_log_training_bumps_counters() {
        let mut progress = DailyProgress::fresh(date(5));
        log_training(&mut progress, TrainingField::Pushups, 20);
        log_training(&mut progress, TrainingField::Pushups, 15);
        log_training(&mut progress, TrainingField::RunningKm, 2);

        assert_eq!(progress.pushups, 35);
        assert_eq!(progress.running_km, 2);
        assert_eq!(progress.situps, 0);
    }

    #[test]
    fn test_complete_quest_awards_and_commits() {
        let mut p = player();
        let mut progress = resolve_today(&p, date(5));

        let outcome = complete_quest(&mut p, &mut progress).unwrap();

        assert!(outcome.leveled_up); // 150 xp clears the level-1 requirement
        assert_eq!(p.level, 2);
        assert_eq!(p.gold, 1000);
        assert_eq!(p.streak, 1);
        assert_eq!(p.history.len(), 1);
        assert!(p.history[0].completed);
    }

    #[test]
    fn test_complete_quest_twice_same_date_is_rejected() {
        let mut p = player();
        let mut progress = resolve_today(&p, date(5));
        complete_quest(&mut p, &mut progress).unwrap();

        // Re-resolving picks the committed entry back up.
        let mut resumed = resolve_today(&p, date(5));
        let err = complete_quest(&mut p, &mut resumed).unwrap_err();

        assert_eq!(err.to_string(), "Daily Quest already completed.");
        assert_eq!(p.history.len(), 1);
        assert_eq!(p.streak, 1);
    }

    #[test]
    fn test_record_survival_grants_nothing() {
        let mut p = player();
        let mut progress = resolve_today(&p, date(5));
        let (gold, xp, level) = (p.gold, p.current_xp, p.level);

        record_survival(&mut p, &mut progress);

        assert!(p.history[0].penalty_survived);
        assert_eq!(p.gold, gold);
        assert_eq!(p.current_xp, xp);
        assert_eq!(p.level, level);
    }

    #[test]
    fn test_survival_then_completion_shares_one_entry() {
        let mut p = player();
        let mut progress = resolve_today(&p, date(5));

        record_survival(&mut p, &mut progress);
        complete_quest(&mut p, &mut progress).unwrap();

        assert_eq!(p.history.len(), 1);
        assert!(p.history[0].penalty_survived);
        assert!(p.history[0].completed);
    }
}

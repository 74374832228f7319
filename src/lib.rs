//! # Arise
//!
//! A gamified daily-habit tracker: real-world task completion feeds a
//! persistent character-advancement model in the "System" idiom.
//!
//! ## Architecture Overview
//!
//! The crate is organized around a small progression core and a ring of
//! adapters:
//!
//! - **Player Model**: identity, level, experience, gold, stats, equipment
//! - **Progression Calculator**: the XP curve, the level-up loop, and rank
//!   progression
//! - **Daily Cycle**: one quest record per calendar date, resolved against
//!   an explicit reference date and committed through a single upsert path
//! - **Penalty State Machine**: the countdown-gated survival protocol
//!   triggered when a quest is forfeited
//! - **Stores**: file-backed session and inventory persistence
//! - **Narrative**: "The System" narrator, an LLM-backed flavor-text
//!   service that fails closed and never touches committed state
//!
//! All state mutation is synchronous and single-threaded; the penalty
//! re-alarm task and the narrative fetch are the only concurrent
//! activities, and neither touches domain state.

pub mod cue;
pub mod daily;
pub mod items;
pub mod narrative;
pub mod notify;
pub mod penalty;
pub mod player;
pub mod progression;
pub mod session;

pub use cue::{Cue, CueSink, LogCues};
pub use daily::{DailyProgress, QuestOutcome, TrainingField};
pub use items::{
    equipped_bonuses, InventoryItem, InventoryStore, ItemId, ItemKind, ItemSpec, Rarity,
    StatBonuses,
};
pub use narrative::{SystemEvent, SystemVoice};
pub use notify::{Notifier, TerminalNotifier};
pub use penalty::{AlarmHandle, PenaltyEpisode, PenaltyState, SurviveOutcome};
pub use player::{EquipSlot, Equipment, Player, StatKey, Stats};
pub use progression::{apply_experience, check_progression, required_xp, Rank};
pub use session::SessionStore;

/// Core error type for the Arise progression engine.
#[derive(thiserror::Error, Debug)]
pub enum AriseError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Player state is invalid
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Action was rejected; the message is shown to the player verbatim
    #[error("{0}")]
    InvalidAction(String),
}

/// Result type used throughout the Arise codebase.
pub type AriseResult<T> = Result<T, AriseError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    use std::time::Duration;

    /// Experience required to clear level 1
    pub const XP_BASE: u64 = 100;

    /// Additional experience required per level past the first
    pub const XP_STEP: u64 = 50;

    /// Unallocated stat points granted per level gained
    pub const LEVEL_UP_STAT_POINTS: u32 = 3;

    /// Experience awarded for completing the daily quest
    pub const QUEST_XP_REWARD: f64 = 150.0;

    /// Gold awarded for completing the daily quest
    pub const QUEST_GOLD_REWARD: u64 = 1000;

    /// Survive clicks required before the penalty gate opens
    pub const PENALTY_CLICKS: u32 = 50;

    /// Interval between penalty re-alarm rolls
    pub const ALARM_INTERVAL: Duration = Duration::from_secs(2);

    /// A re-alarm fires when a uniform roll exceeds this threshold
    pub const ALARM_REFIRE_THRESHOLD: f64 = 0.6;
}

//! # Session Module
//!
//! File-backed persistence for player state and the active session.
//!
//! One JSON document per player, last-write-wins, plus a pointer file
//! naming the player of the current session. A single session is active
//! per data directory at a time, so there are no concurrent writers; a
//! save issued before a narrative call is therefore visible to any later
//! load in the same session.

use crate::player::Player;
use crate::AriseResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Pointer record naming the player of the active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionPointer {
    email: String,
}

/// Player persistence keyed by email, under a data directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    /// Opens (and creates, if needed) the store's data directory.
    pub fn new(root: impl AsRef<Path>) -> AriseResult<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    fn player_path(&self, email: &str) -> PathBuf {
        self.root.join(format!("player-{}.json", file_slug(email)))
    }

    fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    /// Whether an account exists for the email.
    pub fn exists(&self, email: &str) -> bool {
        self.player_path(email).exists()
    }

    /// Persists the player. Last write wins.
    pub fn save(&self, player: &Player) -> AriseResult<()> {
        let json = serde_json::to_string_pretty(player)?;
        fs::write(self.player_path(&player.email), json)?;
        log::debug!("saved player {}", player.email);
        Ok(())
    }

    /// Loads a player by email, if one was ever saved.
    pub fn load(&self, email: &str) -> AriseResult<Option<Player>> {
        let path = self.player_path(email);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Creates-or-loads the player and marks them as the active session.
    pub fn login(&self, email: &str, username: &str) -> AriseResult<Player> {
        let player = match self.load(email)? {
            Some(existing) => {
                log::info!("resuming account {}", email);
                existing
            }
            None => {
                log::info!("creating account {}", email);
                let fresh = Player::new(email.to_string(), username.to_string());
                self.save(&fresh)?;
                fresh
            }
        };

        let pointer = SessionPointer {
            email: email.to_string(),
        };
        fs::write(self.session_path(), serde_json::to_string(&pointer)?)?;
        Ok(player)
    }

    /// Ends the active session. Persisted player state remains.
    pub fn logout(&self) -> AriseResult<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Loads the most recently logged-in player, if a session is active.
    pub fn load_current_session(&self) -> AriseResult<Option<Player>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let pointer: SessionPointer = serde_json::from_str(&fs::read_to_string(path)?)?;
        self.load(&pointer.email)
    }
}

/// Normalizes an email into a filesystem-safe file name fragment.
pub(crate) fn file_slug(email: &str) -> String {
    email
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

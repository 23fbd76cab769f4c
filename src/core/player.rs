//! Player profiles.
//!
//! A player is identity only: first name, last initial and an optional
//! nickname. Players are referenced by role slots, event records and stat
//! rows; only the profile fields ever change after registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::PlayerId;

/// Longest accepted first name or nickname.
pub const MAX_NAME_LEN: usize = 50;

/// A registered player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub first_name: String,
    pub last_initial: String,
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Name shown in exports and scoreboards.
    ///
    /// ```
    /// use beer_baseball::core::{NewPlayer, Player, PlayerId};
    ///
    /// let plain = Player::from_new(PlayerId::new(1), NewPlayer::new("Sam", "K"));
    /// assert_eq!(plain.display_name(), "Sam K.");
    ///
    /// let nick = NewPlayer::new("Sam", "K").with_nickname("Cannon");
    /// let nick = Player::from_new(PlayerId::new(2), nick);
    /// assert_eq!(nick.display_name(), "Sam K. (Cannon)");
    /// ```
    #[must_use]
    pub fn display_name(&self) -> String {
        let base = short_name(&self.first_name, &self.last_initial);
        match self.nickname.as_deref() {
            Some(nick) if !nick.is_empty() => format!("{base} ({nick})"),
            _ => base,
        }
    }

    /// Build a player record from a registration request.
    #[must_use]
    pub fn from_new(id: PlayerId, new: NewPlayer) -> Self {
        let now = Utc::now();
        Self {
            id,
            first_name: new.first_name,
            last_initial: new.last_initial,
            nickname: new.nickname,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a profile edit.
    pub fn apply(&mut self, update: PlayerUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_initial) = update.last_initial {
            self.last_initial = last_initial;
        }
        if let Some(nickname) = update.nickname {
            self.nickname = nickname;
        }
        self.updated_at = Utc::now();
    }
}

/// `"First L."`, the name used in aggregate tables.
#[must_use]
pub fn short_name(first_name: &str, last_initial: &str) -> String {
    format!("{first_name} {last_initial}.")
}

/// Registration request for a new player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub first_name: String,
    pub last_initial: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl NewPlayer {
    pub fn new(first_name: impl Into<String>, last_initial: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_initial: last_initial.into(),
            nickname: None,
        }
    }

    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }
}

/// Profile edit. `None` leaves a field untouched; `nickname: Some(None)`
/// clears the nickname.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_initial: Option<String>,
    #[serde(default)]
    pub nickname: Option<Option<String>>,
}

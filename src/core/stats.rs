//! Per-player, per-game stat accumulators.
//!
//! ## PlayerGameStats
//!
//! One row per (player, game), created on the player's first involvement.
//! Every counter starts at 0 and only ever increases.
//!
//! ## StatsBook
//!
//! The working set of rows a single transition may touch. Existing rows
//! are preloaded by the caller; missing rows are created on first access.
//! Only rows that were accessed are handed back for persistence.

use chrono::{DateTime, Utc};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::entity::{GameId, PlayerId};

/// Counters for one player in one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGameStats {
    pub player_id: PlayerId,
    pub game_id: GameId,

    pub points_for: u32,
    /// Never credited by the rules; kept so rows match the stored schema.
    pub points_against: u32,

    pub shots_taken: u32,
    pub shots_first: u32,
    pub shots_second: u32,
    pub shots_third: u32,
    pub shots_home: u32,
    pub shots_grandslam: u32,
    pub shots_strike: u32,
    pub shots_out: u32,

    pub steals_success: u32,
    pub steals_bonus: u32,
    pub steals_fail: u32,

    pub bunts_success: u32,
    pub bunts_bonus: u32,
    pub bunts_fail: u32,

    pub catches_made: u32,
    pub catches_missed: u32,

    pub knocks_first: u32,
    pub knocks_second: u32,
    pub knocks_third: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerGameStats {
    /// A zeroed row.
    #[must_use]
    pub fn new(player_id: PlayerId, game_id: GameId) -> Self {
        let now = Utc::now();
        Self {
            player_id,
            game_id,
            points_for: 0,
            points_against: 0,
            shots_taken: 0,
            shots_first: 0,
            shots_second: 0,
            shots_third: 0,
            shots_home: 0,
            shots_grandslam: 0,
            shots_strike: 0,
            shots_out: 0,
            steals_success: 0,
            steals_bonus: 0,
            steals_fail: 0,
            bunts_success: 0,
            bunts_bonus: 0,
            bunts_fail: 0,
            catches_made: 0,
            catches_missed: 0,
            knocks_first: 0,
            knocks_second: 0,
            knocks_third: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The (game, player) key.
    #[must_use]
    pub fn key(&self) -> (GameId, PlayerId) {
        (self.game_id, self.player_id)
    }
}

/// Rows touched by one transition of one game.
#[derive(Clone, Debug)]
pub struct StatsBook {
    game_id: GameId,
    rows: FxHashMap<PlayerId, PlayerGameStats>,
    touched: FxHashSet<PlayerId>,
}

impl StatsBook {
    #[must_use]
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            rows: FxHashMap::default(),
            touched: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Add an existing row loaded from storage.
    ///
    /// Rows belonging to another game are ignored.
    pub fn preload(&mut self, row: PlayerGameStats) {
        if row.game_id == self.game_id {
            self.rows.insert(row.player_id, row);
        }
    }

    /// Row for a player, created zeroed on first access.
    pub fn entry(&mut self, player: PlayerId) -> &mut PlayerGameStats {
        self.touched.insert(player);
        let game_id = self.game_id;
        self.rows
            .entry(player)
            .or_insert_with(|| PlayerGameStats::new(player, game_id))
    }

    /// Read a row without touching it.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&PlayerGameStats> {
        self.rows.get(&player)
    }

    /// Number of rows touched so far.
    #[must_use]
    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }

    /// Consume the book, returning the touched rows with `updated_at`
    /// stamped, ordered by player id.
    #[must_use]
    pub fn into_touched(self) -> Vec<PlayerGameStats> {
        let now = Utc::now();
        let Self { mut rows, touched, .. } = self;
        let mut out: Vec<_> = touched
            .into_iter()
            .filter_map(|player| rows.remove(&player))
            .map(|mut row| {
                row.updated_at = now;
                row
            })
            .collect();
        out.sort_by_key(|row| row.player_id);
        out
    }
}

//! The caller around the rules engine.
//!
//! `GameService` owns a store and exposes every operation a transport
//! needs. Event operations follow one shape:
//!
//! 1. load the game and any explicitly named players (`NotFound`)
//! 2. preload the stat rows of everyone the event may touch
//! 3. run one `GameEngine` operation on owned copies
//! 4. commit the game, the touched rows and the new records in one
//!    `GameStore::commit`
//!
//! Any failure before step 4 drops the copies, so nothing is written.

pub mod export;

pub use export::{export_file_name, PlayerTotals, CSV_HEADER};

use chrono::Utc;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::core::player::MAX_NAME_LEN;
use crate::core::state::MAX_TEAM_NAME_LEN;
use crate::core::{
    AppConfig, Game, GameEvent, GameId, GameSnapshot, GameStatus, NewGame, NewPlayer, Player,
    PlayerGameStats, PlayerId, PlayerUpdate, Role, StatsBook,
};
use crate::error::{Error, Result, RulesError};
use crate::rules::{
    BuntOutcome, GameEngine, KnockCounts, ShotOutcome, StealOutcome, MAX_KNOCK_UNITS,
};
use crate::store::{GameStore, SqliteStore, Transition};

/// A partial role update: each entry sets (`Some`) or clears (`None`) one
/// slot. Slots not named are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    changes: SmallVec<[(Role, Option<PlayerId>); 4]>,
}

impl RoleAssignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `player` into `role`.
    #[must_use]
    pub fn assign(self, role: Role, player: PlayerId) -> Self {
        self.with(role, Some(player))
    }

    /// Empty `role`.
    #[must_use]
    pub fn clear(self, role: Role) -> Self {
        self.with(role, None)
    }

    /// Set or clear `role`. A later change to the same slot replaces an
    /// earlier one.
    #[must_use]
    pub fn with(mut self, role: Role, player: Option<PlayerId>) -> Self {
        self.changes.retain(|(r, _)| *r != role);
        self.changes.push((role, player));
        self
    }

    pub fn changes(&self) -> impl Iterator<Item = (Role, Option<PlayerId>)> + '_ {
        self.changes.iter().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Game and player operations over a store.
pub struct GameService<S: GameStore> {
    store: S,
}

impl GameService<SqliteStore> {
    /// Open the SQLite database named by the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(SqliteStore::from_config(config)?))
    }
}

impl<S: GameStore> GameService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // === Players ===

    /// Register a player.
    ///
    /// Names are trimmed. The first name must be 1 to 50 characters, the
    /// last initial exactly one, and a blank nickname is stored as none.
    pub fn create_player(&mut self, new: NewPlayer) -> Result<Player> {
        let new = NewPlayer {
            first_name: new.first_name.trim().to_string(),
            last_initial: new.last_initial.trim().to_string(),
            nickname: normalize_nickname(new.nickname),
        };
        validate_profile(&new.first_name, &new.last_initial, new.nickname.as_deref())
            .map_err(|e| self.reject("create_player", e))?;

        let player = self.store.insert_player(new)?;
        info!(player = %player.id, name = %player.display_name(), "player created");
        Ok(player)
    }

    /// Edit a player's profile.
    pub fn update_player(&mut self, id: PlayerId, update: PlayerUpdate) -> Result<Player> {
        let mut player = self.player(id)?;
        player.apply(PlayerUpdate {
            first_name: update.first_name.map(|s| s.trim().to_string()),
            last_initial: update.last_initial.map(|s| s.trim().to_string()),
            nickname: update.nickname.map(normalize_nickname),
        });
        validate_profile(&player.first_name, &player.last_initial, player.nickname.as_deref())
            .map_err(|e| self.reject("update_player", e))?;

        self.store.update_player(&player)?;
        Ok(player)
    }

    pub fn player(&self, id: PlayerId) -> Result<Player> {
        self.store.player(id)?.ok_or_else(|| Error::player_not_found(id))
    }

    /// All players by first name.
    pub fn players(&self) -> Result<Vec<Player>> {
        self.store.players()
    }

    // === Games ===

    /// Create a game, optionally with initial role occupants.
    pub fn create_game(&mut self, new: NewGame) -> Result<Game> {
        let new = NewGame {
            home_team: new.home_team.trim().to_string(),
            away_team: new.away_team.trim().to_string(),
            roles: new.roles,
        };
        validate_team("home_team", &new.home_team)
            .and_then(|()| validate_team("away_team", &new.away_team))
            .map_err(|e| self.reject("create_game", e))?;
        for (_, player) in new.roles.occupants() {
            self.player(player).map_err(|e| self.reject("create_game", e))?;
        }

        let game = self.store.insert_game(new)?;
        info!(game = %game.id, home = %game.home_team, away = %game.away_team, "game created");
        Ok(game)
    }

    /// All games, newest first.
    pub fn games(&self) -> Result<Vec<Game>> {
        self.store.games()
    }

    /// Id the next created game is expected to get.
    pub fn next_game_id(&self) -> Result<GameId> {
        Ok(self.store.max_game_id()?.map_or(GameId::new(1), GameId::next))
    }

    pub fn game(&self, id: GameId) -> Result<Game> {
        self.store.game(id)?.ok_or_else(|| Error::game_not_found(id))
    }

    /// Set or clear role slots. Every named player must exist.
    pub fn assign_roles(&mut self, id: GameId, assignment: RoleAssignment) -> Result<Game> {
        let mut game = self.game(id)?;
        for (role, player) in assignment.changes() {
            if let Some(player) = player {
                self.player(player).map_err(|e| self.reject("assign_roles", e))?;
            }
            game.roles.set(role, player);
        }
        game.updated_at = Utc::now();

        self.store.update_game(&game)?;
        Ok(game)
    }

    /// Move a game through its lifecycle from outside the engine.
    ///
    /// A final game cannot go back to scheduled.
    pub fn set_status(&mut self, id: GameId, status: GameStatus) -> Result<Game> {
        let mut game = self.game(id)?;
        if game.status == status {
            return Ok(game);
        }
        if game.status == GameStatus::Final && status == GameStatus::Scheduled {
            let err = Error::Validation(format!("{} is final and cannot be rescheduled", game.id));
            return Err(self.reject("set_status", err));
        }

        info!(game = %game.id, from = %game.status, to = %status, "status changed");
        game.status = status;
        game.updated_at = Utc::now();
        self.store.update_game(&game)?;
        Ok(game)
    }

    // === Events ===

    /// Record a shot. `shooter` and `catcher` override the role slots.
    pub fn record_shot(
        &mut self,
        id: GameId,
        outcome: &str,
        shooter: Option<PlayerId>,
        catcher: Option<PlayerId>,
    ) -> Result<GameSnapshot> {
        self.transition(id, [shooter, catcher], |engine| {
            let outcome: ShotOutcome = outcome.parse()?;
            engine.record_shot(outcome, shooter, catcher)
        })
        .map_err(|e| self.reject("record_shot", e))
    }

    /// Record a steal. `offense` and `defense` override the role slots.
    pub fn record_steal(
        &mut self,
        id: GameId,
        outcome: &str,
        offense: Option<PlayerId>,
        defense: Option<PlayerId>,
    ) -> Result<GameSnapshot> {
        self.transition(id, [offense, defense], |engine| {
            let outcome: StealOutcome = outcome.parse()?;
            engine.record_steal(outcome, offense, defense)
        })
        .map_err(|e| self.reject("record_steal", e))
    }

    /// Record a bunt. `offense` and `defense` override the role slots.
    pub fn record_bunt(
        &mut self,
        id: GameId,
        outcome: &str,
        offense: Option<PlayerId>,
        defense: Option<PlayerId>,
    ) -> Result<GameSnapshot> {
        self.transition(id, [offense, defense], |engine| {
            let outcome: BuntOutcome = outcome.parse()?;
            engine.record_bunt(outcome, offense, defense)
        })
        .map_err(|e| self.reject("record_bunt", e))
    }

    /// Record knocks against the current shooter and catcher.
    ///
    /// Events carrying more than `MAX_KNOCK_UNITS` units are rejected.
    pub fn record_knock(&mut self, id: GameId, counts: KnockCounts) -> Result<GameSnapshot> {
        self.game(id)
            .and_then(|_| validate_knock(counts))
            .and_then(|()| self.transition(id, [None, None], |engine| engine.record_knock(counts)))
            .map_err(|e| self.reject("record_knock", e))
    }

    /// Current state of a game.
    pub fn snapshot(&self, id: GameId) -> Result<GameSnapshot> {
        Ok(GameSnapshot::from(&self.game(id)?))
    }

    /// Event log of a game, oldest first.
    pub fn events(&self, id: GameId) -> Result<Vec<GameEvent>> {
        self.game(id)?;
        self.store.events(id)
    }

    // === Stats ===

    /// Stat rows of a game, highest `points_for` first.
    pub fn game_stats(&self, id: GameId) -> Result<Vec<PlayerGameStats>> {
        self.game(id)?;
        self.store.game_stats(id)
    }

    /// Career totals of every player who has a stat row.
    pub fn player_totals(&self) -> Result<Vec<PlayerTotals>> {
        Ok(export::player_totals(&self.store.players()?, &self.store.all_stats()?))
    }

    /// A game's event log as CSV.
    pub fn export_events_csv(&self, id: GameId) -> Result<String> {
        let events = self.events(id)?;
        let mut players = FxHashMap::default();
        for player in events
            .iter()
            .flat_map(|e| e.record.offense.into_iter().chain(e.record.defense))
        {
            if let Some(found) = self.store.player(player)? {
                players.insert(player, found);
            }
        }
        export::events_csv(&events, &players)
    }

    // === Internals ===

    fn transition<F>(
        &mut self,
        id: GameId,
        overrides: [Option<PlayerId>; 2],
        apply: F,
    ) -> Result<GameSnapshot>
    where
        F: FnOnce(&mut GameEngine<'_>) -> std::result::Result<GameSnapshot, RulesError>,
    {
        let mut game = self.game(id)?;
        for player in overrides.into_iter().flatten() {
            self.player(player)?;
        }

        let mut book = StatsBook::new(id);
        let involved = overrides
            .into_iter()
            .flatten()
            .chain(game.roles.occupants().map(|(_, player)| player));
        for player in involved {
            if let Some(row) = self.store.stats(id, player)? {
                book.preload(row);
            }
        }

        let now = Utc::now();
        let mut engine = GameEngine::new(&mut game, &mut book).at(now);
        let snapshot = apply(&mut engine)?;
        let records = engine.into_records().into_vec();
        game.updated_at = now;

        self.store.commit(Transition {
            game,
            stats: book.into_touched(),
            records,
        })?;
        Ok(snapshot)
    }

    fn reject(&self, operation: &'static str, err: Error) -> Error {
        if err.is_client_error() {
            warn!(operation, error = %err, "request rejected");
        }
        err
    }
}

fn validate_knock(counts: KnockCounts) -> Result<()> {
    if !counts.within_limit() {
        return Err(Error::Validation(format!(
            "a knock may carry at most {MAX_KNOCK_UNITS} units, got {}",
            counts.total()
        )));
    }
    Ok(())
}

fn normalize_nickname(nickname: Option<String>) -> Option<String> {
    nickname
        .map(|nick| nick.trim().to_string())
        .filter(|nick| !nick.is_empty())
}

fn validate_profile(first_name: &str, last_initial: &str, nickname: Option<&str>) -> Result<()> {
    let first_len = first_name.chars().count();
    if first_len == 0 || first_len > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "first_name must be 1 to {MAX_NAME_LEN} characters"
        )));
    }
    if last_initial.chars().count() != 1 {
        return Err(Error::Validation("last_initial must be exactly one character".into()));
    }
    if nickname.is_some_and(|nick| nick.chars().count() > MAX_NAME_LEN) {
        return Err(Error::Validation(format!(
            "nickname must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_team(field: &str, name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_TEAM_NAME_LEN {
        return Err(Error::Validation(format!(
            "{field} must be 1 to {MAX_TEAM_NAME_LEN} characters"
        )));
    }
    Ok(())
}

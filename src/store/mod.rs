//! Persistence for players, games, stat rows and the event log.
//!
//! The rules engine works on owned copies of a game and its stat rows; a
//! store only has to load them and later accept the result of a
//! transition as one unit through [`GameStore::commit`]. A commit that
//! fails writes nothing.
//!
//! Implementations:
//! - [`MemoryStore`]: hash maps and a persistent vector, for tests and
//!   embedding
//! - [`SqliteStore`]: a SQLite database file

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::core::{
    EventRecord, Game, GameEvent, GameId, NewGame, NewPlayer, Player, PlayerGameStats, PlayerId,
};
use crate::error::Result;

/// Everything one accepted event changes.
#[derive(Clone, Debug)]
pub struct Transition {
    /// The game after the event.
    pub game: Game,
    /// Stat rows the event touched (inserted or replaced).
    pub stats: Vec<PlayerGameStats>,
    /// Records to append, in order.
    pub records: Vec<EventRecord>,
}

/// Storage backend.
///
/// Taking `&mut self` for writes gives each store exactly one writer, so
/// transitions of the same game never interleave.
pub trait GameStore {
    // === Players ===

    /// Register a player, assigning its id.
    fn insert_player(&mut self, new: NewPlayer) -> Result<Player>;

    /// Overwrite a player's profile fields.
    fn update_player(&mut self, player: &Player) -> Result<()>;

    fn player(&self, id: PlayerId) -> Result<Option<Player>>;

    /// All players by first name.
    fn players(&self) -> Result<Vec<Player>>;

    // === Games ===

    /// Create a game, assigning its id.
    fn insert_game(&mut self, new: NewGame) -> Result<Game>;

    /// Overwrite a game record outside of an event (roles, status).
    fn update_game(&mut self, game: &Game) -> Result<()>;

    fn game(&self, id: GameId) -> Result<Option<Game>>;

    /// All games, newest first.
    fn games(&self) -> Result<Vec<Game>>;

    /// Highest assigned game id.
    fn max_game_id(&self) -> Result<Option<GameId>>;

    // === Stats ===

    fn stats(&self, game: GameId, player: PlayerId) -> Result<Option<PlayerGameStats>>;

    /// Rows for one game by `points_for`, highest first.
    fn game_stats(&self, game: GameId) -> Result<Vec<PlayerGameStats>>;

    /// Rows for every game.
    fn all_stats(&self) -> Result<Vec<PlayerGameStats>>;

    // === Events ===

    /// Log of one game, oldest first.
    fn events(&self, game: GameId) -> Result<Vec<GameEvent>>;

    /// Persist the result of one transition atomically, returning the
    /// appended records with their ids.
    fn commit(&mut self, transition: Transition) -> Result<Vec<GameEvent>>;
}

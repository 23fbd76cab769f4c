//! Core record types: identifiers, players, games, event records, stat
//! accumulators, snapshots, configuration.
//!
//! These are plain data. The rules that move a game from one state to the
//! next live in `rules`; storage lives in `store`.

pub mod entity;
pub mod player;
pub mod state;
pub mod event;
pub mod stats;
pub mod snapshot;
pub mod config;

pub use entity::{EventId, GameId, PlayerId};
pub use player::{NewPlayer, Player, PlayerUpdate};
pub use state::{Bases, Game, GameStatus, HalfInning, NewGame, ParseEnumError, Role, Roles};
pub use event::{EventKind, EventRecord, GameEvent};
pub use stats::{PlayerGameStats, StatsBook};
pub use snapshot::GameSnapshot;
pub use config::AppConfig;

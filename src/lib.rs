//! # beer-baseball
//!
//! Rules engine and scorekeeper for beer baseball: two teams alternate
//! offense and defense, four role slots name who shoots, drinks and
//! catches, and recorded events (shots, steals, bunts, knocks) drive an
//! inning/outs/bases/score state machine.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `GameEngine` applies one event to a borrowed
//!    game and stats book. It never performs I/O and validates before it
//!    mutates.
//!
//! 2. **Atomic Commits**: The caller persists the game, the touched stat
//!    rows and the new log records together, or nothing at all.
//!
//! 3. **Typed Rules**: Outcome codes, roles and bases are enums. Strings
//!    only exist at the transport edge and are parsed before anything
//!    runs.
//!
//! ## Architecture
//!
//! - **Explicit Base Vector**: base advancement is a pure function from
//!   the current occupancy to the next occupancy plus runs, assigned in
//!   one step.
//!
//! - **Role Table**: role slots are addressed through a `Role` enum; the
//!   rotation on each out is a pair of slot swaps.
//!
//! - **Append-Only Log**: every transition appends its rotation records
//!   ahead of the record for the event itself.
//!
//! ## Modules
//!
//! - `core`: Ids, players, game state, event records, stats, snapshots, configuration
//! - `rules`: Outcome codes, base advancement and the rules engine
//! - `store`: Persistence trait with in-memory and SQLite backends
//! - `service`: Load, transition and commit; CRUD, stats and CSV export
//! - `error`: Error taxonomy and transport status mapping

pub mod core;
pub mod error;
pub mod rules;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    AppConfig,
    Bases, Game, GameStatus, HalfInning, NewGame, Role, Roles,
    EventId, GameId, PlayerId,
    NewPlayer, Player, PlayerUpdate,
    EventKind, EventRecord, GameEvent,
    PlayerGameStats, StatsBook,
    GameSnapshot,
};

pub use crate::error::{Error, Result, RulesError};

pub use crate::rules::{
    Advance, AdvanceResult, GameEngine,
    ShotOutcome, StealOutcome, BuntOutcome, KnockBase, KnockCounts,
    GRAND_SLAM_RUNS, MAX_KNOCK_UNITS, MAX_STRIKES, OUTS_PER_HALF,
};

pub use crate::store::{GameStore, MemoryStore, SqliteStore, Transition};

pub use crate::service::{GameService, PlayerTotals, RoleAssignment};

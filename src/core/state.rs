//! Game state: the mutable record the rules engine transitions.
//!
//! ## Game
//!
//! - Teams and score (`home_score`, `away_score`, never decreasing)
//! - Inning, half, outs, strikes
//! - Base occupancy (`Bases`), a 3-bit vector with no runner identity
//! - Lifecycle status
//! - Four role slots (`Roles`) naming who shoots, drinks and catches
//!
//! ## Counting invariants
//!
//! `outs` is never stored at the value that ends a half-inning: the out
//! that would reach it rotates the sides and resets `outs` to 0 inside
//! the same transition. `strikes` stays in `0..=2` the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{GameId, PlayerId};

/// Longest accepted team name.
pub const MAX_TEAM_NAME_LEN: usize = 80;

/// Failure to parse a stored enumeration value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Which team is batting: the away team in the top half, the home team in
/// the bottom half.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfInning {
    #[default]
    Top,
    Bottom,
}

impl HalfInning {
    /// The other half.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            HalfInning::Top => HalfInning::Bottom,
            HalfInning::Bottom => HalfInning::Top,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HalfInning::Top => "top",
            HalfInning::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for HalfInning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HalfInning {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(HalfInning::Top),
            "bottom" => Ok(HalfInning::Bottom),
            other => Err(ParseEnumError::new("half inning", other)),
        }
    }
}

/// Game lifecycle.
///
/// `Scheduled` becomes `InProgress` on the first recorded event. `Final`
/// is only ever set from outside the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::InProgress => "in_progress",
            GameStatus::Final => "final",
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(GameStatus::Scheduled),
            "in_progress" => Ok(GameStatus::InProgress),
            "final" => Ok(GameStatus::Final),
            other => Err(ParseEnumError::new("game status", other)),
        }
    }
}

/// Base occupancy. A base is either occupied or not; runners carry no
/// identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bases {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl Bases {
    /// No runners on.
    pub const EMPTY: Bases = Bases::new(false, false, false);

    #[must_use]
    pub const fn new(first: bool, second: bool, third: bool) -> Self {
        Self { first, second, third }
    }

    /// Number of occupied bases.
    #[must_use]
    pub const fn occupied(self) -> u32 {
        self.first as u32 + self.second as u32 + self.third as u32
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.first || self.second || self.third)
    }
}

/// The four role slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    OffensiveShooter,
    OffensiveDrinker,
    DefensiveCatcher,
    DefensiveDrinker,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::OffensiveShooter,
        Role::OffensiveDrinker,
        Role::DefensiveCatcher,
        Role::DefensiveDrinker,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::OffensiveShooter => "offensive_shooter",
            Role::OffensiveDrinker => "offensive_drinker",
            Role::DefensiveCatcher => "defensive_catcher",
            Role::DefensiveDrinker => "defensive_drinker",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("role", s))
    }
}

/// Role slot occupants. An empty slot means the role is not yet assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roles {
    pub offensive_shooter: Option<PlayerId>,
    pub offensive_drinker: Option<PlayerId>,
    pub defensive_catcher: Option<PlayerId>,
    pub defensive_drinker: Option<PlayerId>,
}

impl Roles {
    /// Occupant of a slot.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<PlayerId> {
        *self.slot(role)
    }

    /// Put a player into a slot (or clear it with `None`).
    pub fn set(&mut self, role: Role, player: Option<PlayerId>) {
        *self.slot_mut(role) = player;
    }

    /// Exchange the occupants of two slots.
    pub fn swap(&mut self, a: Role, b: Role) {
        let occupant_a = self.get(a);
        let occupant_b = self.get(b);
        self.set(a, occupant_b);
        self.set(b, occupant_a);
    }

    /// Iterate over (role, occupant) for every filled slot.
    pub fn occupants(&self) -> impl Iterator<Item = (Role, PlayerId)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|player| (role, player)))
    }

    fn slot(&self, role: Role) -> &Option<PlayerId> {
        match role {
            Role::OffensiveShooter => &self.offensive_shooter,
            Role::OffensiveDrinker => &self.offensive_drinker,
            Role::DefensiveCatcher => &self.defensive_catcher,
            Role::DefensiveDrinker => &self.defensive_drinker,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<PlayerId> {
        match role {
            Role::OffensiveShooter => &mut self.offensive_shooter,
            Role::OffensiveDrinker => &mut self.offensive_drinker,
            Role::DefensiveCatcher => &mut self.defensive_catcher,
            Role::DefensiveDrinker => &mut self.defensive_drinker,
        }
    }
}

/// A game record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub home_team: String,
    pub away_team: String,

    /// Inning number (starts at 1).
    pub inning: u32,
    pub half: HalfInning,
    pub outs: u32,
    pub strikes: u32,

    pub home_score: u32,
    pub away_score: u32,

    pub bases: Bases,
    pub status: GameStatus,
    pub roles: Roles,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// A fresh game: top of the first, no count, empty bases, scheduled.
    #[must_use]
    pub fn new(id: GameId, home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            home_team: home_team.into(),
            away_team: away_team.into(),
            inning: 1,
            half: HalfInning::Top,
            outs: 0,
            strikes: 0,
            home_score: 0,
            away_score: 0,
            bases: Bases::EMPTY,
            status: GameStatus::Scheduled,
            roles: Roles::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a game record from a creation request.
    #[must_use]
    pub fn from_new(id: GameId, new: NewGame) -> Self {
        let mut game = Self::new(id, new.home_team, new.away_team);
        game.roles = new.roles;
        game
    }

    /// Name of the team currently batting.
    #[must_use]
    pub fn batting_team(&self) -> &str {
        match self.half {
            HalfInning::Top => &self.away_team,
            HalfInning::Bottom => &self.home_team,
        }
    }
}

/// Creation request for a new game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    pub home_team: String,
    pub away_team: String,
    #[serde(flatten)]
    pub roles: Roles,
}

impl NewGame {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            roles: Roles::default(),
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role, player: PlayerId) -> Self {
        self.roles.set(role, Some(player));
        self
    }
}

//! Event log records.
//!
//! Every accepted transition appends one record for the event itself,
//! preceded by one `rotation` record for each out that rotated the roles.
//! Records are immutable once appended and are read back in creation
//! order (ties broken by id).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{EventId, GameId, PlayerId};
use super::state::ParseEnumError;

/// Kind of a logged event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Shot,
    Steal,
    Bunt,
    Knock,
    Rotation,
    ManualAdjustment,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Shot => "shot",
            EventKind::Steal => "steal",
            EventKind::Bunt => "bunt",
            EventKind::Knock => "knock",
            EventKind::Rotation => "rotation",
            EventKind::ManualAdjustment => "manual_adjustment",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shot" => Ok(EventKind::Shot),
            "steal" => Ok(EventKind::Steal),
            "bunt" => Ok(EventKind::Bunt),
            "knock" => Ok(EventKind::Knock),
            "rotation" => Ok(EventKind::Rotation),
            "manual_adjustment" => Ok(EventKind::ManualAdjustment),
            other => Err(ParseEnumError::new("event kind", other)),
        }
    }
}

/// Outcome codes of `rotation` records.
pub mod rotation {
    /// First out of the half: the offensive pair traded places.
    pub const SWAP_OFFENSE: &str = "swap_offense";
    /// Side retired: offense and defense traded places.
    pub const FULL_ROTATION: &str = "full_rotation";
}

/// An event record produced by a transition, not yet appended to a log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub kind: EventKind,
    pub outcome: String,
    pub offense: Option<PlayerId>,
    pub defense: Option<PlayerId>,
    /// Structured detail, e.g. knock counts.
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Create a record with no participants or metadata.
    pub fn new(kind: EventKind, outcome: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            outcome: outcome.into(),
            offense: None,
            defense: None,
            metadata: None,
            created_at,
        }
    }

    #[must_use]
    pub fn with_players(mut self, offense: PlayerId, defense: PlayerId) -> Self {
        self.offense = Some(offense);
        self.defense = Some(defense);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Is this a role rotation record?
    #[must_use]
    pub fn is_rotation(&self) -> bool {
        self.kind == EventKind::Rotation
    }
}

/// An appended event log record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    pub game_id: GameId,
    #[serde(flatten)]
    pub record: EventRecord,
}

impl GameEvent {
    #[must_use]
    pub fn new(id: EventId, game_id: GameId, record: EventRecord) -> Self {
        Self { id, game_id, record }
    }
}

//! Error taxonomy.
//!
//! - `RulesError`: an event the rules engine refuses to apply. Raised
//!   before any mutation of the game.
//! - `Error`: everything a caller of the crate can see, including lookups
//!   of unknown records and storage failures.
//!
//! None of these are retryable. A transport maps them with
//! [`Error::status_code`].

use thiserror::Error;

use crate::core::Role;

/// Rejections raised by the rules engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    /// A required role is unassigned and no override was supplied.
    #[error("no player assigned to {role}; assign roles before recording events")]
    MissingParticipant { role: Role },

    /// Outcome code outside the enumeration for this event kind.
    #[error("unknown {kind} outcome: {outcome:?}")]
    UnknownOutcome { kind: &'static str, outcome: String },

    /// Base name outside first/second/third.
    #[error("unknown base: {0:?}")]
    UnknownBase(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced game or player does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Rules(#[from] RulesError),

    /// Request payload failed validation.
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("export error: {0}")]
    Export(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn game_not_found(id: crate::core::GameId) -> Self {
        Error::NotFound { entity: "game", id: id.raw() }
    }

    pub(crate) fn player_not_found(id: crate::core::PlayerId) -> Self {
        Error::NotFound { entity: "player", id: id.raw() }
    }

    /// HTTP-equivalent status: 404 for missing records, 400 for rejected
    /// input, 500 otherwise.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Rules(_) | Error::Validation(_) => 400,
            Error::Storage(_) | Error::Export(_) | Error::Config(_) | Error::Io(_) => 500,
        }
    }

    /// Was the caller at fault?
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

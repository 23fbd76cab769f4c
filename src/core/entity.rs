//! Record identifiers.
//!
//! Every persisted record (player, game, event log entry) is addressed by a
//! typed identifier. Identifiers are assigned by the store and are never
//! reused. They wrap `i64` so they map directly onto SQLite row ids.
//!
//! ```
//! use beer_baseball::core::{GameId, PlayerId};
//!
//! let game = GameId::new(3);
//! let player = PlayerId::new(3);
//!
//! assert_eq!(game.raw(), player.raw());
//! assert_eq!(format!("{}", game), "Game(3)");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw row id.
            #[must_use]
            pub const fn raw(self) -> i64 {
                self.0
            }

            /// The identifier following this one.
            #[must_use]
            pub const fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a registered player.
    PlayerId,
    "Player"
);

record_id!(
    /// Identifier of a game.
    GameId,
    "Game"
);

record_id!(
    /// Identifier of an event log record.
    ///
    /// Ids are assigned in append order, so they break ties between records
    /// created within the same transition.
    EventId,
    "Event"
);

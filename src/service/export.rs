//! Read-side projections: CSV export of an event log and per-player
//! totals across every game.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::player::short_name;
use crate::core::{GameEvent, GameId, Player, PlayerGameStats, PlayerId};
use crate::error::{Error, Result};

/// Header row of an exported event log.
pub const CSV_HEADER: [&str; 6] =
    ["timestamp", "event_type", "outcome", "offense", "defense", "metadata"];

/// File name a transport should offer for a game's export.
#[must_use]
pub fn export_file_name(game: GameId) -> String {
    format!("game_{}_events.csv", game.raw())
}

/// Render an event log as CSV.
///
/// Players are written by display name (blank when absent or unknown),
/// timestamps as RFC 3339 and metadata as compact JSON (`{}` when absent).
pub fn events_csv(events: &[GameEvent], players: &FxHashMap<PlayerId, Player>) -> Result<String> {
    let name = |id: Option<PlayerId>| {
        id.and_then(|id| players.get(&id))
            .map(Player::display_name)
            .unwrap_or_default()
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for event in events {
        let record = &event.record;
        let metadata = record
            .metadata
            .as_ref()
            .map_or_else(|| "{}".to_string(), ToString::to_string);
        writer.write_record([
            record.created_at.to_rfc3339(),
            record.kind.as_str().to_string(),
            record.outcome.clone(),
            name(record.offense),
            name(record.defense),
            metadata,
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Career totals for one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub player_id: PlayerId,
    /// `"First L."`
    pub name: String,
    pub points_for: u32,
    pub shots_taken: u32,
    pub shots_home: u32,
    pub steals_success: u32,
    pub catches_made: u32,
}

impl PlayerTotals {
    fn new(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: short_name(&player.first_name, &player.last_initial),
            points_for: 0,
            shots_taken: 0,
            shots_home: 0,
            steals_success: 0,
            catches_made: 0,
        }
    }

    fn add(&mut self, row: &PlayerGameStats) {
        self.points_for += row.points_for;
        self.shots_taken += row.shots_taken;
        self.shots_home += row.shots_home;
        self.steals_success += row.steals_success;
        self.catches_made += row.catches_made;
    }
}

/// Sum stat rows per player, highest `points_for` first.
///
/// Players without any stat row are left out, as are rows whose player is
/// unknown.
#[must_use]
pub fn player_totals(players: &[Player], rows: &[PlayerGameStats]) -> Vec<PlayerTotals> {
    let by_id: FxHashMap<PlayerId, &Player> = players.iter().map(|p| (p.id, p)).collect();
    let mut totals: FxHashMap<PlayerId, PlayerTotals> = FxHashMap::default();

    for row in rows {
        if let Some(player) = by_id.get(&row.player_id) {
            totals
                .entry(row.player_id)
                .or_insert_with(|| PlayerTotals::new(player))
                .add(row);
        }
    }

    let mut totals: Vec<_> = totals.into_values().collect();
    totals.sort_by(|a, b| b.points_for.cmp(&a.points_for).then(a.player_id.cmp(&b.player_id)));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventId, EventKind, EventRecord, NewPlayer};
    use chrono::{TimeZone, Utc};

    fn player(id: i64, first: &str, initial: &str) -> Player {
        Player::from_new(PlayerId::new(id), NewPlayer::new(first, initial))
    }

    #[test]
    fn test_csv_layout() {
        let ann = player(1, "Ann", "A");
        let bob = player(2, "Bob", "B");
        let players: FxHashMap<_, _> = [(ann.id, ann), (bob.id, bob)].into_iter().collect();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap();
        let game = GameId::new(1);

        let events = vec![
            GameEvent::new(
                EventId::new(1),
                game,
                EventRecord::new(EventKind::Rotation, "swap_offense", at),
            ),
            GameEvent::new(
                EventId::new(2),
                game,
                EventRecord::new(EventKind::Shot, "out", at)
                    .with_players(PlayerId::new(1), PlayerId::new(2)),
            ),
        ];

        let csv = events_csv(&events, &players).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "timestamp,event_type,outcome,offense,defense,metadata");
        assert_eq!(lines[1], "2024-05-01T18:30:00+00:00,rotation,swap_offense,,,{}");
        assert_eq!(lines[2], "2024-05-01T18:30:00+00:00,shot,out,Ann A.,Bob B.,{}");
    }

    #[test]
    fn test_csv_quotes_metadata() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap();
        let record = EventRecord::new(EventKind::Knock, "update", at)
            .with_metadata(serde_json::json!({"first": 1}));
        let events = vec![GameEvent::new(EventId::new(1), GameId::new(1), record)];

        let csv = events_csv(&events, &FxHashMap::default()).unwrap();

        assert!(csv.lines().nth(1).unwrap().ends_with(r#","{""first"":1}""#));
    }

    #[test]
    fn test_totals_sum_across_games() {
        let players = vec![player(1, "Ann", "A"), player(2, "Bob", "B"), player(3, "Cy", "C")];

        let mut a1 = PlayerGameStats::new(PlayerId::new(1), GameId::new(1));
        a1.points_for = 2;
        a1.shots_taken = 3;
        let mut a2 = PlayerGameStats::new(PlayerId::new(1), GameId::new(2));
        a2.points_for = 1;
        a2.catches_made = 4;
        let mut b1 = PlayerGameStats::new(PlayerId::new(2), GameId::new(1));
        b1.points_for = 5;

        let totals = player_totals(&players, &[a1, a2, b1]);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].name, "Bob B.");
        assert_eq!(totals[0].points_for, 5);
        assert_eq!(totals[1].points_for, 3);
        assert_eq!(totals[1].shots_taken, 3);
        assert_eq!(totals[1].catches_made, 4);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name(GameId::new(7)), "game_7_events.csv");
    }
}

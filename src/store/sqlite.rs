//! SQLite store.
//!
//! One database file holds four tables: `players`, `games`,
//! `player_game_stats` (unique per player and game) and `game_events`.
//! Every [`GameStore::commit`] runs inside a single SQLite transaction.

use std::path::Path;
use std::time::Duration;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{GameStore, Transition};
use crate::core::{
    AppConfig, Bases, EventId, EventKind, EventRecord, Game, GameEvent, GameId, GameStatus,
    HalfInning, NewGame, NewPlayer, Player, PlayerGameStats, PlayerId, Role, Roles,
};
use crate::error::{Error, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_initial TEXT NOT NULL,
    nickname TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY,
    home_team TEXT NOT NULL,
    away_team TEXT NOT NULL,
    inning INTEGER NOT NULL DEFAULT 1,
    half TEXT NOT NULL DEFAULT 'top',
    outs INTEGER NOT NULL DEFAULT 0 CHECK (outs BETWEEN 0 AND 1),
    strikes INTEGER NOT NULL DEFAULT 0 CHECK (strikes BETWEEN 0 AND 2),
    home_score INTEGER NOT NULL DEFAULT 0,
    away_score INTEGER NOT NULL DEFAULT 0,
    first_base INTEGER NOT NULL DEFAULT 0,
    second_base INTEGER NOT NULL DEFAULT 0,
    third_base INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'scheduled',
    offensive_shooter_id INTEGER REFERENCES players(id),
    offensive_drinker_id INTEGER REFERENCES players(id),
    defensive_catcher_id INTEGER REFERENCES players(id),
    defensive_drinker_id INTEGER REFERENCES players(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS game_events (
    id INTEGER PRIMARY KEY,
    game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    event_type TEXT NOT NULL,
    outcome TEXT NOT NULL,
    offense_player_id INTEGER REFERENCES players(id),
    defense_player_id INTEGER REFERENCES players(id),
    metadata TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS player_game_stats (
    id INTEGER PRIMARY KEY,
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    points_for INTEGER NOT NULL DEFAULT 0,
    points_against INTEGER NOT NULL DEFAULT 0,
    shots_taken INTEGER NOT NULL DEFAULT 0,
    shots_first INTEGER NOT NULL DEFAULT 0,
    shots_second INTEGER NOT NULL DEFAULT 0,
    shots_third INTEGER NOT NULL DEFAULT 0,
    shots_home INTEGER NOT NULL DEFAULT 0,
    shots_grandslam INTEGER NOT NULL DEFAULT 0,
    shots_strike INTEGER NOT NULL DEFAULT 0,
    shots_out INTEGER NOT NULL DEFAULT 0,
    steals_success INTEGER NOT NULL DEFAULT 0,
    steals_bonus INTEGER NOT NULL DEFAULT 0,
    steals_fail INTEGER NOT NULL DEFAULT 0,
    bunts_success INTEGER NOT NULL DEFAULT 0,
    bunts_bonus INTEGER NOT NULL DEFAULT 0,
    bunts_fail INTEGER NOT NULL DEFAULT 0,
    catches_made INTEGER NOT NULL DEFAULT 0,
    catches_missed INTEGER NOT NULL DEFAULT 0,
    knocks_first INTEGER NOT NULL DEFAULT 0,
    knocks_second INTEGER NOT NULL DEFAULT 0,
    knocks_third INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CONSTRAINT uix_player_game UNIQUE (player_id, game_id)
);

CREATE INDEX IF NOT EXISTS idx_game_events_game ON game_events(game_id, created_at);
CREATE INDEX IF NOT EXISTS idx_player_game_stats_game ON player_game_stats(game_id);
"#;

const PLAYER_COLUMNS: &str = "id, first_name, last_initial, nickname, created_at, updated_at";

const GAME_COLUMNS: &str = "id, home_team, away_team, inning, half, outs, strikes, home_score, \
     away_score, first_base, second_base, third_base, status, offensive_shooter_id, \
     offensive_drinker_id, defensive_catcher_id, defensive_drinker_id, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, game_id, event_type, outcome, offense_player_id, \
     defense_player_id, metadata, created_at";

const STATS_COLUMNS: &str = "player_id, game_id, points_for, points_against, shots_taken, \
     shots_first, shots_second, shots_third, shots_home, shots_grandslam, shots_strike, \
     shots_out, steals_success, steals_bonus, steals_fail, bunts_success, bunts_bonus, \
     bunts_fail, catches_made, catches_missed, knocks_first, knocks_second, knocks_third, \
     created_at, updated_at";

// === Column conversions ===

macro_rules! sql_id {
    ($($id:ident),+) => {$(
        impl ToSql for $id {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.raw()))
            }
        }

        impl FromSql for $id {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map($id::new)
            }
        }
    )+};
}

macro_rules! sql_enum {
    ($($enum:ident),+) => {$(
        impl ToSql for $enum {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $enum {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    )+};
}

sql_id!(PlayerId, GameId, EventId);
sql_enum!(HalfInning, GameStatus, EventKind);

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_initial: row.get("last_initial")?,
        nickname: row.get("nickname")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn game_from_row(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get("id")?,
        home_team: row.get("home_team")?,
        away_team: row.get("away_team")?,
        inning: row.get("inning")?,
        half: row.get("half")?,
        outs: row.get("outs")?,
        strikes: row.get("strikes")?,
        home_score: row.get("home_score")?,
        away_score: row.get("away_score")?,
        bases: Bases::new(row.get("first_base")?, row.get("second_base")?, row.get("third_base")?),
        status: row.get("status")?,
        roles: Roles {
            offensive_shooter: row.get("offensive_shooter_id")?,
            offensive_drinker: row.get("offensive_drinker_id")?,
            defensive_catcher: row.get("defensive_catcher_id")?,
            defensive_drinker: row.get("defensive_drinker_id")?,
        },
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<GameEvent> {
    Ok(GameEvent {
        id: row.get("id")?,
        game_id: row.get("game_id")?,
        record: EventRecord {
            kind: row.get("event_type")?,
            outcome: row.get("outcome")?,
            offense: row.get("offense_player_id")?,
            defense: row.get("defense_player_id")?,
            metadata: row.get("metadata")?,
            created_at: row.get("created_at")?,
        },
    })
}

fn stats_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerGameStats> {
    Ok(PlayerGameStats {
        player_id: row.get("player_id")?,
        game_id: row.get("game_id")?,
        points_for: row.get("points_for")?,
        points_against: row.get("points_against")?,
        shots_taken: row.get("shots_taken")?,
        shots_first: row.get("shots_first")?,
        shots_second: row.get("shots_second")?,
        shots_third: row.get("shots_third")?,
        shots_home: row.get("shots_home")?,
        shots_grandslam: row.get("shots_grandslam")?,
        shots_strike: row.get("shots_strike")?,
        shots_out: row.get("shots_out")?,
        steals_success: row.get("steals_success")?,
        steals_bonus: row.get("steals_bonus")?,
        steals_fail: row.get("steals_fail")?,
        bunts_success: row.get("bunts_success")?,
        bunts_bonus: row.get("bunts_bonus")?,
        bunts_fail: row.get("bunts_fail")?,
        catches_made: row.get("catches_made")?,
        catches_missed: row.get("catches_missed")?,
        knocks_first: row.get("knocks_first")?,
        knocks_second: row.get("knocks_second")?,
        knocks_third: row.get("knocks_third")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn write_game(conn: &Connection, game: &Game) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE games SET home_team = ?2, away_team = ?3, inning = ?4, half = ?5, outs = ?6, \
         strikes = ?7, home_score = ?8, away_score = ?9, first_base = ?10, second_base = ?11, \
         third_base = ?12, status = ?13, offensive_shooter_id = ?14, offensive_drinker_id = ?15, \
         defensive_catcher_id = ?16, defensive_drinker_id = ?17, updated_at = ?18 \
         WHERE id = ?1",
        params![
            game.id,
            game.home_team,
            game.away_team,
            game.inning,
            game.half,
            game.outs,
            game.strikes,
            game.home_score,
            game.away_score,
            game.bases.first,
            game.bases.second,
            game.bases.third,
            game.status,
            game.roles.get(Role::OffensiveShooter),
            game.roles.get(Role::OffensiveDrinker),
            game.roles.get(Role::DefensiveCatcher),
            game.roles.get(Role::DefensiveDrinker),
            game.updated_at,
        ],
    )
}

fn upsert_stats(conn: &Connection, row: &PlayerGameStats) -> rusqlite::Result<usize> {
    conn.execute(
        &format!(
            "INSERT INTO player_game_stats ({STATS_COLUMNS}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, \
              ?19, ?20, ?21, ?22, ?23, ?24, ?25) \
             ON CONFLICT (player_id, game_id) DO UPDATE SET \
             points_for = excluded.points_for, points_against = excluded.points_against, \
             shots_taken = excluded.shots_taken, shots_first = excluded.shots_first, \
             shots_second = excluded.shots_second, shots_third = excluded.shots_third, \
             shots_home = excluded.shots_home, shots_grandslam = excluded.shots_grandslam, \
             shots_strike = excluded.shots_strike, shots_out = excluded.shots_out, \
             steals_success = excluded.steals_success, steals_bonus = excluded.steals_bonus, \
             steals_fail = excluded.steals_fail, bunts_success = excluded.bunts_success, \
             bunts_bonus = excluded.bunts_bonus, bunts_fail = excluded.bunts_fail, \
             catches_made = excluded.catches_made, catches_missed = excluded.catches_missed, \
             knocks_first = excluded.knocks_first, knocks_second = excluded.knocks_second, \
             knocks_third = excluded.knocks_third, updated_at = excluded.updated_at"
        ),
        params![
            row.player_id,
            row.game_id,
            row.points_for,
            row.points_against,
            row.shots_taken,
            row.shots_first,
            row.shots_second,
            row.shots_third,
            row.shots_home,
            row.shots_grandslam,
            row.shots_strike,
            row.shots_out,
            row.steals_success,
            row.steals_bonus,
            row.steals_fail,
            row.bunts_success,
            row.bunts_bonus,
            row.bunts_fail,
            row.catches_made,
            row.catches_missed,
            row.knocks_first,
            row.knocks_second,
            row.knocks_third,
            row.created_at,
            row.updated_at,
        ],
    )
}

/// Store backed by a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::with_connection(conn)
    }

    /// Open the database named by the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::open(&config.database_path)
    }

    /// Open a private in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn collect<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl GameStore for SqliteStore {
    fn insert_player(&mut self, new: NewPlayer) -> Result<Player> {
        let draft = Player::from_new(PlayerId::new(0), new);
        self.conn.execute(
            "INSERT INTO players (first_name, last_initial, nickname, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                draft.first_name,
                draft.last_initial,
                draft.nickname,
                draft.created_at,
                draft.updated_at
            ],
        )?;
        Ok(Player {
            id: PlayerId::new(self.conn.last_insert_rowid()),
            ..draft
        })
    }

    fn update_player(&mut self, player: &Player) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE players SET first_name = ?2, last_initial = ?3, nickname = ?4, updated_at = ?5 \
             WHERE id = ?1",
            params![
                player.id,
                player.first_name,
                player.last_initial,
                player.nickname,
                player.updated_at
            ],
        )?;
        if changed == 0 {
            return Err(Error::player_not_found(player.id));
        }
        Ok(())
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"),
                params![id],
                player_from_row,
            )
            .optional()?)
    }

    fn players(&self) -> Result<Vec<Player>> {
        self.collect(
            &format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY first_name ASC, id ASC"),
            params![],
            player_from_row,
        )
    }

    fn insert_game(&mut self, new: NewGame) -> Result<Game> {
        let draft = Game::from_new(GameId::new(0), new);
        self.conn.execute(
            "INSERT INTO games (home_team, away_team, offensive_shooter_id, offensive_drinker_id, \
             defensive_catcher_id, defensive_drinker_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                draft.home_team,
                draft.away_team,
                draft.roles.offensive_shooter,
                draft.roles.offensive_drinker,
                draft.roles.defensive_catcher,
                draft.roles.defensive_drinker,
                draft.created_at,
                draft.updated_at,
            ],
        )?;
        Ok(Game {
            id: GameId::new(self.conn.last_insert_rowid()),
            ..draft
        })
    }

    fn update_game(&mut self, game: &Game) -> Result<()> {
        if write_game(&self.conn, game)? == 0 {
            return Err(Error::game_not_found(game.id));
        }
        Ok(())
    }

    fn game(&self, id: GameId) -> Result<Option<Game>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {GAME_COLUMNS} FROM games WHERE id = ?1"),
                params![id],
                game_from_row,
            )
            .optional()?)
    }

    fn games(&self) -> Result<Vec<Game>> {
        self.collect(
            &format!("SELECT {GAME_COLUMNS} FROM games ORDER BY created_at DESC, id DESC"),
            params![],
            game_from_row,
        )
    }

    fn max_game_id(&self) -> Result<Option<GameId>> {
        Ok(self.conn.query_row("SELECT MAX(id) FROM games", params![], |row| row.get(0))?)
    }

    fn stats(&self, game: GameId, player: PlayerId) -> Result<Option<PlayerGameStats>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {STATS_COLUMNS} FROM player_game_stats \
                     WHERE game_id = ?1 AND player_id = ?2"
                ),
                params![game, player],
                stats_from_row,
            )
            .optional()?)
    }

    fn game_stats(&self, game: GameId) -> Result<Vec<PlayerGameStats>> {
        self.collect(
            &format!(
                "SELECT {STATS_COLUMNS} FROM player_game_stats WHERE game_id = ?1 \
                 ORDER BY points_for DESC, player_id ASC"
            ),
            params![game],
            stats_from_row,
        )
    }

    fn all_stats(&self) -> Result<Vec<PlayerGameStats>> {
        self.collect(
            &format!("SELECT {STATS_COLUMNS} FROM player_game_stats ORDER BY game_id, player_id"),
            params![],
            stats_from_row,
        )
    }

    fn events(&self, game: GameId) -> Result<Vec<GameEvent>> {
        self.collect(
            &format!(
                "SELECT {EVENT_COLUMNS} FROM game_events WHERE game_id = ?1 \
                 ORDER BY created_at ASC, id ASC"
            ),
            params![game],
            event_from_row,
        )
    }

    fn commit(&mut self, transition: Transition) -> Result<Vec<GameEvent>> {
        let Transition { game, stats, records } = transition;
        let tx = self.conn.transaction()?;

        if write_game(&tx, &game)? == 0 {
            // Dropping the transaction rolls it back.
            return Err(Error::game_not_found(game.id));
        }
        for row in &stats {
            upsert_stats(&tx, row)?;
        }

        let mut appended = Vec::with_capacity(records.len());
        for record in records {
            tx.execute(
                "INSERT INTO game_events (game_id, event_type, outcome, offense_player_id, \
                 defense_player_id, metadata, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    game.id,
                    record.kind,
                    record.outcome,
                    record.offense,
                    record.defense,
                    record.metadata,
                    record.created_at,
                ],
            )?;
            appended.push(GameEvent::new(EventId::new(tx.last_insert_rowid()), game.id, record));
        }

        tx.commit()?;
        debug!(
            game = %game.id,
            rows = stats.len(),
            events = appended.len(),
            "transition committed"
        );
        Ok(appended)
    }
}

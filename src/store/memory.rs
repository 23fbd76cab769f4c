//! In-memory store.
//!
//! Tables are `FxHashMap`s keyed by id; the event log is an `im::Vector`
//! so cloning a whole store (e.g. to keep a checkpoint) is cheap.

use im::Vector;
use rustc_hash::FxHashMap;

use super::{GameStore, Transition};
use crate::core::{
    EventId, Game, GameEvent, GameId, NewGame, NewPlayer, Player, PlayerGameStats, PlayerId,
};
use crate::error::{Error, Result};

/// Store kept entirely in memory.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    players: FxHashMap<PlayerId, Player>,
    games: FxHashMap<GameId, Game>,
    stats: FxHashMap<(GameId, PlayerId), PlayerGameStats>,
    events: Vector<GameEvent>,

    next_player: PlayerId,
    next_game: GameId,
    next_event: EventId,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            players: FxHashMap::default(),
            games: FxHashMap::default(),
            stats: FxHashMap::default(),
            events: Vector::new(),
            next_player: PlayerId::new(1),
            next_game: GameId::new(1),
            next_event: EventId::new(1),
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of logged records across all games.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

impl GameStore for MemoryStore {
    fn insert_player(&mut self, new: NewPlayer) -> Result<Player> {
        let id = self.next_player;
        self.next_player = id.next();
        let player = Player::from_new(id, new);
        self.players.insert(id, player.clone());
        Ok(player)
    }

    fn update_player(&mut self, player: &Player) -> Result<()> {
        let slot = self
            .players
            .get_mut(&player.id)
            .ok_or_else(|| Error::player_not_found(player.id))?;
        *slot = player.clone();
        Ok(())
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>> {
        Ok(self.players.get(&id).cloned())
    }

    fn players(&self) -> Result<Vec<Player>> {
        let mut players: Vec<_> = self.players.values().cloned().collect();
        players.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.id.cmp(&b.id)));
        Ok(players)
    }

    fn insert_game(&mut self, new: NewGame) -> Result<Game> {
        let id = self.next_game;
        self.next_game = id.next();
        let game = Game::from_new(id, new);
        self.games.insert(id, game.clone());
        Ok(game)
    }

    fn update_game(&mut self, game: &Game) -> Result<()> {
        let slot = self.games.get_mut(&game.id).ok_or_else(|| Error::game_not_found(game.id))?;
        *slot = game.clone();
        Ok(())
    }

    fn game(&self, id: GameId) -> Result<Option<Game>> {
        Ok(self.games.get(&id).cloned())
    }

    fn games(&self) -> Result<Vec<Game>> {
        let mut games: Vec<_> = self.games.values().cloned().collect();
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(games)
    }

    fn max_game_id(&self) -> Result<Option<GameId>> {
        Ok(self.games.keys().copied().max())
    }

    fn stats(&self, game: GameId, player: PlayerId) -> Result<Option<PlayerGameStats>> {
        Ok(self.stats.get(&(game, player)).cloned())
    }

    fn game_stats(&self, game: GameId) -> Result<Vec<PlayerGameStats>> {
        let mut rows: Vec<_> = self
            .stats
            .values()
            .filter(|row| row.game_id == game)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.points_for.cmp(&a.points_for).then(a.player_id.cmp(&b.player_id)));
        Ok(rows)
    }

    fn all_stats(&self) -> Result<Vec<PlayerGameStats>> {
        let mut rows: Vec<_> = self.stats.values().cloned().collect();
        rows.sort_by_key(PlayerGameStats::key);
        Ok(rows)
    }

    fn events(&self, game: GameId) -> Result<Vec<GameEvent>> {
        let mut events: Vec<_> = self
            .events
            .iter()
            .filter(|event| event.game_id == game)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.record.created_at.cmp(&b.record.created_at).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    fn commit(&mut self, transition: Transition) -> Result<Vec<GameEvent>> {
        let Transition { game, stats, records } = transition;
        let game_id = game.id;

        // Validate everything before the first write.
        if !self.games.contains_key(&game_id) {
            return Err(Error::game_not_found(game_id));
        }
        let referenced = stats
            .iter()
            .map(|row| row.player_id)
            .chain(records.iter().flat_map(|r| r.offense.into_iter().chain(r.defense)));
        for player in referenced {
            if !self.players.contains_key(&player) {
                return Err(Error::player_not_found(player));
            }
        }

        self.games.insert(game_id, game);
        for row in stats {
            self.stats.insert(row.key(), row);
        }

        let mut appended = Vec::with_capacity(records.len());
        for record in records {
            let id = self.next_event;
            self.next_event = id.next();
            let event = GameEvent::new(id, game_id, record);
            self.events.push_back(event.clone());
            appended.push(event);
        }
        Ok(appended)
    }
}

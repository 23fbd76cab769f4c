//! Read-only projection of a game for external consumers.

use serde::{Deserialize, Serialize};

use super::entity::GameId;
use super::state::{Bases, Game, HalfInning, Roles};

/// Scoreboard view of a game.
///
/// Serializes as
/// `{id, home_team, away_team, inning, half, outs, strikes, home_score,
/// away_score, bases: {first, second, third}, roles: {offensive_shooter,
/// offensive_drinker, defensive_catcher, defensive_drinker}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub home_team: String,
    pub away_team: String,
    pub inning: u32,
    pub half: HalfInning,
    pub outs: u32,
    pub strikes: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub bases: Bases,
    pub roles: Roles,
}

impl From<&Game> for GameSnapshot {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            inning: game.inning,
            half: game.half,
            outs: game.outs,
            strikes: game.strikes,
            home_score: game.home_score,
            away_score: game.away_score,
            bases: game.bases,
            roles: game.roles,
        }
    }
}

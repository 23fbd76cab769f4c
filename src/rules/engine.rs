//! The rules engine.
//!
//! `GameEngine` applies one recorded event to a borrowed `Game` and the
//! `StatsBook` of that game, and collects the event log records the
//! transition produced. It never touches storage: the caller loads the
//! game, runs one operation, and commits the game, the touched stat rows
//! and the records together, or discards all of them on error.
//!
//! ## Roles per event
//!
//! | event | offense | defense |
//! |-------|---------|---------|
//! | shot  | offensive shooter | defensive catcher |
//! | steal | offensive drinker | defensive drinker |
//! | bunt  | offensive drinker | defensive drinker |
//! | knock | offensive shooter | defensive catcher |
//!
//! An explicit player passed to an operation overrides the slot occupant.
//!
//! ## Outs and rotation
//!
//! The first out of a half swaps the offensive shooter and drinker. The
//! second retires the side: the defensive drinker and offensive drinker
//! trade places, so do the offensive shooter and defensive catcher, the
//! half flips and the count resets. Entering a top half starts a new
//! inning. Each rotation appends its own `rotation` record ahead of the
//! record of the event that caused it.

use chrono::{DateTime, Utc};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::bases::Advance;
use super::outcome::{BuntOutcome, KnockBase, KnockCounts, ShotOutcome, StealOutcome};
use crate::core::event::rotation;
use crate::core::{
    EventKind, EventRecord, Game, GameSnapshot, GameStatus, HalfInning, PlayerGameStats, PlayerId,
    Role, StatsBook,
};
use crate::error::RulesError;

/// Strikes a batter can carry; the next one is an out.
pub const MAX_STRIKES: u32 = 2;

/// Outs that retire the side.
pub const OUTS_PER_HALF: u32 = 2;

/// Records produced by one transition. A shot that ends a half produces
/// at most two.
pub type TransitionRecords = SmallVec<[EventRecord; 4]>;

/// Applies events to one game.
pub struct GameEngine<'a> {
    game: &'a mut Game,
    stats: &'a mut StatsBook,
    records: TransitionRecords,
    now: DateTime<Utc>,
}

impl<'a> GameEngine<'a> {
    /// Create an engine over a game and its stats book.
    ///
    /// Records are stamped with the current time.
    pub fn new(game: &'a mut Game, stats: &'a mut StatsBook) -> Self {
        debug_assert_eq!(game.id, stats.game_id(), "stats book belongs to another game");
        Self {
            game,
            stats,
            records: TransitionRecords::new(),
            now: Utc::now(),
        }
    }

    /// Stamp records with a fixed time instead of the current one.
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// The game being transitioned.
    #[must_use]
    pub fn game(&self) -> &Game {
        &*self.game
    }

    /// Records produced so far.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Consume the engine, releasing the borrows and returning the records.
    #[must_use]
    pub fn into_records(self) -> TransitionRecords {
        self.records
    }

    /// Read-only snapshot of the current state.
    #[must_use]
    pub fn export_snapshot(&self) -> GameSnapshot {
        GameSnapshot::from(&*self.game)
    }

    // === Events ===

    /// Record a shot by `shooter` (default: offensive shooter) against
    /// `catcher` (default: defensive catcher).
    pub fn record_shot(
        &mut self,
        outcome: ShotOutcome,
        shooter: Option<PlayerId>,
        catcher: Option<PlayerId>,
    ) -> Result<GameSnapshot, RulesError> {
        let (shooter, catcher) =
            self.participants(shooter, Role::OffensiveShooter, catcher, Role::DefensiveCatcher)?;
        self.mark_in_progress();
        debug!(game = %self.game.id, %outcome, %shooter, %catcher, "shot");

        self.credit(shooter, |s| s.shots_taken += 1);
        match outcome {
            ShotOutcome::First => {
                self.credit(shooter, |s| s.shots_first += 1);
                self.ball_in_play(Advance::Single, shooter);
            }
            ShotOutcome::Second => {
                self.credit(shooter, |s| s.shots_second += 1);
                self.ball_in_play(Advance::Double, shooter);
            }
            ShotOutcome::Third => {
                self.credit(shooter, |s| s.shots_third += 1);
                self.ball_in_play(Advance::Triple, shooter);
            }
            ShotOutcome::Home => {
                self.credit(shooter, |s| s.shots_home += 1);
                self.ball_in_play(Advance::HomeRun, shooter);
            }
            ShotOutcome::GrandSlam => {
                self.credit(shooter, |s| s.shots_grandslam += 1);
                self.ball_in_play(Advance::GrandSlam, shooter);
            }
            ShotOutcome::Strike => {
                self.credit(shooter, |s| s.shots_strike += 1);
                self.credit(catcher, |s| s.catches_missed += 1);
                self.count_strike();
            }
            ShotOutcome::Out => {
                self.credit(shooter, |s| s.shots_out += 1);
                self.credit(catcher, |s| s.catches_made += 1);
                self.count_out();
            }
        }

        self.log(
            EventRecord::new(EventKind::Shot, outcome.as_str(), self.now)
                .with_players(shooter, catcher),
        );
        Ok(self.export_snapshot())
    }

    /// Record a steal attempt by `offense` (default: offensive drinker)
    /// against `defense` (default: defensive drinker).
    ///
    /// A failed steal is an out and erases every runner.
    pub fn record_steal(
        &mut self,
        outcome: StealOutcome,
        offense: Option<PlayerId>,
        defense: Option<PlayerId>,
    ) -> Result<GameSnapshot, RulesError> {
        let (offense, defense) =
            self.participants(offense, Role::OffensiveDrinker, defense, Role::DefensiveDrinker)?;
        self.mark_in_progress();
        debug!(game = %self.game.id, %outcome, %offense, %defense, "steal");

        match outcome {
            StealOutcome::Success => {
                self.credit(offense, |s| s.steals_success += 1);
                self.credit(defense, |s| s.catches_missed += 1);
                self.advance(Advance::Steal, offense);
            }
            StealOutcome::Bonus => {
                self.credit(offense, |s| s.steals_bonus += 1);
                self.credit(defense, |s| s.catches_missed += 1);
                self.advance(Advance::StealBonus, offense);
            }
            StealOutcome::Fail => {
                self.credit(offense, |s| s.steals_fail += 1);
                self.credit(defense, |s| s.catches_made += 1);
                self.count_out();
                self.advance(Advance::Clear, offense);
            }
        }

        self.log(
            EventRecord::new(EventKind::Steal, outcome.as_str(), self.now)
                .with_players(offense, defense),
        );
        Ok(self.export_snapshot())
    }

    /// Record a bunt by `offense` (default: offensive drinker) against
    /// `defense` (default: defensive drinker).
    ///
    /// A failed bunt is an out and erases every runner.
    pub fn record_bunt(
        &mut self,
        outcome: BuntOutcome,
        offense: Option<PlayerId>,
        defense: Option<PlayerId>,
    ) -> Result<GameSnapshot, RulesError> {
        let (offense, defense) =
            self.participants(offense, Role::OffensiveDrinker, defense, Role::DefensiveDrinker)?;
        self.mark_in_progress();
        debug!(game = %self.game.id, %outcome, %offense, %defense, "bunt");

        match outcome {
            BuntOutcome::Success => {
                self.credit(offense, |s| s.bunts_success += 1);
                self.credit(defense, |s| s.catches_missed += 1);
                self.ball_in_play(Advance::Single, offense);
            }
            BuntOutcome::Bonus => {
                self.credit(offense, |s| s.bunts_bonus += 1);
                self.credit(defense, |s| s.catches_missed += 1);
                self.ball_in_play(Advance::Double, offense);
            }
            BuntOutcome::Fail => {
                self.credit(offense, |s| s.bunts_fail += 1);
                self.credit(defense, |s| s.catches_made += 1);
                self.count_out();
                self.advance(Advance::Clear, offense);
            }
        }

        self.log(
            EventRecord::new(EventKind::Bunt, outcome.as_str(), self.now)
                .with_players(offense, defense),
        );
        Ok(self.export_snapshot())
    }

    /// Record knocks against the current shooter and catcher.
    ///
    /// Units are applied first-base units first, then second, then third,
    /// each advancing runners from the occupancy the previous unit left.
    /// Knocks leave the strike count and the shot counters alone.
    pub fn record_knock(&mut self, counts: KnockCounts) -> Result<GameSnapshot, RulesError> {
        let (shooter, catcher) =
            self.participants(None, Role::OffensiveShooter, None, Role::DefensiveCatcher)?;
        self.mark_in_progress();
        debug!(game = %self.game.id, ?counts, %shooter, %catcher, "knock");

        for base in KnockBase::ORDER {
            let advance = match base {
                KnockBase::First => Advance::Single,
                KnockBase::Second => Advance::Double,
                KnockBase::Third => Advance::Triple,
            };
            for _ in 0..counts.get(base) {
                self.credit(catcher, |s| match base {
                    KnockBase::First => s.knocks_first += 1,
                    KnockBase::Second => s.knocks_second += 1,
                    KnockBase::Third => s.knocks_third += 1,
                });
                self.advance(advance, shooter);
            }
        }

        self.log(
            EventRecord::new(EventKind::Knock, "update", self.now)
                .with_players(shooter, catcher)
                .with_metadata(counts.to_metadata()),
        );
        Ok(self.export_snapshot())
    }

    // === Sub-rules ===

    /// Resolve both participants, failing before anything is mutated.
    fn participants(
        &self,
        offense: Option<PlayerId>,
        offense_role: Role,
        defense: Option<PlayerId>,
        defense_role: Role,
    ) -> Result<(PlayerId, PlayerId), RulesError> {
        let resolve = |player: Option<PlayerId>, role: Role| {
            player
                .or_else(|| self.game.roles.get(role))
                .ok_or(RulesError::MissingParticipant { role })
        };
        Ok((resolve(offense, offense_role)?, resolve(defense, defense_role)?))
    }

    fn mark_in_progress(&mut self) {
        if self.game.status == GameStatus::Scheduled {
            self.game.status = GameStatus::InProgress;
            info!(game = %self.game.id, "game started");
        }
    }

    fn credit(&mut self, player: PlayerId, update: impl FnOnce(&mut PlayerGameStats)) {
        update(self.stats.entry(player));
    }

    /// Advance runners and reset the count, as for any ball put in play.
    fn ball_in_play(&mut self, advance: Advance, batter: PlayerId) {
        self.advance(advance, batter);
        self.game.strikes = 0;
    }

    /// Move runners and score the resulting runs for `scorer`.
    fn advance(&mut self, advance: Advance, scorer: PlayerId) {
        let result = self.game.bases.advance(advance);
        self.game.bases = result.bases;
        for _ in 0..result.runs {
            self.score_run(scorer);
        }
    }

    /// Scores saturate at `u32::MAX` so they never decrease.
    fn score_run(&mut self, scorer: PlayerId) {
        let score = match self.game.half {
            HalfInning::Top => &mut self.game.away_score,
            HalfInning::Bottom => &mut self.game.home_score,
        };
        *score = score.saturating_add(1);
        self.credit(scorer, |s| s.points_for = s.points_for.saturating_add(1));
    }

    fn count_strike(&mut self) {
        if self.game.strikes >= MAX_STRIKES {
            self.count_out();
        } else {
            self.game.strikes += 1;
        }
    }

    fn count_out(&mut self) {
        let outs = self.game.outs + 1;
        self.game.strikes = 0;

        if outs < OUTS_PER_HALF {
            self.game.outs = outs;
            self.game.roles.swap(Role::OffensiveShooter, Role::OffensiveDrinker);
            info!(game = %self.game.id, outs, "offense swapped");
            self.log(EventRecord::new(EventKind::Rotation, rotation::SWAP_OFFENSE, self.now));
        } else {
            self.game.outs = 0;
            self.game.roles.swap(Role::DefensiveDrinker, Role::OffensiveDrinker);
            self.game.roles.swap(Role::OffensiveShooter, Role::DefensiveCatcher);
            self.game.half = self.game.half.flip();
            if self.game.half == HalfInning::Top {
                self.game.inning += 1;
            }
            info!(
                game = %self.game.id,
                inning = self.game.inning,
                half = %self.game.half,
                batting = self.game.batting_team(),
                "side retired"
            );
            self.log(EventRecord::new(EventKind::Rotation, rotation::FULL_ROTATION, self.now));
        }
    }

    fn log(&mut self, record: EventRecord) {
        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bases, GameId};

    const SHOOTER: PlayerId = PlayerId::new(1);
    const DRINKER: PlayerId = PlayerId::new(2);
    const CATCHER: PlayerId = PlayerId::new(3);
    const D_DRINKER: PlayerId = PlayerId::new(4);

    fn staffed_game() -> (Game, StatsBook) {
        let mut game = Game::new(GameId::new(1), "Hops", "Barley");
        game.roles.set(Role::OffensiveShooter, Some(SHOOTER));
        game.roles.set(Role::OffensiveDrinker, Some(DRINKER));
        game.roles.set(Role::DefensiveCatcher, Some(CATCHER));
        game.roles.set(Role::DefensiveDrinker, Some(D_DRINKER));
        (game, StatsBook::new(GameId::new(1)))
    }

    #[test]
    fn test_first_event_starts_game() {
        let (mut game, mut stats) = staffed_game();
        let mut engine = GameEngine::new(&mut game, &mut stats);

        engine.record_shot(ShotOutcome::First, None, None).unwrap();

        assert_eq!(engine.game().status, GameStatus::InProgress);
    }

    #[test]
    fn test_missing_participant_mutates_nothing() {
        let (mut game, mut stats) = staffed_game();
        game.roles.set(Role::DefensiveCatcher, None);
        let before = game.clone();

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let err = engine.record_shot(ShotOutcome::Home, None, None).unwrap_err();

        assert_eq!(err, RulesError::MissingParticipant { role: Role::DefensiveCatcher });
        assert!(engine.records().is_empty());
        drop(engine);
        assert_eq!(game, before);
        assert_eq!(stats.touched_count(), 0);
    }

    #[test]
    fn test_override_fills_empty_slot() {
        let (mut game, mut stats) = staffed_game();
        game.roles.set(Role::DefensiveCatcher, None);
        let sub = PlayerId::new(9);

        let mut engine = GameEngine::new(&mut game, &mut stats);
        engine.record_shot(ShotOutcome::Out, None, Some(sub)).unwrap();
        drop(engine);

        assert_eq!(stats.get(sub).map(|s| s.catches_made), Some(1));
    }

    #[test]
    fn test_strike_counts_up() {
        let (mut game, mut stats) = staffed_game();
        let mut engine = GameEngine::new(&mut game, &mut stats);

        let snap = engine.record_shot(ShotOutcome::Strike, None, None).unwrap();
        assert_eq!(snap.strikes, 1);
        let snap = engine.record_shot(ShotOutcome::Strike, None, None).unwrap();
        assert_eq!(snap.strikes, 2);
        drop(engine);

        assert_eq!(stats.get(SHOOTER).map(|s| s.shots_strike), Some(2));
        assert_eq!(stats.get(CATCHER).map(|s| s.catches_missed), Some(2));
    }

    #[test]
    fn test_third_strike_is_out_and_swaps_offense() {
        let (mut game, mut stats) = staffed_game();
        let mut engine = GameEngine::new(&mut game, &mut stats);

        for _ in 0..3 {
            engine.record_shot(ShotOutcome::Strike, None, None).unwrap();
        }

        let snap = engine.export_snapshot();
        assert_eq!(snap.outs, 1);
        assert_eq!(snap.strikes, 0);
        assert_eq!(snap.roles.offensive_shooter, Some(DRINKER));
        assert_eq!(snap.roles.offensive_drinker, Some(SHOOTER));

        let kinds: Vec<_> = engine.records().iter().map(|r| (r.kind, r.outcome.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (EventKind::Shot, "strike"),
                (EventKind::Shot, "strike"),
                (EventKind::Rotation, "swap_offense"),
                (EventKind::Shot, "strike"),
            ]
        );
    }

    #[test]
    fn test_second_out_rotates_sides() {
        let (mut game, mut stats) = staffed_game();
        let mut engine = GameEngine::new(&mut game, &mut stats);

        engine.record_shot(ShotOutcome::Out, None, None).unwrap();
        // After the first out the drinker shoots.
        engine.record_shot(ShotOutcome::Out, None, None).unwrap();

        let snap = engine.export_snapshot();
        assert_eq!(snap.outs, 0);
        assert_eq!(snap.half, HalfInning::Bottom);
        assert_eq!(snap.inning, 1);
        // Offense after first out: shooter=DRINKER, drinker=SHOOTER.
        assert_eq!(snap.roles.offensive_shooter, Some(CATCHER));
        assert_eq!(snap.roles.defensive_catcher, Some(DRINKER));
        assert_eq!(snap.roles.offensive_drinker, Some(D_DRINKER));
        assert_eq!(snap.roles.defensive_drinker, Some(SHOOTER));
        drop(engine);

        assert_eq!(stats.get(CATCHER).map(|s| s.catches_made), Some(2));
    }

    #[test]
    fn test_inning_advances_entering_top() {
        let (mut game, mut stats) = staffed_game();
        game.half = HalfInning::Bottom;
        game.outs = 1;

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_shot(ShotOutcome::Out, None, None).unwrap();

        assert_eq!(snap.half, HalfInning::Top);
        assert_eq!(snap.inning, 2);
    }

    #[test]
    fn test_out_keeps_runners() {
        let (mut game, mut stats) = staffed_game();
        game.bases = Bases::new(true, false, true);

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_shot(ShotOutcome::Out, None, None).unwrap();

        assert_eq!(snap.bases, Bases::new(true, false, true));
    }

    #[test]
    fn test_runs_credit_batting_team_and_shooter() {
        let (mut game, mut stats) = staffed_game();
        game.half = HalfInning::Bottom;
        game.bases = Bases::new(false, true, false);

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_shot(ShotOutcome::Home, None, None).unwrap();
        drop(engine);

        assert_eq!(snap.home_score, 2);
        assert_eq!(snap.away_score, 0);
        assert_eq!(
            stats.get(SHOOTER).map(|s| (s.points_for, s.shots_home, s.shots_taken)),
            Some((2, 1, 1))
        );
    }

    #[test]
    fn test_score_saturates_at_max() {
        let (mut game, mut stats) = staffed_game();
        game.bases = Bases::new(true, true, true);
        game.away_score = u32::MAX - 1;
        stats.preload(PlayerGameStats {
            points_for: u32::MAX - 2,
            ..PlayerGameStats::new(SHOOTER, GameId::new(1))
        });

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_shot(ShotOutcome::Home, None, None).unwrap();
        drop(engine);

        assert_eq!(snap.away_score, u32::MAX);
        assert_eq!(snap.home_score, 0);
        assert!(snap.bases.is_empty());
        assert_eq!(stats.get(SHOOTER).map(|s| s.points_for), Some(u32::MAX));
    }

    #[test]
    fn test_ball_in_play_resets_strikes() {
        let (mut game, mut stats) = staffed_game();
        game.strikes = 2;

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_shot(ShotOutcome::Second, None, None).unwrap();

        assert_eq!(snap.strikes, 0);
        assert_eq!(snap.bases, Bases::new(false, true, false));
    }

    #[test]
    fn test_steal_success_scores_runner_from_third() {
        let (mut game, mut stats) = staffed_game();
        game.bases = Bases::new(true, true, true);
        game.strikes = 1;

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_steal(StealOutcome::Success, None, None).unwrap();
        drop(engine);

        assert_eq!(snap.bases, Bases::new(false, true, true));
        assert_eq!(snap.away_score, 1);
        assert_eq!(snap.strikes, 1);
        assert_eq!(stats.get(DRINKER).map(|s| (s.steals_success, s.points_for)), Some((1, 1)));
        assert_eq!(stats.get(D_DRINKER).map(|s| s.catches_missed), Some(1));
    }

    #[test]
    fn test_steal_bonus() {
        let (mut game, mut stats) = staffed_game();
        game.bases = Bases::new(true, true, false);

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_steal(StealOutcome::Bonus, None, None).unwrap();

        assert_eq!(snap.bases, Bases::new(false, false, true));
        assert_eq!(snap.away_score, 1);
    }

    #[test]
    fn test_failed_steal_clears_bases_and_records_out() {
        let (mut game, mut stats) = staffed_game();
        game.bases = Bases::new(true, true, false);

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_steal(StealOutcome::Fail, None, None).unwrap();
        drop(engine);

        assert!(snap.bases.is_empty());
        assert_eq!(snap.outs, 1);
        assert_eq!(stats.get(DRINKER).map(|s| s.steals_fail), Some(1));
        assert_eq!(stats.get(D_DRINKER).map(|s| s.catches_made), Some(1));
    }

    #[test]
    fn test_bunt_success_and_bonus() {
        let (mut game, mut stats) = staffed_game();
        game.bases = Bases::new(false, false, true);
        game.strikes = 2;

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_bunt(BuntOutcome::Success, None, None).unwrap();
        assert_eq!(snap.bases, Bases::new(true, false, false));
        assert_eq!(snap.away_score, 1);
        assert_eq!(snap.strikes, 0);

        let snap = engine.record_bunt(BuntOutcome::Bonus, None, None).unwrap();
        assert_eq!(snap.bases, Bases::new(false, true, true));
        drop(engine);

        assert_eq!(stats.get(DRINKER).map(|s| (s.bunts_success, s.bunts_bonus)), Some((1, 1)));
        assert_eq!(stats.get(D_DRINKER).map(|s| s.catches_missed), Some(2));
    }

    #[test]
    fn test_failed_bunt_clears_bases() {
        let (mut game, mut stats) = staffed_game();
        game.bases = Bases::new(true, false, true);

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_bunt(BuntOutcome::Fail, None, None).unwrap();
        drop(engine);

        assert!(snap.bases.is_empty());
        assert_eq!(snap.away_score, 0);
        assert_eq!(stats.get(D_DRINKER).map(|s| s.catches_made), Some(1));
    }

    #[test]
    fn test_knock_applies_units_in_order() {
        let (mut game, mut stats) = staffed_game();
        game.strikes = 1;

        let mut engine = GameEngine::new(&mut game, &mut stats);
        let snap = engine.record_knock(KnockCounts::new(2, 1, 0)).unwrap();
        drop(engine);

        // first: (1,0,0) -> (1,1,0); second: runners on 1st/2nd -> (0,1,1), 1 run.
        assert_eq!(snap.bases, Bases::new(false, true, true));
        assert_eq!(snap.away_score, 1);
        assert_eq!(snap.strikes, 1);

        let catcher = stats.get(CATCHER).cloned().unwrap();
        assert_eq!((catcher.knocks_first, catcher.knocks_second, catcher.knocks_third), (2, 1, 0));
        let shooter = stats.get(SHOOTER).cloned().unwrap();
        assert_eq!((shooter.points_for, shooter.shots_taken, shooter.shots_first), (1, 0, 0));
    }

    #[test]
    fn test_knock_record_metadata() {
        let (mut game, mut stats) = staffed_game();
        let mut engine = GameEngine::new(&mut game, &mut stats);

        engine.record_knock(KnockCounts::new(0, 0, 1)).unwrap();

        let record = &engine.records()[0];
        assert_eq!(record.kind, EventKind::Knock);
        assert_eq!(record.outcome, "update");
        assert_eq!(record.offense, Some(SHOOTER));
        assert_eq!(record.defense, Some(CATCHER));
        assert_eq!(record.metadata, Some(serde_json::json!({"first": 0, "second": 0, "third": 1})));
    }

    #[test]
    fn test_same_player_on_both_sides_shares_row() {
        let (mut game, mut stats) = staffed_game();
        let mut engine = GameEngine::new(&mut game, &mut stats);

        engine.record_shot(ShotOutcome::Strike, Some(SHOOTER), Some(SHOOTER)).unwrap();
        drop(engine);

        let row = stats.get(SHOOTER).cloned().unwrap();
        assert_eq!((row.shots_strike, row.catches_missed), (1, 1));
        assert_eq!(stats.touched_count(), 1);
    }
}

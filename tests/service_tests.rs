//! Service integration tests.
//!
//! Every scenario runs against both the in-memory and the SQLite store so
//! the two backends stay interchangeable.

use beer_baseball::core::{AppConfig, GameStatus, HalfInning, NewGame, NewPlayer, PlayerId, Role};
use beer_baseball::service::export_file_name;
use beer_baseball::store::{GameStore, MemoryStore, SqliteStore};
use beer_baseball::{
    Error, EventKind, GameId, GameService, KnockCounts, RoleAssignment, RulesError, MAX_KNOCK_UNITS,
};

struct Lineup {
    game: GameId,
    ann: PlayerId,
    bob: PlayerId,
    cat: PlayerId,
    dan: PlayerId,
}

fn lineup<S: GameStore>(service: &mut GameService<S>) -> Lineup {
    let ann = service.create_player(NewPlayer::new("Ann", "A")).unwrap().id;
    let bob = service.create_player(NewPlayer::new("Bob", "B").with_nickname("Bomber")).unwrap().id;
    let cat = service.create_player(NewPlayer::new("Cat", "C")).unwrap().id;
    let dan = service.create_player(NewPlayer::new("Dan", "D")).unwrap().id;
    let game = service
        .create_game(
            NewGame::new("Hops", "Barley")
                .with_role(Role::OffensiveShooter, ann)
                .with_role(Role::OffensiveDrinker, bob)
                .with_role(Role::DefensiveCatcher, cat)
                .with_role(Role::DefensiveDrinker, dan),
        )
        .unwrap()
        .id;
    Lineup { game, ann, bob, cat, dan }
}

// =============================================================================
// Scenarios (generic over the store)
// =============================================================================

fn scenario_scoring<S: GameStore>(mut service: GameService<S>) {
    let l = lineup(&mut service);

    service.record_shot(l.game, "first", None, None).unwrap();
    service.record_shot(l.game, "second", None, None).unwrap();
    let snap = service.record_shot(l.game, "home", None, None).unwrap();

    assert_eq!(snap.away_score, 3);
    assert!(snap.bases.is_empty());

    let game = service.game(l.game).unwrap();
    assert_eq!(game.away_score, 3);
    assert_eq!(game.status, GameStatus::InProgress);

    let stats = service.game_stats(l.game).unwrap();
    assert_eq!(stats[0].player_id, l.ann);
    assert_eq!(stats[0].points_for, 3);
    assert_eq!(stats[0].shots_taken, 3);
    assert_eq!(stats.len(), 1);
}

fn scenario_rotation<S: GameStore>(mut service: GameService<S>) {
    let l = lineup(&mut service);

    service.record_shot(l.game, "out", None, None).unwrap();
    let game = service.game(l.game).unwrap();
    assert_eq!(game.outs, 1);
    assert_eq!(game.roles.offensive_shooter, Some(l.bob));
    assert_eq!(game.roles.offensive_drinker, Some(l.ann));

    service.record_shot(l.game, "strike", None, None).unwrap();
    service.record_shot(l.game, "strike", None, None).unwrap();
    let snap = service.record_shot(l.game, "strike", None, None).unwrap();

    assert_eq!(snap.half, HalfInning::Bottom);
    assert_eq!((snap.outs, snap.strikes), (0, 0));
    assert_eq!(snap.roles.offensive_shooter, Some(l.cat));
    assert_eq!(snap.roles.defensive_catcher, Some(l.bob));
    assert_eq!(snap.roles.offensive_drinker, Some(l.dan));
    assert_eq!(snap.roles.defensive_drinker, Some(l.ann));

    let events = service.events(l.game).unwrap();
    let rotations: Vec<_> = events
        .iter()
        .filter(|e| e.record.kind == EventKind::Rotation)
        .map(|e| e.record.outcome.as_str())
        .collect();
    assert_eq!(rotations, vec!["swap_offense", "full_rotation"]);
    assert!(events
        .iter()
        .filter(|e| e.record.kind == EventKind::Rotation)
        .all(|e| e.record.offense.is_none()));

    let bob = service.store().stats(l.game, l.bob).unwrap().unwrap();
    assert_eq!(bob.shots_strike, 3);
}

fn scenario_rejections<S: GameStore>(mut service: GameService<S>) {
    let l = lineup(&mut service);

    let err = service.record_shot(l.game, "dunk", None, None).unwrap_err();
    assert!(matches!(err, Error::Rules(RulesError::UnknownOutcome { .. })));
    assert_eq!(err.status_code(), 400);

    let err = service.record_shot(GameId::new(404), "home", None, None).unwrap_err();
    assert_eq!(err.status_code(), 404);

    let err = service.record_steal(l.game, "success", None, Some(PlayerId::new(404))).unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "player", .. }));

    let oversized = KnockCounts::new(0, MAX_KNOCK_UNITS + 1, 0);
    let err = service.record_knock(l.game, oversized).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    service
        .assign_roles(l.game, RoleAssignment::new().clear(Role::OffensiveShooter))
        .unwrap();
    let err = service.record_knock(l.game, KnockCounts::new(1, 0, 0)).unwrap_err();
    assert!(matches!(
        err,
        Error::Rules(RulesError::MissingParticipant { role: Role::OffensiveShooter })
    ));

    // None of the rejected events left a trace.
    let game = service.game(l.game).unwrap();
    assert_eq!(game.status, GameStatus::Scheduled);
    assert!(game.bases.is_empty());
    assert!(service.events(l.game).unwrap().is_empty());
    assert!(service.game_stats(l.game).unwrap().is_empty());
}

fn scenario_overrides<S: GameStore>(mut service: GameService<S>) {
    let l = lineup(&mut service);
    let sub = service.create_player(NewPlayer::new("Eve", "E")).unwrap().id;

    service.record_shot(l.game, "home", Some(sub), None).unwrap();

    assert_eq!(service.store().stats(l.game, sub).unwrap().map(|r| r.points_for), Some(1));
    assert!(service.store().stats(l.game, l.ann).unwrap().is_none());
    let events = service.events(l.game).unwrap();
    assert_eq!(events[0].record.offense, Some(sub));
    assert_eq!(events[0].record.defense, Some(l.cat));
}

fn scenario_export<S: GameStore>(mut service: GameService<S>) {
    let l = lineup(&mut service);
    service.record_steal(l.game, "fail", None, None).unwrap();
    service.record_knock(l.game, KnockCounts::new(0, 1, 0)).unwrap();

    let csv = service.export_events_csv(l.game).unwrap();
    let lines: Vec<_> = csv.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "timestamp,event_type,outcome,offense,defense,metadata");
    assert!(lines[1].contains(",rotation,swap_offense,,,{}"));
    assert!(lines[2].contains(",steal,fail,Bob B. (Bomber),Dan D.,{}"));
    // The first out swapped Bob into the shooter slot.
    let knock = r#",knock,update,Bob B. (Bomber),Cat C.,"{""first"":0,""second"":1,""third"":0}""#;
    assert!(lines[3].contains(knock));

    assert_eq!(export_file_name(l.game), format!("game_{}_events.csv", l.game.raw()));
}

fn scenario_totals<S: GameStore>(mut service: GameService<S>) {
    let l = lineup(&mut service);
    let second = service
        .create_game(
            NewGame::new("Lager", "Stout")
                .with_role(Role::OffensiveShooter, l.ann)
                .with_role(Role::OffensiveDrinker, l.bob)
                .with_role(Role::DefensiveCatcher, l.cat)
                .with_role(Role::DefensiveDrinker, l.dan),
        )
        .unwrap()
        .id;

    service.record_shot(l.game, "home", None, None).unwrap();
    service.record_shot(second, "grandslam", None, None).unwrap();
    service.record_steal(second, "success", None, None).unwrap();

    let totals = service.player_totals().unwrap();

    assert_eq!(totals[0].player_id, l.ann);
    assert_eq!(totals[0].name, "Ann A.");
    assert_eq!(totals[0].points_for, 5);
    assert_eq!(totals[0].shots_taken, 2);
    assert_eq!(totals[0].shots_home, 1);
    let bob = totals.iter().find(|t| t.player_id == l.bob).unwrap();
    assert_eq!(bob.steals_success, 1);
    assert_eq!(bob.name, "Bob B.");
}

fn scenario_games_and_status<S: GameStore>(mut service: GameService<S>) {
    let first = service.create_game(NewGame::new("Hops", "Barley")).unwrap();
    let second = service.create_game(NewGame::new("Lager", "Stout")).unwrap();

    let ids: Vec<_> = service.games().unwrap().into_iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(service.next_game_id().unwrap(), second.id.next());

    service.set_status(first.id, GameStatus::Final).unwrap();
    let err = service.set_status(first.id, GameStatus::Scheduled).unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(service.game(first.id).unwrap().status, GameStatus::Final);

    let names: Vec<_> = {
        service.create_player(NewPlayer::new("Zoe", "Z")).unwrap();
        service.create_player(NewPlayer::new("Al", "A")).unwrap();
        service.players().unwrap().into_iter().map(|p| p.first_name).collect()
    };
    assert_eq!(names, vec!["Al", "Zoe"]);
}

fn memory() -> GameService<MemoryStore> {
    GameService::new(MemoryStore::new())
}

fn sqlite() -> GameService<SqliteStore> {
    GameService::new(SqliteStore::open_in_memory().unwrap())
}

// =============================================================================
// Memory Store
// =============================================================================

#[test]
fn test_memory_scoring() {
    scenario_scoring(memory());
}

#[test]
fn test_memory_rotation() {
    scenario_rotation(memory());
}

#[test]
fn test_memory_rejections() {
    scenario_rejections(memory());
}

#[test]
fn test_memory_overrides() {
    scenario_overrides(memory());
}

#[test]
fn test_memory_export() {
    scenario_export(memory());
}

#[test]
fn test_memory_totals() {
    scenario_totals(memory());
}

#[test]
fn test_memory_games_and_status() {
    scenario_games_and_status(memory());
}

// =============================================================================
// SQLite Store
// =============================================================================

#[test]
fn test_sqlite_scoring() {
    scenario_scoring(sqlite());
}

#[test]
fn test_sqlite_rotation() {
    scenario_rotation(sqlite());
}

#[test]
fn test_sqlite_rejections() {
    scenario_rejections(sqlite());
}

#[test]
fn test_sqlite_overrides() {
    scenario_overrides(sqlite());
}

#[test]
fn test_sqlite_export() {
    scenario_export(sqlite());
}

#[test]
fn test_sqlite_totals() {
    scenario_totals(sqlite());
}

#[test]
fn test_sqlite_games_and_status() {
    scenario_games_and_status(sqlite());
}

#[test]
fn test_sqlite_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default().with_database_path(dir.path().join("league.db"));

    let game = {
        let mut service = GameService::from_config(&config).unwrap();
        let l = lineup(&mut service);
        service.record_shot(l.game, "third", None, None).unwrap();
        l.game
    };

    let service = GameService::from_config(&config).unwrap();
    let snap = service.snapshot(game).unwrap();
    assert!(snap.bases.third);
    assert_eq!(service.events(game).unwrap().len(), 1);
}

//! Shared test fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating room and command setup across many tests.
//! It does not own production gameplay logic.

use super::*;

pub(super) fn game_from_rows(rows: &[&str]) -> Game {
    game_with_config(rows, EngineConfig::default())
}

pub(super) fn game_with_config(rows: &[&str], config: EngineConfig) -> Game {
    let snapshot = RoomSnapshot::from_rows(rows).expect("fixture room should parse");
    Game::new(&snapshot, config).expect("fixture room should load")
}

/// Same as `game_from_rows` with the player's sword turned first.
pub(super) fn game_facing(rows: &[&str], orientation: Orientation) -> Game {
    let mut snapshot = RoomSnapshot::from_rows(rows).expect("fixture room should parse");
    snapshot.player.orientation = orientation;
    Game::new(&snapshot, EngineConfig::default()).expect("fixture room should load")
}

pub(super) fn play(game: &mut Game, command: Command) -> CueEvents {
    game.apply_command(command.code()).expect("command should be accepted")
}

pub(super) fn play_all(game: &mut Game, commands: &[Command]) -> Vec<CueEvents> {
    commands.iter().map(|&command| play(game, command)).collect()
}

pub(super) fn wait_turns(game: &mut Game, turns: usize) -> Vec<CueEvents> {
    (0..turns).map(|_| play(game, Command::Wait)).collect()
}

pub(super) fn positions_of(game: &Game, kind: ActorKind) -> Vec<Pos> {
    game.actors.iter().filter(|actor| actor.kind == kind).map(|actor| actor.pos).collect()
}

pub(super) fn only_actor(game: &Game) -> Actor {
    let mut actors = game.actors.iter();
    let actor = actors.next().expect("room should hold an actor").clone();
    assert!(actors.next().is_none(), "room should hold exactly one actor");
    actor
}

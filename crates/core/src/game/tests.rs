//! Regression test module wiring for turn-engine behaviours.

mod summary_state;

/// Shared imports for turn-engine regression tests.
mod support {
    pub(super) use super::super::*;
    pub(super) use crate::command_log::CommandRecord;
    pub(super) use crate::game::test_support::*;
    pub(super) use crate::snapshot::{DoorAction, OrbAgent};
}

use support::*;

#[test]
fn unknown_command_is_rejected_before_any_mutation() {
    let mut game = game_from_rows(&["@..r"]);
    let before = game.checksum();

    assert_eq!(game.apply_command(11), Err(GameError::UnknownCommand(11)));
    assert_eq!(game.apply_command(u8::MAX), Err(GameError::UnknownCommand(u8::MAX)));
    assert_eq!(game.checksum(), before);
    assert_eq!(game.turn(), 0);
    assert!(game.commands().is_empty());
}

#[test]
fn accepted_commands_are_recorded_with_pacing() {
    let mut game = game_from_rows(&["@....", "....."]);
    game.apply_timed(Command::Wait.code(), 120).expect("wait");
    game.apply_timed(Command::RotateClockwise.code(), 5).expect("rotate");

    assert_eq!(game.turn(), 2);
    assert_eq!(game.commands().get(0), Some(CommandRecord { command: Command::Wait, elapsed: 12 }));
    assert_eq!(
        game.commands().get(1),
        Some(CommandRecord { command: Command::RotateClockwise, elapsed: 0 })
    );
}

#[test]
fn frozen_session_advances_without_recording() {
    let mut game = game_from_rows(&["@...."]);
    game.freeze_commands();
    wait_turns(&mut game, 2);
    assert!(game.apply_timed(Command::MoveE.code(), 40).is_ok());
    assert_eq!(game.turn(), 3);
    assert_eq!(game.player().pos, Pos::new(1, 0));
    assert!(game.commands().is_empty());

    game.unfreeze_commands();
    play(&mut game, Command::Wait);
    assert_eq!(game.commands().len(), 1);
}

#[test]
fn leaving_the_room_ends_the_visit() {
    let mut game = game_from_rows(&["@..", "..."]);
    let cues = play(&mut game, Command::MoveW);

    assert!(cues.has_with(CueKind::ExitRoom, &CuePayload::PosDir(Pos::new(0, 0), Orientation::W)));
    assert_eq!(game.visit(), Visit::LeftRoom);
    assert!(game.visit().exited());
    assert_eq!(game.turn(), 1);
    assert_eq!(game.commands().len(), 1);
    assert_eq!(game.apply_command(Command::Wait.code()), Err(GameError::VisitOver));
    assert_eq!(game.turn(), 1);
}

#[test]
fn checksum_tracks_turn_and_board() {
    let mut a = game_from_rows(&["@...", "...."]);
    let b = game_from_rows(&["@...", "...."]);
    assert_eq!(a.checksum(), b.checksum());

    play(&mut a, Command::Wait);
    assert_ne!(a.checksum(), b.checksum());

    let mut c = game_from_rows(&["@...", "...."]);
    let mut d = game_from_rows(&["@...", "...."]);
    play(&mut c, Command::MoveE);
    play(&mut d, Command::MoveS);
    assert_ne!(c.checksum(), d.checksum());
}

#[test]
fn empty_room_starts_cleared_without_a_cue() {
    let mut game = game_from_rows(&["@...", "...."]);
    assert!(game.is_room_cleared());
    let cues = play(&mut game, Command::Wait);
    assert!(!cues.has(CueKind::RoomCleared));
}

#[test]
fn empty_room_loads_with_green_doors_open() {
    let mut game = game_from_rows(&["@.G.", "...G"]);
    assert_eq!(game.room().opaque(Pos::new(2, 0)), OpaqueTile::GreenDoorOpen);
    assert_eq!(game.room().opaque(Pos::new(3, 1)), OpaqueTile::GreenDoorOpen);

    let cues = play(&mut game, Command::MoveE);
    assert!(!cues.has(CueKind::GreenDoorsOpened));
    play(&mut game, Command::MoveE);
    assert_eq!(game.player().pos, Pos::new(2, 0));
}

#[test]
fn guarded_room_loads_with_green_doors_shut() {
    let game = game_from_rows(&["@.G.", "...r"]);
    assert!(!game.is_room_cleared());
    assert_eq!(game.room().opaque(Pos::new(2, 0)), OpaqueTile::GreenDoor);
}

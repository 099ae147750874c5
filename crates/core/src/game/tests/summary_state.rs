//! Tests for end-of-turn summary cues.

use super::support::*;

#[test]
fn clearing_the_room_opens_green_doors_once() {
    let mut game = game_facing(
        &[
            "..r.", //
            ".@..",
            "...G",
        ],
        Orientation::N,
    );
    assert!(!game.is_room_cleared());

    let cues = play(&mut game, Command::RotateClockwise);
    assert!(cues.has(CueKind::RoomCleared));
    assert!(cues.has(CueKind::GreenDoorsOpened));
    assert!(game.is_room_cleared());
    assert_eq!(game.room().opaque(Pos::new(3, 2)), OpaqueTile::GreenDoorOpen);

    let cues = play(&mut game, Command::Wait);
    assert!(!cues.has(CueKind::RoomCleared));
    assert!(!cues.has(CueKind::GreenDoorsOpened));
}

#[test]
fn green_doors_block_until_the_room_is_clear() {
    let mut game = game_from_rows(&["@G.", "..#", "#.e"]);
    let cues = play(&mut game, Command::MoveE);
    assert!(cues.has_with(CueKind::HitObstacle, &CuePayload::Pos(Pos::new(1, 0))));
    assert!(!game.is_room_cleared());
}

#[test]
fn edge_notice_carries_the_player_square() {
    let mut game = game_from_rows(&[
        "...", //
        ".@.",
        "...",
    ]);
    let cues = play(&mut game, Command::Wait);
    assert!(!cues.has(CueKind::PlayerOnEdge));

    let cues = play(&mut game, Command::MoveN);
    assert!(cues.has_with(CueKind::PlayerOnEdge, &CuePayload::Pos(Pos::new(1, 0))));
}

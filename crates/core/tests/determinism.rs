use std::collections::HashSet;

use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use sword_core::{
    ActorKind, Command, EngineConfig, Game, MovementClass, Orientation, Pos, RoomSnapshot, replay,
};

/// A tracker must walk the long way round the inner wall to reach the player.
const TRACKER_DETOUR: [&str; 5] = [
    "##########",
    "#t.......#",
    "########.#",
    "#@.......#",
    "##########",
];

const CROWDED: [&str; 8] = [
    "############",
    "#....r....Q#",
    "#.##.....~~#",
    "#.#..t...~~#",
    "#...@...%..#",
    "#.Sss..w...#",
    "#....e..r._#",
    "############",
];

fn tracker_game() -> Game {
    let mut snapshot = RoomSnapshot::from_rows(&TRACKER_DETOUR).expect("room");
    snapshot.player.orientation = Orientation::E;
    Game::new(&snapshot, EngineConfig::default()).expect("game")
}

fn tracker_pos(game: &Game) -> Pos {
    game.actors()
        .iter()
        .find(|actor| actor.kind == ActorKind::Tracker)
        .map(|actor| actor.pos)
        .expect("tracker should be alive")
}

fn random_session(seed: u64, turns: usize) -> Game {
    let snapshot = RoomSnapshot::from_rows(&CROWDED).expect("room");
    let config = EngineConfig {
        queen_spawn_interval: 5,
        tar_growth_interval: 7,
        ..EngineConfig::default()
    };
    let mut game = Game::new(&snapshot, config).expect("game");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..turns {
        if game.visit().is_over() {
            break;
        }
        let code = (rng.next_u32() % Command::ALL.len() as u32) as u8;
        let elapsed = rng.next_u32() % 2_000;
        game.apply_timed(code, elapsed).expect("live session accepts known commands");
    }
    game
}

fn check_invariants(game: &Game) -> Result<(), String> {
    let mut squares = HashSet::new();
    for actor in game.actors().iter() {
        if !game.room().in_bounds(actor.pos) {
            return Err(format!("{:?} left the room at {:?}", actor.kind, actor.pos));
        }
        if !squares.insert(actor.pos) {
            return Err(format!("two actors share {:?}", actor.pos));
        }
        if game.room().occupant(actor.pos) != Some(actor.id) {
            return Err(format!("occupant grid lost {:?} at {:?}", actor.kind, actor.pos));
        }
    }
    let player = game.player();
    if player.alive && squares.contains(&player.pos) {
        return Err(format!("living player shares {:?} with an actor", player.pos));
    }
    Ok(())
}

#[test]
fn tracker_converges_on_the_same_square_every_run() {
    let mut first = tracker_game();
    let mut second = tracker_game();
    for turn in 0..20 {
        first.apply_command(Command::Wait.code()).expect("wait");
        second.apply_command(Command::Wait.code()).expect("wait");
        assert_eq!(first.checksum(), second.checksum(), "runs diverged at turn {turn}");
        if turn == 11 {
            assert_eq!(tracker_pos(&first), Pos::new(3, 3));
        }
    }

    // The sword guards the only square next to the player along the corridor.
    assert_eq!(tracker_pos(&first), Pos::new(3, 3));
    assert!(first.player().alive);
    let map = first.room().path_map(MovementClass::Ground).expect("tracker uses the ground map");
    assert!(map.is_complete());
    assert_eq!(map.target(), Pos::new(1, 3));
}

#[test]
fn identical_command_streams_produce_identical_checksums() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    runner
        .run(&any::<u64>(), |seed| {
            let left = random_session(seed, 120);
            let right = random_session(seed, 120);
            if left.checksum() != right.checksum() || left.turn() != right.turn() {
                return Err(TestCaseError::fail(format!("seed {seed} diverged")));
            }
            Ok(())
        })
        .expect("engine should be deterministic");
}

#[test]
fn replaying_a_random_session_reproduces_it() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    runner
        .run(&any::<u64>(), |seed| {
            let live = random_session(seed, 120);
            let replayed = replay(live.snapshot(), live.config().clone(), live.commands(), None)
                .map_err(|err| TestCaseError::fail(format!("seed {seed}: {err}")))?;
            if replayed.checksum != live.checksum() || replayed.turn != live.turn() {
                return Err(TestCaseError::fail(format!("seed {seed} replayed differently")));
            }
            if replayed.game.visit() != live.visit() {
                return Err(TestCaseError::fail(format!("seed {seed} ended differently")));
            }
            Ok(())
        })
        .expect("replay should match the live session");
}

#[test]
fn random_sessions_keep_the_room_consistent() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    runner
        .run(&any::<u64>(), |seed| {
            let snapshot = RoomSnapshot::from_rows(&CROWDED).expect("room");
            let mut game = Game::new(&snapshot, EngineConfig::default()).expect("game");
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..200 {
                if game.visit().is_over() {
                    break;
                }
                let code = (rng.next_u32() % Command::ALL.len() as u32) as u8;
                game.apply_command(code).map_err(|err| TestCaseError::fail(err.to_string()))?;
                check_invariants(&game)
                    .map_err(|msg| TestCaseError::fail(format!("seed {seed}: {msg}")))?;
            }
            Ok(())
        })
        .expect("random sessions should preserve room invariants");
}

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use sword_core::{Command, Game, RoomSnapshot, replay};
use sword_tools::{load_config, load_room};
use tracing_subscriber::EnvFilter;

/// Used when no room file is given.
const ARENA: [&str; 9] = [
    "##############",
    "#....r.....Q.#",
    "#.##......~~.#",
    "#.#..t....~~M#",
    "#....@..%....#",
    "#.Sss...w..O.#",
    "#.....e..r.._#",
    "#..^....B....#",
    "##############",
];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    turns: u32,
    /// Sessions to play; they draw from one command stream
    #[arg(long, default_value_t = 16)]
    sessions: u32,
    #[arg(short, long)]
    room: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn check_invariants(game: &Game) -> Result<()> {
    let mut squares = HashSet::new();
    for actor in game.actors().iter() {
        ensure!(game.room().in_bounds(actor.pos), "{:?} outside the room", actor.kind);
        ensure!(squares.insert(actor.pos), "two actors share {:?}", actor.pos);
        ensure!(
            game.room().occupant(actor.pos) == Some(actor.id),
            "occupant grid lost {:?} at {:?}",
            actor.kind,
            actor.pos
        );
    }
    let player = game.player();
    ensure!(
        !player.alive || !squares.contains(&player.pos),
        "living player shares {:?} with an actor",
        player.pos
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let snapshot = match &args.room {
        Some(path) => load_room(path)?,
        None => RoomSnapshot::from_rows(&ARENA).context("Built-in arena failed to parse")?,
    };
    let config = load_config(args.config.as_deref())?;

    println!(
        "Starting fuzz harness on seed {} for {} sessions of up to {} turns...",
        args.seed, args.sessions, args.turns
    );
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for session in 0..args.sessions {
        let mut game = Game::new(&snapshot, config.clone())?;
        while game.turn() < args.turns && !game.visit().is_over() {
            let code = (rng.next_u32() % Command::ALL.len() as u32) as u8;
            game.apply_timed(code, rng.next_u32() % 1_000)?;
            check_invariants(&game)
                .with_context(|| format!("Invariant failed in session {session}"))?;
        }

        let replayed = replay(&snapshot, config.clone(), game.commands(), None)
            .with_context(|| format!("Replay failed in session {session}"))?;
        ensure!(
            replayed.checksum == game.checksum(),
            "Replay diverged in session {session}: {:016x} vs {:016x}",
            replayed.checksum,
            game.checksum()
        );
        println!(
            "Session {session}: {:?} after {} turns, checksum {:016x}",
            game.visit(),
            game.turn(),
            game.checksum()
        );
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}

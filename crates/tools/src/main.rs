use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sword_core::{CommandLog, CueKind, Demo, Game, ReplayResult, replay, verify_demo};
use sword_tools::{
    load_commands, load_config, load_demo, load_room, parse_command_keys, save_demo,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Room to play: a JSON snapshot or a text file of ASCII rows
    #[arg(short, long)]
    room: PathBuf,
    /// Packed command buffer, or a `.keys`/`.txt` keypad string
    #[arg(short, long, conflicts_with_all = ["demo", "keys"])]
    commands: Option<PathBuf>,
    /// Keypad string given inline, e.g. `6658w`
    #[arg(short, long, conflicts_with = "demo")]
    keys: Option<String>,
    /// Recorded demo JSON to verify against the room
    #[arg(short, long)]
    demo: Option<PathBuf>,
    /// Engine tunables as TOML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Replay only this many leading commands
    #[arg(short = 'n', long)]
    count: Option<usize>,
    /// Write the replayed session out as a demo
    #[arg(long)]
    record: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let snapshot = load_room(&args.room)?;
    let config = load_config(args.config.as_deref())?;

    if let Some(path) = &args.demo {
        let demo = load_demo(path)?;
        verify_demo(&demo, &snapshot, config)
            .with_context(|| format!("Demo does not reproduce: {}", path.display()))?;
        println!("Demo verified.");
        println!("Turns: {}..{}", demo.begin_turn, demo.end_turn);
        println!("Checksum: {:016x}", demo.checksum);
        return Ok(());
    }

    let commands = match (&args.commands, &args.keys) {
        (Some(path), _) => load_commands(path)?,
        (None, Some(keys)) => parse_command_keys(keys)?,
        (None, None) => CommandLog::new(),
    };
    let result: ReplayResult = replay(&snapshot, config, &commands, args.count)
        .with_context(|| "Replay failed during execution")?;

    report(&result);
    if let Some(path) = &args.record {
        save_demo(path, &Demo::record(&result.game, 0))?;
        println!("Demo written to {}", path.display());
    }
    Ok(())
}

fn report(result: &ReplayResult) {
    let game: &Game = &result.game;
    println!("Replay complete.");
    println!("Turn: {}", result.turn);
    println!("Visit: {:?}", game.visit());
    println!("Player: {:?} facing {:?}", game.player().pos, game.player().orientation);
    println!("Actors left: {}", game.actors().len());
    println!("Checksum: {:016x}", result.checksum);
    for kind in [CueKind::MonsterDiedFromStab, CueKind::MonsterKilledPlayer, CueKind::RoomCleared] {
        let count: usize = result.cues.iter().map(|cues| cues.count(kind)).sum();
        if count > 0 {
            println!("{kind:?}: {count}");
        }
    }
}

//! File loaders shared by the replay and fuzz binaries.
//!
//! Rooms load from JSON snapshots or ASCII rows, command logs from packed
//! buffers or keypad strings, and tunables from TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use sword_core::{Command, CommandLog, Demo, EngineConfig, RoomSnapshot};

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// `.json` files hold a serialized snapshot; anything else is ASCII rows.
pub fn load_room(path: &Path) -> Result<RoomSnapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read room file: {}", path.display()))?;
    if has_extension(path, "json") {
        let snapshot: RoomSnapshot = serde_json::from_str(&text)
            .with_context(|| format!("Failed to deserialize room JSON: {}", path.display()))?;
        snapshot
            .validate()
            .with_context(|| format!("Inconsistent room JSON: {}", path.display()))?;
        return Ok(snapshot);
    }
    let rows: Vec<&str> =
        text.lines().map(str::trim_end).filter(|line| !line.is_empty()).collect();
    RoomSnapshot::from_rows(&rows)
        .with_context(|| format!("Failed to parse room rows: {}", path.display()))
}

/// Missing path means default tunables.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
}

/// Keypad string such as `"6658w"`; whitespace is ignored.
pub fn parse_command_keys(keys: &str) -> Result<CommandLog> {
    let mut commands = Vec::with_capacity(keys.len());
    for (offset, key) in keys.chars().enumerate() {
        if key.is_whitespace() {
            continue;
        }
        let Some(command) = Command::from_key(key) else {
            bail!("unknown command key {key:?} at offset {offset}");
        };
        commands.push(command);
    }
    Ok(CommandLog::from_commands(commands))
}

/// `.keys`/`.txt` files hold keypad strings; anything else is a packed buffer.
pub fn load_commands(path: &Path) -> Result<CommandLog> {
    if has_extension(path, "keys") || has_extension(path, "txt") {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read command keys: {}", path.display()))?;
        return parse_command_keys(&text)
            .with_context(|| format!("Failed to parse command keys: {}", path.display()));
    }
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read packed commands: {}", path.display()))?;
    CommandLog::from_packed(&bytes)
        .with_context(|| format!("Failed to unpack commands: {}", path.display()))
}

pub fn load_demo(path: &Path) -> Result<Demo> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read demo file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to deserialize demo JSON: {}", path.display()))
}

pub fn save_demo(path: &Path, demo: &Demo) -> Result<()> {
    let json = serde_json::to_string_pretty(demo).context("Failed to serialize demo")?;
    fs::write(path, json).with_context(|| format!("Failed to write demo file: {}", path.display()))
}

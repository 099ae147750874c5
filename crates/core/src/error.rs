use thiserror::Error;

use crate::types::Pos;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unknown command code {0}")]
    UnknownCommand(u8),
    #[error("the room visit is over; no further commands are accepted")]
    VisitOver,
    #[error(transparent)]
    CommandLog(#[from] CommandLogError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandLogError {
    #[error("command log is frozen")]
    Frozen,
    #[error("cannot keep {keep} commands from a log of {len}")]
    TruncateBeyondEnd { keep: usize, len: usize },
    #[error("packed buffer holds unknown action byte {byte} at offset {offset}")]
    UnknownAction { offset: usize, byte: u8 },
    #[error("packed buffer ends inside a record at offset {offset}")]
    Truncated { offset: usize },
    #[error("packed buffer has no terminating zero action")]
    MissingTerminator,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("room must have at least one column and one row, got {cols}x{rows}")]
    EmptyRoom { cols: usize, rows: usize },
    #[error("layer {layer} holds {found} tiles, expected {expected}")]
    LayerSize { layer: &'static str, found: usize, expected: usize },
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, found: usize, expected: usize },
    #[error("unknown glyph {glyph:?} at {pos:?}")]
    UnknownGlyph { glyph: char, pos: Pos },
    #[error("room has no player start")]
    MissingPlayer,
    #[error("room has more than one player start")]
    DuplicatePlayer,
    #[error("{what} at {pos:?} lies outside the room")]
    OutOfRange { what: &'static str, pos: Pos },
    #[error("{what} at {pos:?} stands on a blocked square")]
    Blocked { what: &'static str, pos: Pos },
    #[error("two occupants share {pos:?}")]
    Overlap { pos: Pos },
    #[error("orb agent at {pos:?} does not point at a yellow door")]
    NotADoor { pos: Pos },
    #[error("serpent body at {pos:?} is not attached to a head")]
    DetachedSerpentBody { pos: Pos },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("command log holds {available} commands, {requested} requested")]
    CommandLogTooShort { requested: usize, available: usize },
    #[error("command {index} was rejected: {source}")]
    Rejected { index: usize, source: GameError },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    CommandLog(#[from] CommandLogError),
}

/// Why a recorded sequence no longer reproduces its recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayMismatch {
    #[error("room digest {actual} differs from recorded {expected}")]
    RoomChanged { expected: String, actual: String },
    #[error("recording covers turns up to {end_turn} but holds only {available} commands")]
    TooFewCommands { end_turn: u32, available: usize },
    #[error("player died at turn {turn}, before the recorded end")]
    PlayerDiedEarly { turn: u32 },
    #[error("player left the room at turn {turn}, before the recorded end")]
    PlayerLeftEarly { turn: u32 },
    #[error("player survived although the recording ends in death")]
    PlayerSurvived,
    #[error("player stayed in the room although the recording ends with an exit")]
    PlayerStayed,
    #[error("checksum {actual:#018x} differs from recorded {expected:#018x}")]
    ChecksumDiffers { expected: u64, actual: u64 },
    #[error("recording could not be replayed: {0}")]
    Unplayable(#[from] ReplayError),
}

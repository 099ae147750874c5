use serde::{Deserialize, Serialize};

use crate::command_log::CommandLog;
use crate::config::EngineConfig;
use crate::cues::CueEvents;
use crate::error::{CommandLogError, ReplayError, ReplayMismatch};
use crate::game::{Game, Visit};
use crate::snapshot::RoomSnapshot;

#[derive(Debug)]
pub struct ReplayResult {
    pub turn: u32,
    pub checksum: u64,
    /// Cue events of each replayed turn, in order.
    pub cues: Vec<CueEvents>,
    /// Final session; its command log holds the replayed prefix and is frozen.
    pub game: Game,
}

/// Replays the first `count` recorded commands (all when `None`) on a fresh
/// session built from `snapshot`.
pub fn replay(
    snapshot: &RoomSnapshot,
    config: EngineConfig,
    log: &CommandLog,
    count: Option<usize>,
) -> Result<ReplayResult, ReplayError> {
    let count = count.unwrap_or(log.len());
    if count > log.len() {
        return Err(ReplayError::CommandLogTooShort { requested: count, available: log.len() });
    }

    let mut game = Game::new(snapshot, config)?;
    game.freeze_commands();
    let mut cues = Vec::with_capacity(count);
    for (index, record) in log.iter().take(count).enumerate() {
        let turn_cues = game
            .apply_command(record.command.code())
            .map_err(|source| ReplayError::Rejected { index, source })?;
        cues.push(turn_cues);
    }

    let mut prefix = log.clone();
    prefix.unfreeze();
    prefix.truncate(count)?;
    prefix.freeze();
    game.replace_commands(prefix);

    Ok(ReplayResult { turn: game.turn(), checksum: game.checksum(), cues, game })
}

impl Game {
    /// Undo: rebuilds the session from its snapshot and keeps the first
    /// `keep` recorded commands. Recording stays enabled afterwards.
    pub fn truncate_to(&mut self, keep: usize) -> Result<(), ReplayError> {
        let log = self.commands().clone();
        let result = replay(self.snapshot(), self.config().clone(), &log, Some(keep))?;
        *self = result.game;
        self.unfreeze_commands();
        Ok(())
    }
}

/// A recorded visit plus the outcome it is expected to reproduce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demo {
    pub room_digest: String,
    /// Packed command buffer as produced by `CommandLog::to_packed`.
    pub commands: Vec<u8>,
    pub begin_turn: u32,
    pub end_turn: u32,
    pub checksum: u64,
    pub died: bool,
    pub exited: bool,
}

impl Demo {
    /// Captures a session's recording and its current outcome.
    pub fn record(game: &Game, begin_turn: u32) -> Self {
        Self {
            room_digest: game.snapshot().digest(),
            commands: game.commands().to_packed(),
            begin_turn,
            end_turn: game.turn(),
            checksum: game.checksum(),
            died: game.visit() == Visit::PlayerDied,
            exited: game.visit().exited(),
        }
    }

    pub fn commands(&self) -> Result<CommandLog, CommandLogError> {
        CommandLog::from_packed(&self.commands)
    }
}

/// Checks that `demo` still reproduces its recorded outcome in `snapshot`.
pub fn verify_demo(
    demo: &Demo,
    snapshot: &RoomSnapshot,
    config: EngineConfig,
) -> Result<(), ReplayMismatch> {
    let outcome = check_demo(demo, snapshot, config);
    if let Err(mismatch) = &outcome {
        tracing::warn!(
            target: "sword_core::replay",
            begin_turn = demo.begin_turn,
            end_turn = demo.end_turn,
            %mismatch,
            "replay.mismatch"
        );
    }
    outcome
}

fn check_demo(
    demo: &Demo,
    snapshot: &RoomSnapshot,
    config: EngineConfig,
) -> Result<(), ReplayMismatch> {
    let digest = snapshot.digest();
    if digest != demo.room_digest {
        return Err(ReplayMismatch::RoomChanged {
            expected: demo.room_digest.clone(),
            actual: digest,
        });
    }
    let log = demo.commands().map_err(ReplayError::from)?;
    if log.len() < demo.end_turn as usize {
        return Err(ReplayMismatch::TooFewCommands {
            end_turn: demo.end_turn,
            available: log.len(),
        });
    }

    let mut game = Game::new(snapshot, config).map_err(ReplayError::from)?;
    game.freeze_commands();
    for (index, record) in log.iter().take(demo.end_turn as usize).enumerate() {
        game.apply_command(record.command.code())
            .map_err(|source| ReplayError::Rejected { index, source })?;
        let turn = game.turn();
        if turn < demo.end_turn {
            match game.visit() {
                Visit::PlayerDied => return Err(ReplayMismatch::PlayerDiedEarly { turn }),
                Visit::LeftRoom | Visit::LeftLevel => {
                    return Err(ReplayMismatch::PlayerLeftEarly { turn });
                }
                Visit::Ongoing => {}
            }
        }
    }

    if demo.died && game.visit() != Visit::PlayerDied {
        return Err(ReplayMismatch::PlayerSurvived);
    }
    if demo.exited && !game.visit().exited() {
        return Err(ReplayMismatch::PlayerStayed);
    }
    let checksum = game.checksum();
    if checksum != demo.checksum {
        return Err(ReplayMismatch::ChecksumDiffers { expected: demo.checksum, actual: checksum });
    }
    Ok(())
}

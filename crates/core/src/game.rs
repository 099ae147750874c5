//! One room visit: grid, creatures, player and the turn pipeline that advances them.
//! This module exists to own the only mutable simulation state and to apply commands atomically.
//! It does not own persistence; recorded commands leave through `CommandLog`.

use crate::actors::{Actor, ActorKind, ActorRegistry, ActorState};
use crate::command_log::CommandLog;
use crate::config::EngineConfig;
use crate::cues::{CueEvents, CueKind, CuePayload};
use crate::error::{GameError, SnapshotError};
use crate::room::Room;
use crate::snapshot::RoomSnapshot;
use crate::tiles::{OpaqueTile, TransparentTile};
use crate::types::*;

mod hash;
mod monsters;
mod player;
mod serpent;
mod summary;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

/// The swordsman. Held by the session rather than the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    pub orientation: Orientation,
    pub alive: bool,
}

impl Player {
    pub fn sword(&self) -> Pos {
        self.pos.step(self.orientation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    Ongoing,
    PlayerDied,
    LeftRoom,
    LeftLevel,
}

impl Visit {
    pub fn is_over(self) -> bool {
        self != Visit::Ongoing
    }

    pub fn exited(self) -> bool {
        matches!(self, Visit::LeftRoom | Visit::LeftLevel)
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    snapshot: RoomSnapshot,
    config: EngineConfig,
    room: Room,
    actors: ActorRegistry,
    player: Player,
    turn: u32,
    commands: CommandLog,
    visit: Visit,
    room_cleared: bool,
}

impl Game {
    pub fn new(snapshot: &RoomSnapshot, config: EngineConfig) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let mut room = Room::from_snapshot(snapshot);
        let mut actors = ActorRegistry::new();
        for spawn in &snapshot.actors {
            let rank = spawn.rank.unwrap_or(spawn.kind.default_rank());
            let id = actors.insert(spawn.kind, spawn.pos, spawn.orientation, rank);
            room.set_occupant(spawn.pos, Some(id));
        }
        let room_cleared = actors.is_empty();
        let mut game = Self {
            snapshot: snapshot.clone(),
            config,
            room,
            actors,
            player: Player {
                pos: snapshot.player.pos,
                orientation: snapshot.player.orientation,
                alive: true,
            },
            turn: 0,
            commands: CommandLog::new(),
            visit: Visit::Ongoing,
            room_cleared,
        };
        // Nothing to kill, so the doors never wait on a clearing turn.
        if game.room_cleared {
            game.open_green_doors();
        }
        Ok(game)
    }

    /// Applies one command code with no pacing information.
    pub fn apply_command(&mut self, code: u8) -> Result<CueEvents, GameError> {
        self.apply_timed(code, 0)
    }

    /// Runs one full turn. Rejected commands leave the session untouched.
    pub fn apply_timed(&mut self, code: u8, elapsed_ms: u32) -> Result<CueEvents, GameError> {
        let Some(command) = Command::from_code(code) else {
            tracing::debug!(
                target: "sword_core::engine",
                code,
                turn = self.turn,
                "engine.command_rejected"
            );
            return Err(GameError::UnknownCommand(code));
        };
        if self.visit.is_over() {
            tracing::debug!(
                target: "sword_core::engine",
                code,
                turn = self.turn,
                visit = ?self.visit,
                "engine.command_rejected"
            );
            return Err(GameError::VisitOver);
        }

        let mut cues = CueEvents::default();
        let spawned = self.process_player(command, &mut cues);
        if !self.visit.is_over() {
            self.process_monsters(&spawned, &mut cues);
        }
        if !self.visit.is_over() {
            self.update_summary(&mut cues);
        }
        self.actors.reap();
        self.turn += 1;

        // A frozen log means these commands are being replayed, not recorded.
        let recorded = !self.commands.is_frozen();
        if recorded {
            self.commands.append(command, elapsed_ms)?;
        }
        tracing::trace!(
            target: "sword_core::engine",
            turn = self.turn,
            command = ?command,
            cues = cues.len(),
            recorded,
            "engine.turn"
        );
        Ok(cues)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn visit(&self) -> Visit {
        self.visit
    }

    pub fn is_room_cleared(&self) -> bool {
        self.room_cleared
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    pub fn snapshot(&self) -> &RoomSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn commands(&self) -> &CommandLog {
        &self.commands
    }

    /// Stops recording, e.g. while a finished scene is inspected.
    pub fn freeze_commands(&mut self) {
        self.commands.freeze();
    }

    pub fn unfreeze_commands(&mut self) {
        self.commands.unfreeze();
    }

    pub(crate) fn replace_commands(&mut self, commands: CommandLog) {
        self.commands = commands;
    }

    /// Actor owning `pos`, either as its head square or as a serpent body piece.
    pub fn actor_at(&self, pos: Pos) -> Option<ActorId> {
        if let Some(id) = self.room.occupant(pos) {
            return Some(id);
        }
        let head = self.room.serpent_head_from_body(pos)?;
        self.room.occupant(head)
    }

    /// Square the sword currently occupies, if it is inside the room.
    pub fn sword_square(&self) -> Option<Pos> {
        if !self.player.alive || self.player.orientation == Orientation::None {
            return None;
        }
        let sword = self.player.sword();
        self.room.in_bounds(sword).then_some(sword)
    }

    /// Removes an actor from the registry and the grid, clearing serpent bodies too.
    fn kill_actor(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.get(id).cloned()?;
        if actor.kind == ActorKind::Serpent {
            for segment in self.room.serpent_body(actor.pos, actor.orientation) {
                self.room.plot_transparent(segment, TransparentTile::Empty);
            }
        }
        self.actors.kill(id);
        if self.room.occupant(actor.pos) == Some(id) {
            self.room.set_occupant(actor.pos, None);
        }
        tracing::debug!(
            target: "sword_core::engine",
            kind = ?actor.kind,
            x = actor.pos.x,
            y = actor.pos.y,
            turn = self.turn,
            "engine.actor_killed"
        );
        Some(actor)
    }

    fn kill_player(&mut self, by: ActorId, cues: &mut CueEvents) {
        self.player.alive = false;
        self.visit = Visit::PlayerDied;
        cues.add_with(CueKind::MonsterKilledPlayer, CuePayload::Actor(by));
        tracing::debug!(
            target: "sword_core::engine",
            x = self.player.pos.x,
            y = self.player.pos.y,
            turn = self.turn,
            "engine.player_died"
        );
    }
}

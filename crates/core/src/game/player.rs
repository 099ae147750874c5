//! Player command resolution: movement, sword stabs and joint tar breaking.
//! This module exists to run the first three steps of a turn before any creature acts.
//! It does not move creatures; stabbed creatures are only removed here.

use super::*;
use crate::snapshot::DoorAction;

impl Game {
    /// Returns actors spawned by the player's action; they sit out this turn.
    pub(super) fn process_player(
        &mut self,
        command: Command,
        cues: &mut CueEvents,
    ) -> Vec<ActorId> {
        let previous_sword = self.sword_square();
        match command {
            Command::RotateClockwise => {
                self.player.orientation = self.player.orientation.clockwise();
            }
            Command::RotateCounterClockwise => {
                self.player.orientation = self.player.orientation.counter_clockwise();
            }
            Command::Wait => {}
            _ => {
                if let Some(direction) = command.movement() {
                    self.move_player(direction, cues);
                }
            }
        }
        if self.visit.is_over() {
            return Vec::new();
        }

        let mut struck_tar = Vec::new();
        if let Some(sword) = self.sword_square()
            && previous_sword != Some(sword)
        {
            self.stab(sword, &mut struck_tar, cues);
        }
        self.break_tar(&struck_tar, cues)
    }

    fn move_player(&mut self, direction: Orientation, cues: &mut CueEvents) {
        let from = self.player.pos;
        let dest = from.step(direction);
        if !self.room.in_bounds(dest) {
            cues.add_with(CueKind::ExitRoom, CuePayload::PosDir(from, direction));
            self.visit = Visit::LeftRoom;
            return;
        }
        if self.player_blocked(dest) {
            cues.add_with(CueKind::HitObstacle, CuePayload::Pos(dest));
            return;
        }

        if self.room.opaque(from) == OpaqueTile::Trapdoor {
            self.room.plot_opaque(from, OpaqueTile::Pit);
            cues.add_with(CueKind::TrapdoorFell, CuePayload::Pos(from));
        }
        self.player.pos = dest;

        if self.room.transparent(dest) == TransparentTile::Scroll {
            cues.add_with(CueKind::StepOnScroll, CuePayload::Pos(dest));
        }
        match self.room.opaque(dest) {
            OpaqueTile::Checkpoint => {
                cues.add_with(CueKind::CheckpointActivated, CuePayload::Pos(dest));
            }
            OpaqueTile::Stairs => {
                cues.add_with(CueKind::ExitLevel, CuePayload::Pos(dest));
                self.visit = Visit::LeftLevel;
            }
            _ => {}
        }
    }

    fn player_blocked(&self, dest: Pos) -> bool {
        let transparent = self.room.transparent(dest);
        self.room.opaque(dest).blocks(MovementClass::Ground)
            || transparent.blocks()
            || transparent.is_serpent()
            || self.room.occupant(dest).is_some()
    }

    fn stab(&mut self, target: Pos, struck_tar: &mut Vec<Pos>, cues: &mut CueEvents) {
        if let Some(id) = self.room.occupant(target) {
            if let Some(victim) = self.kill_actor(id) {
                cues.add_with(CueKind::MonsterDiedFromStab, CuePayload::Actor(victim.id));
            }
            return;
        }
        match self.room.transparent(target) {
            TransparentTile::Orb => self.activate_orb(target, cues),
            TransparentTile::Tar => struck_tar.push(target),
            _ => {
                if self.room.opaque(target) == OpaqueTile::CrumblyWall {
                    self.room.plot_opaque(target, OpaqueTile::Floor);
                    cues.add_with(CueKind::WallDestroyed, CuePayload::Pos(target));
                }
            }
        }
    }

    fn activate_orb(&mut self, orb_pos: Pos, cues: &mut CueEvents) {
        cues.add_with(CueKind::OrbActivated, CuePayload::Pos(orb_pos));
        let Some(orb) = self.room.orb_at(orb_pos).cloned() else {
            return;
        };
        for agent in &orb.agents {
            let open = match agent.action {
                DoorAction::Open => true,
                DoorAction::Close => false,
                DoorAction::Toggle => self.room.opaque(agent.door) == OpaqueTile::YellowDoor,
            };
            let tile = if open { OpaqueTile::YellowDoorOpen } else { OpaqueTile::YellowDoor };
            let mut changed = false;
            for square in self.room.door_region(agent.door) {
                if self.room.opaque(square) == tile {
                    continue;
                }
                // Doors never close on anything standing in them.
                if !open
                    && (square == self.player.pos
                        || self.room.occupant(square).is_some()
                        || self.room.is_serpent_body(square))
                {
                    continue;
                }
                self.room.plot_opaque(square, tile);
                changed = true;
            }
            if changed {
                cues.add_with(CueKind::DoorsToggled, CuePayload::Pos(agent.door));
            }
        }
    }

    /// Breaks struck tar as one simultaneous blow. Vulnerability is judged
    /// before anything is removed; baby formation after all removals.
    pub(super) fn break_tar(&mut self, struck: &[Pos], cues: &mut CueEvents) -> Vec<ActorId> {
        let broken: Vec<Pos> = struck
            .iter()
            .copied()
            .filter(|&pos| self.room.is_tar(pos) && self.room.is_tar_vulnerable(pos))
            .collect();
        for &pos in &broken {
            self.room.plot_transparent(pos, TransparentTile::Empty);
            cues.add_with(CueKind::TarDestroyed, CuePayload::Pos(pos));
        }

        let mut loose = Vec::new();
        for &pos in &broken {
            for next in pos.neighbours() {
                if self.room.is_tar(next)
                    && !self.room.tar_in_2x2(next)
                    && self.room.occupant(next).is_none()
                    && next != self.player.pos
                    && !loose.contains(&next)
                {
                    loose.push(next);
                }
            }
        }

        let mut spawned = Vec::with_capacity(loose.len());
        for pos in loose {
            self.room.plot_transparent(pos, TransparentTile::Empty);
            let kind = ActorKind::TarBaby;
            let id = self.actors.insert(kind, pos, Orientation::None, kind.default_rank());
            self.room.set_occupant(pos, Some(id));
            cues.add_with(CueKind::TarBabyFormed, CuePayload::Pos(pos));
            spawned.push(id);
        }
        spawned
    }
}

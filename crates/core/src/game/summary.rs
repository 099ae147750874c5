//! End-of-turn summary: room clearing, edge and danger notices.

use super::*;

impl Game {
    pub(super) fn update_summary(&mut self, cues: &mut CueEvents) {
        if !self.room_cleared && self.actors.is_empty() {
            self.room_cleared = true;
            cues.add(CueKind::RoomCleared);
            let opened = self.open_green_doors();
            if opened > 0 {
                cues.add(CueKind::GreenDoorsOpened);
            }
            tracing::debug!(
                target: "sword_core::engine",
                turn = self.turn,
                green_doors = opened,
                "engine.room_cleared"
            );
        }

        let pos = self.player.pos;
        if self.room.is_edge(pos) {
            cues.add_with(CueKind::PlayerOnEdge, CuePayload::Pos(pos));
        }
        if self.actors.iter().any(|actor| actor.pos.chebyshev(pos) <= 1) {
            cues.add(CueKind::SwordsmanAfraid);
        }
    }

    pub(super) fn open_green_doors(&mut self) -> usize {
        let mut opened = 0;
        for y in 0..self.room.rows() {
            for x in 0..self.room.cols() {
                let pos = Pos::new(x as i32, y as i32);
                if self.room.opaque(pos) == OpaqueTile::GreenDoor {
                    self.room.plot_opaque(pos, OpaqueTile::GreenDoorOpen);
                    opened += 1;
                }
            }
        }
        opened
    }
}

//! Serpent movement: orthogonal chase, body retiling and shrinking when cornered.

use super::*;

impl Game {
    pub(super) fn process_serpent(&mut self, actor: &Actor, cues: &mut CueEvents) {
        let body = self.room.serpent_body(actor.pos, actor.orientation);
        match self.serpent_destination(actor) {
            Some(dest) => {
                // The old head square becomes the neck; the tail square is vacated.
                let mut moved = Vec::with_capacity(body.len());
                if let Some((&tail, rest)) = body.split_last() {
                    self.room.plot_transparent(tail, TransparentTile::Empty);
                    moved.push(actor.pos);
                    moved.extend_from_slice(rest);
                }
                self.step_actor(actor.id, dest, cues);
                self.room.lay_serpent_body(dest, &moved);
            }
            None => {
                if let Some((&tail, rest)) = body.split_last() {
                    self.room.plot_transparent(tail, TransparentTile::Empty);
                    self.room.lay_serpent_body(actor.pos, rest);
                }
                if body.len() <= 1 {
                    self.kill_actor(actor.id);
                    cues.add_with(CueKind::SerpentDied, CuePayload::Actor(actor.id));
                }
            }
        }
    }

    /// Larger axis delta first (horizontal on ties), then straight ahead.
    /// Reversing into the neck is never a candidate.
    fn serpent_destination(&self, actor: &Actor) -> Option<Pos> {
        let target = self.player.pos;
        let dx = target.x - actor.pos.x;
        let dy = target.y - actor.pos.y;
        let horizontal = Orientation::from_delta(dx, 0);
        let vertical = Orientation::from_delta(0, dy);
        let candidates = if dx.abs() >= dy.abs() {
            [horizontal, vertical, actor.orientation]
        } else {
            [vertical, horizontal, actor.orientation]
        };
        let backwards = actor.orientation.opposite();
        candidates
            .into_iter()
            .filter(|&dir| dir != Orientation::None && !dir.is_diagonal())
            .filter(|&dir| dir != backwards)
            .map(|dir| actor.pos.step(dir))
            .find(|&dest| self.can_enter(actor.id, dest, MovementClass::Ground))
    }
}

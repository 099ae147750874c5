//! Creature turns in registry order: pathing, spawning and contact with the player.
//! This module exists to dispatch on `ActorKind` with exhaustive matches.
//! It does not own serpent movement, which lives in `serpent.rs`.

use super::*;

impl Game {
    pub(super) fn process_monsters(&mut self, spawned: &[ActorId], cues: &mut CueEvents) {
        let brain_present = self.actors.any_of(ActorKind::Brain);
        self.refresh_path_maps(brain_present);

        for id in self.actors.order() {
            if self.visit.is_over() {
                break;
            }
            if spawned.contains(&id) {
                continue;
            }
            // Killed earlier this turn.
            let Some(actor) = self.actors.get(id).cloned() else {
                continue;
            };
            match actor.kind {
                ActorKind::Brain => {}
                ActorKind::Roach
                | ActorKind::Tracker
                | ActorKind::Wraithwing
                | ActorKind::TarBaby => self.advance_walker(&actor, brain_present, cues),
                ActorKind::EvilEye => self.process_evil_eye(&actor, brain_present, cues),
                ActorKind::RoachQueen => self.process_queen(&actor, cues),
                ActorKind::RoachEgg => self.process_egg(&actor, cues),
                ActorKind::Serpent => self.process_serpent(&actor, cues),
                // Mothers share one growth step, run below.
                ActorKind::TarMother => {}
            }
        }
        if !self.visit.is_over() {
            self.grow_tar(cues);
        }
    }

    /// Points each needed class map at the player and advances it, within
    /// the configured ring budget.
    fn refresh_path_maps(&mut self, brain_present: bool) {
        let mut needed = [false; MovementClass::ALL.len()];
        for actor in self.actors.iter() {
            if is_brain_directed(actor, brain_present) {
                needed[actor.kind.movement_class().index()] = true;
            }
        }
        for class in MovementClass::ALL {
            if !needed[class.index()] {
                continue;
            }
            let map = self.room.prepare_path_map(class, self.player.pos);
            let limit =
                self.config.path_distance_budget.map(|rings| map.frontier_distance() + rings);
            map.compute(limit);
        }
    }

    /// Whether a creature may step onto `pos`. The player's square is open;
    /// stepping there is an attack.
    pub(super) fn can_enter(&self, id: ActorId, pos: Pos, class: MovementClass) -> bool {
        self.room.in_bounds(pos)
            && !self.room.is_static_obstacle(pos, class)
            && !self.room.is_serpent_body(pos)
            && self.room.opaque(pos) != OpaqueTile::Stairs
            && self.room.occupant(pos).is_none_or(|other| other == id)
            && self.sword_square() != Some(pos)
    }

    /// Moves an actor's head one square, attacking the player if it lands on them.
    pub(super) fn step_actor(&mut self, id: ActorId, dest: Pos, cues: &mut CueEvents) {
        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        let from = actor.pos;
        if from == dest {
            return;
        }
        actor.orientation = Orientation::between(from, dest);
        actor.pos = dest;
        self.room.set_occupant(from, None);
        self.room.set_occupant(dest, Some(id));
        if self.player.alive && dest == self.player.pos {
            self.kill_player(id, cues);
        }
    }

    fn advance_walker(&mut self, actor: &Actor, brain_present: bool, cues: &mut CueEvents) {
        if let Some(dest) = self.walker_destination(actor, brain_present) {
            self.step_actor(actor.id, dest, cues);
        }
    }

    fn walker_destination(&self, actor: &Actor, brain_present: bool) -> Option<Pos> {
        let class = actor.kind.movement_class();
        if is_brain_directed(actor, brain_present)
            && let Some(map) = self.room.path_map(class)
        {
            let moves = map.recommended_moves(actor.pos);
            if !moves.is_empty() {
                return moves
                    .into_iter()
                    .find(|&pos| pos == actor.pos || self.can_enter(actor.id, pos, class));
            }
        }
        self.beeline(actor, self.player.pos, false)
    }

    /// Diagonal first, then each axis alone. `flee` reverses the heading.
    fn beeline(&self, actor: &Actor, target: Pos, flee: bool) -> Option<Pos> {
        let sign = if flee { -1 } else { 1 };
        let dx = (target.x - actor.pos.x).signum() * sign;
        let dy = (target.y - actor.pos.y).signum() * sign;
        let class = actor.kind.movement_class();
        [(dx, dy), (dx, 0), (0, dy)]
            .into_iter()
            .filter(|&offset| offset != (0, 0))
            .map(|(ox, oy)| actor.pos.offset(ox, oy))
            .find(|&dest| self.can_enter(actor.id, dest, class))
    }

    fn process_evil_eye(&mut self, actor: &Actor, brain_present: bool, cues: &mut CueEvents) {
        let ActorState::Eye { awake } = actor.state else {
            return;
        };
        if awake {
            self.advance_walker(actor, brain_present, cues);
            return;
        }
        if self.eye_sees_player(actor)
            && let Some(eye) = self.actors.get_mut(actor.id)
        {
            eye.state = ActorState::Eye { awake: true };
            cues.add_with(CueKind::EvilEyeWoke, CuePayload::Actor(actor.id));
        }
    }

    /// Looks straight ahead until the view is cut by terrain or a creature.
    fn eye_sees_player(&self, actor: &Actor) -> bool {
        if actor.orientation == Orientation::None {
            return false;
        }
        let mut pos = actor.pos.step(actor.orientation);
        while self.room.in_bounds(pos) {
            if pos == self.player.pos {
                return true;
            }
            if self.room.is_static_obstacle(pos, MovementClass::Air)
                || self.room.is_serpent_body(pos)
                || self.room.occupant(pos).is_some()
            {
                return false;
            }
            pos = pos.step(actor.orientation);
        }
        false
    }

    fn process_queen(&mut self, actor: &Actor, cues: &mut CueEvents) {
        if let Some(dest) = self.beeline(actor, self.player.pos, true) {
            self.step_actor(actor.id, dest, cues);
        }
        if !on_interval(self.turn, self.config.queen_spawn_interval) {
            return;
        }
        let Some(queen) = self.actors.get(actor.id).cloned() else {
            return;
        };
        let nest: Vec<Pos> = queen
            .pos
            .neighbours()
            .into_iter()
            .filter(|&pos| {
                pos != self.player.pos && self.can_enter(queen.id, pos, MovementClass::Ground)
            })
            .collect();
        for &pos in &nest {
            let kind = ActorKind::RoachEgg;
            let egg = self.actors.insert(kind, pos, Orientation::None, kind.default_rank());
            self.room.set_occupant(pos, Some(egg));
        }
        if !nest.is_empty() {
            cues.add_with(CueKind::EggsLaid, CuePayload::Pos(queen.pos));
        }
    }

    fn process_egg(&mut self, actor: &Actor, cues: &mut CueEvents) {
        let ActorState::Egg { age } = actor.state else {
            return;
        };
        let hatch_turns = self.config.egg_hatch_turns;
        let Some(egg) = self.actors.get_mut(actor.id) else {
            return;
        };
        let age = age + 1;
        if age < hatch_turns {
            egg.state = ActorState::Egg { age };
            return;
        }
        egg.kind = ActorKind::Roach;
        egg.state = ActorState::Plain;
        cues.add_with(CueKind::EggHatched, CuePayload::Pos(egg.pos));
    }

    /// Spreads tar onto bare floor orthogonally touching existing tar.
    /// Runs once per interval turn however many mothers are alive.
    fn grow_tar(&mut self, cues: &mut CueEvents) {
        if !on_interval(self.turn, self.config.tar_growth_interval) {
            return;
        }
        let Some(mother) = self.actors.iter().find(|actor| actor.kind == ActorKind::TarMother)
        else {
            return;
        };
        let mother = mother.pos;
        let mut growth = Vec::new();
        for y in 0..self.room.rows() {
            for x in 0..self.room.cols() {
                let pos = Pos::new(x as i32, y as i32);
                if self.room.opaque(pos) == OpaqueTile::Floor
                    && self.room.transparent(pos) == TransparentTile::Empty
                    && self.room.occupant(pos).is_none()
                    && pos != self.player.pos
                    && pos.orthogonal_neighbours().into_iter().any(|next| self.room.is_tar(next))
                {
                    growth.push(pos);
                }
            }
        }
        for &pos in &growth {
            self.room.plot_transparent(pos, TransparentTile::Tar);
        }
        if !growth.is_empty() {
            cues.add_with(CueKind::TarGrew, CuePayload::Pos(mother));
        }
    }
}

fn is_brain_directed(actor: &Actor, brain_present: bool) -> bool {
    match actor.kind {
        ActorKind::Tracker => true,
        ActorKind::Roach | ActorKind::TarBaby | ActorKind::Wraithwing => brain_present,
        ActorKind::EvilEye => brain_present && actor.state == ActorState::Eye { awake: true },
        ActorKind::Brain
        | ActorKind::RoachQueen
        | ActorKind::RoachEgg
        | ActorKind::Serpent
        | ActorKind::TarMother => false,
    }
}

/// True on the last turn of every `interval`-turn period; zero disables.
fn on_interval(turn: u32, interval: u32) -> bool {
    interval > 0 && (turn + 1) % interval == 0
}

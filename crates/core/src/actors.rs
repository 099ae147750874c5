//! Creature arena and its stable processing order.
//! This module exists so removal mid-turn never invalidates iteration or grid back-references.
//! It does not own behaviour; the turn engine dispatches on `ActorKind`.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::types::{ActorId, MovementClass, Orientation, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Brain,
    Roach,
    Tracker,
    Wraithwing,
    EvilEye,
    RoachQueen,
    RoachEgg,
    TarBaby,
    Serpent,
    TarMother,
}

impl ActorKind {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn default_rank(self) -> u16 {
        match self {
            ActorKind::Brain => 10,
            ActorKind::Serpent => 200,
            ActorKind::TarMother => 300,
            ActorKind::Roach
            | ActorKind::Tracker
            | ActorKind::Wraithwing
            | ActorKind::EvilEye
            | ActorKind::RoachQueen
            | ActorKind::RoachEgg
            | ActorKind::TarBaby => 100,
        }
    }

    pub fn movement_class(self) -> MovementClass {
        match self {
            ActorKind::Wraithwing => MovementClass::Air,
            _ => MovementClass::Ground,
        }
    }

    pub fn initial_state(self) -> ActorState {
        match self {
            ActorKind::EvilEye => ActorState::Eye { awake: false },
            ActorKind::RoachEgg => ActorState::Egg { age: 0 },
            _ => ActorState::Plain,
        }
    }
}

/// Kind-specific extra state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    Plain,
    Eye { awake: bool },
    Egg { age: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub pos: Pos,
    pub orientation: Orientation,
    pub rank: u16,
    pub state: ActorState,
    pub alive: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ActorRegistry {
    actors: SlotMap<ActorId, Actor>,
    /// Live actors, ascending rank, insertion order within a rank.
    order: Vec<ActorId>,
    /// Actors killed this turn, reclaimed by `reap`.
    graveyard: Vec<ActorId>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        kind: ActorKind,
        pos: Pos,
        orientation: Orientation,
        rank: u16,
    ) -> ActorId {
        let id = self.actors.insert_with_key(|id| Actor {
            id,
            kind,
            pos,
            orientation,
            rank,
            state: kind.initial_state(),
            alive: true,
        });
        let slot = self.order.partition_point(|other| self.actors[*other].rank <= rank);
        self.order.insert(slot, id);
        id
    }

    /// Live actor lookup. Killed actors resolve to `None` even before reaping.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id).filter(|actor| actor.alive)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id).filter(|actor| actor.alive)
    }

    /// Marks the actor dead and splices it out of the processing order.
    /// Returns false if it was already gone.
    pub fn kill(&mut self, id: ActorId) -> bool {
        let Some(actor) = self.actors.get_mut(id).filter(|actor| actor.alive) else {
            return false;
        };
        actor.alive = false;
        self.order.retain(|other| *other != id);
        self.graveyard.push(id);
        true
    }

    pub fn reap(&mut self) {
        for id in self.graveyard.drain(..) {
            self.actors.remove(id);
        }
    }

    /// Copy of the processing order, safe to walk while the registry mutates.
    pub fn order(&self) -> Vec<ActorId> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.order.iter().map(|id| &self.actors[*id])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn any_of(&self, kind: ActorKind) -> bool {
        self.iter().any(|actor| actor.kind == kind)
    }

    /// Slots still held by killed actors awaiting reclamation.
    pub fn pending_reclaim(&self) -> usize {
        self.graveyard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_in_order(registry: &ActorRegistry) -> Vec<(ActorKind, Pos)> {
        registry.iter().map(|actor| (actor.kind, actor.pos)).collect()
    }

    #[test]
    fn lower_rank_acts_first_and_ties_keep_insertion_order() {
        let mut registry = ActorRegistry::new();
        registry.insert(ActorKind::Serpent, Pos::new(0, 0), Orientation::W, 200);
        registry.insert(ActorKind::Roach, Pos::new(1, 0), Orientation::S, 100);
        registry.insert(ActorKind::Brain, Pos::new(2, 0), Orientation::None, 10);
        registry.insert(ActorKind::Roach, Pos::new(3, 0), Orientation::S, 100);
        registry.insert(ActorKind::TarMother, Pos::new(4, 0), Orientation::None, 300);

        assert_eq!(
            kinds_in_order(&registry),
            vec![
                (ActorKind::Brain, Pos::new(2, 0)),
                (ActorKind::Roach, Pos::new(1, 0)),
                (ActorKind::Roach, Pos::new(3, 0)),
                (ActorKind::Serpent, Pos::new(0, 0)),
                (ActorKind::TarMother, Pos::new(4, 0)),
            ]
        );
    }

    #[test]
    fn killed_actor_is_hidden_until_reaped() {
        let mut registry = ActorRegistry::new();
        let roach = registry.insert(ActorKind::Roach, Pos::new(1, 1), Orientation::S, 100);
        let snapshot = registry.order();

        assert!(registry.kill(roach));
        assert!(!registry.kill(roach));
        assert!(registry.get(roach).is_none());
        assert!(registry.is_empty());
        assert_eq!(snapshot, vec![roach]);
        assert_eq!(registry.pending_reclaim(), 1);

        registry.reap();
        assert_eq!(registry.pending_reclaim(), 0);
        assert!(registry.get(roach).is_none());
    }

    #[test]
    fn new_actors_start_in_kind_state() {
        let mut registry = ActorRegistry::new();
        let egg = registry.insert(ActorKind::RoachEgg, Pos::new(0, 0), Orientation::None, 100);
        let eye = registry.insert(ActorKind::EvilEye, Pos::new(1, 0), Orientation::E, 100);
        assert_eq!(registry.get(egg).unwrap().state, ActorState::Egg { age: 0 });
        assert_eq!(registry.get(eye).unwrap().state, ActorState::Eye { awake: false });
    }
}

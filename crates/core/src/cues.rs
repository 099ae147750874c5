//! Typed notifications describing what happened during one turn.

use crate::types::{ActorId, Orientation, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CueKind {
    MonsterKilledPlayer,
    MonsterDiedFromStab,
    SerpentDied,
    WallDestroyed,
    TarDestroyed,
    TarBabyFormed,
    TarGrew,
    OrbActivated,
    DoorsToggled,
    GreenDoorsOpened,
    TrapdoorFell,
    StepOnScroll,
    CheckpointActivated,
    HitObstacle,
    EggsLaid,
    EggHatched,
    EvilEyeWoke,
    RoomCleared,
    ExitRoom,
    ExitLevel,
    PlayerOnEdge,
    SwordsmanAfraid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CuePayload {
    Pos(Pos),
    PosDir(Pos, Orientation),
    Actor(ActorId),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CueEvents {
    events: Vec<(CueKind, Option<CuePayload>)>,
}

impl CueEvents {
    pub fn add(&mut self, kind: CueKind) {
        self.events.push((kind, None));
    }

    pub fn add_with(&mut self, kind: CueKind, payload: CuePayload) {
        self.events.push((kind, Some(payload)));
    }

    pub fn has(&self, kind: CueKind) -> bool {
        self.events.iter().any(|(k, _)| *k == kind)
    }

    pub fn has_with(&self, kind: CueKind, payload: &CuePayload) -> bool {
        self.events.iter().any(|(k, p)| *k == kind && p.as_ref() == Some(payload))
    }

    pub fn payloads(&self, kind: CueKind) -> impl Iterator<Item = &CuePayload> + '_ {
        self.events.iter().filter(move |(k, _)| *k == kind).filter_map(|(_, p)| p.as_ref())
    }

    pub fn count(&self, kind: CueKind) -> usize {
        self.events.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CueKind, Option<&CuePayload>)> + '_ {
        self.events.iter().map(|(k, p)| (*k, p.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

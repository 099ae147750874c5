//! Loaded room contents handed to the engine by the room-loading collaborator.
//!
//! ASCII rows legend, one glyph per square:
//! - floor layer: `.` floor, `#` wall, `%` crumbly wall, `Y`/`y` closed/open
//!   yellow door, `G`/`g` closed/open green door, `_` pit, `^` trapdoor,
//!   `>` stairs, `+` checkpoint;
//! - item layer (on floor): `O` orb, `?` scroll, `X` obstacle, `~` tar,
//!   `s` serpent body (chained orthogonally to an `S` head);
//! - actors (on floor): `@` player, `B` brain, `r` roach, `t` tracker,
//!   `w` wraithwing, `e` evil eye, `Q` roach queen, `o` roach egg,
//!   `b` tar baby, `S` serpent head, `M` tar mother.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::actors::ActorKind;
use crate::error::SnapshotError;
use crate::tiles::{OpaqueTile, TransparentTile};
use crate::types::{MovementClass, Orientation, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorAction {
    Toggle,
    Open,
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbAgent {
    pub door: Pos,
    pub action: DoorAction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbDef {
    pub pos: Pos,
    pub agents: Vec<OrbAgent>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStart {
    pub pos: Pos,
    pub orientation: Orientation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSpawn {
    pub kind: ActorKind,
    pub pos: Pos,
    pub orientation: Orientation,
    /// Overrides the kind's default processing rank.
    #[serde(default)]
    pub rank: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub cols: usize,
    pub rows: usize,
    pub opaque: Vec<OpaqueTile>,
    pub transparent: Vec<TransparentTile>,
    #[serde(default)]
    pub orbs: Vec<OrbDef>,
    pub player: PlayerStart,
    #[serde(default)]
    pub actors: Vec<ActorSpawn>,
}

impl RoomSnapshot {
    pub fn from_rows(rows: &[&str]) -> Result<Self, SnapshotError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 || height == 0 {
            return Err(SnapshotError::EmptyRoom { cols: width, rows: height });
        }

        let mut snapshot = Self {
            cols: width,
            rows: height,
            opaque: vec![OpaqueTile::Floor; width * height],
            transparent: vec![TransparentTile::Empty; width * height],
            orbs: Vec::new(),
            player: PlayerStart { pos: Pos::new(0, 0), orientation: Orientation::S },
            actors: Vec::new(),
        };
        let mut player = None;
        let mut heads = Vec::new();
        let mut body = BTreeSet::new();

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(SnapshotError::RaggedRow { row: y, found, expected: width });
            }
            for (x, glyph) in row.chars().enumerate() {
                let pos = Pos::new(x as i32, y as i32);
                let idx = y * width + x;
                if let Some(tile) = opaque_glyph(glyph) {
                    snapshot.opaque[idx] = tile;
                } else if let Some(tile) = transparent_glyph(glyph) {
                    snapshot.transparent[idx] = tile;
                } else if glyph == 's' {
                    body.insert(pos);
                } else if glyph == '@' {
                    if player.replace(pos).is_some() {
                        return Err(SnapshotError::DuplicatePlayer);
                    }
                } else if let Some(kind) = actor_glyph(glyph) {
                    if kind == ActorKind::Serpent {
                        heads.push(snapshot.actors.len());
                    }
                    let orientation = match kind {
                        ActorKind::EvilEye => Orientation::S,
                        ActorKind::Serpent => Orientation::W,
                        _ => Orientation::None,
                    };
                    snapshot.actors.push(ActorSpawn { kind, pos, orientation, rank: None });
                } else {
                    return Err(SnapshotError::UnknownGlyph { glyph, pos });
                }
            }
        }

        snapshot.player.pos = player.ok_or(SnapshotError::MissingPlayer)?;
        for spawn_index in heads {
            let head = snapshot.actors[spawn_index].pos;
            let chain = chain_serpent_body(head, &mut body);
            if let Some(&neck) = chain.first() {
                snapshot.actors[spawn_index].orientation = Orientation::between(neck, head);
            }
            for (i, &segment) in chain.iter().enumerate() {
                let head_side = if i == 0 { head } else { chain[i - 1] };
                let tail_side = chain.get(i + 1).map(|&next| Orientation::between(segment, next));
                let tile = TransparentTile::serpent_segment(
                    Orientation::between(segment, head_side),
                    tail_side,
                )
                .ok_or(SnapshotError::DetachedSerpentBody { pos: segment })?;
                let idx = snapshot.index(segment);
                snapshot.transparent[idx] = tile;
            }
        }
        if let Some(&pos) = body.first() {
            return Err(SnapshotError::DetachedSerpentBody { pos });
        }

        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn with_orb(mut self, pos: Pos, agents: Vec<OrbAgent>) -> Self {
        self.orbs.push(OrbDef { pos, agents });
        self
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    pub fn opaque_at(&self, pos: Pos) -> OpaqueTile {
        self.opaque[self.index(pos)]
    }

    pub fn transparent_at(&self, pos: Pos) -> TransparentTile {
        self.transparent[self.index(pos)]
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(SnapshotError::EmptyRoom { cols: self.cols, rows: self.rows });
        }
        let expected = self.cols * self.rows;
        if self.opaque.len() != expected {
            return Err(SnapshotError::LayerSize {
                layer: "opaque",
                found: self.opaque.len(),
                expected,
            });
        }
        if self.transparent.len() != expected {
            return Err(SnapshotError::LayerSize {
                layer: "transparent",
                found: self.transparent.len(),
                expected,
            });
        }

        let mut occupied = BTreeSet::new();
        self.check_standing("player", self.player.pos, MovementClass::Ground)?;
        occupied.insert(self.player.pos);
        for spawn in &self.actors {
            self.check_standing("actor", spawn.pos, spawn.kind.movement_class())?;
            if !occupied.insert(spawn.pos) {
                return Err(SnapshotError::Overlap { pos: spawn.pos });
            }
        }
        self.check_serpent_bodies()?;

        for orb in &self.orbs {
            if !self.in_bounds(orb.pos) {
                return Err(SnapshotError::OutOfRange { what: "orb", pos: orb.pos });
            }
            for agent in &orb.agents {
                if !self.in_bounds(agent.door) {
                    return Err(SnapshotError::OutOfRange { what: "orb agent", pos: agent.door });
                }
                if !self.opaque_at(agent.door).is_yellow_door() {
                    return Err(SnapshotError::NotADoor { pos: agent.door });
                }
            }
        }
        Ok(())
    }

    /// Stable byte encoding of everything the engine reads from the snapshot.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.cols as u32).to_le_bytes());
        bytes.extend((self.rows as u32).to_le_bytes());
        bytes.extend(self.opaque.iter().map(|tile| tile.code()));
        bytes.extend(self.transparent.iter().map(|tile| tile.code()));
        bytes.extend((self.orbs.len() as u32).to_le_bytes());
        for orb in &self.orbs {
            push_pos(&mut bytes, orb.pos);
            bytes.extend((orb.agents.len() as u32).to_le_bytes());
            for agent in &orb.agents {
                push_pos(&mut bytes, agent.door);
                bytes.push(match agent.action {
                    DoorAction::Toggle => 0,
                    DoorAction::Open => 1,
                    DoorAction::Close => 2,
                });
            }
        }
        push_pos(&mut bytes, self.player.pos);
        bytes.push(self.player.orientation.code());
        bytes.extend((self.actors.len() as u32).to_le_bytes());
        for spawn in &self.actors {
            bytes.push(spawn.kind.code());
            push_pos(&mut bytes, spawn.pos);
            bytes.push(spawn.orientation.code());
            bytes.extend(spawn.rank.unwrap_or(spawn.kind.default_rank()).to_le_bytes());
        }
        bytes
    }

    /// Hex SHA-256 of `canonical_bytes`, used to tie recordings to a room.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes());
        format!("{:064x}", hasher.finalize())
    }

    fn check_standing(
        &self,
        what: &'static str,
        pos: Pos,
        class: MovementClass,
    ) -> Result<(), SnapshotError> {
        if !self.in_bounds(pos) {
            return Err(SnapshotError::OutOfRange { what, pos });
        }
        let transparent = self.transparent_at(pos);
        if self.opaque_at(pos).blocks(class) || transparent.blocks() || transparent.is_serpent() {
            return Err(SnapshotError::Blocked { what, pos });
        }
        Ok(())
    }

    /// Every body tile must be reached by walking back from some serpent head
    /// against its orientation, each piece linking toward the one before it.
    fn check_serpent_bodies(&self) -> Result<(), SnapshotError> {
        let mut claimed = BTreeSet::new();
        for spawn in self.actors.iter().filter(|spawn| spawn.kind == ActorKind::Serpent) {
            let mut prev = spawn.pos;
            let mut current = spawn.pos.step(spawn.orientation.opposite());
            while self.in_bounds(current) && self.transparent_at(current).is_serpent() {
                let links = self.transparent_at(current).serpent_links();
                if !links.contains(&Orientation::between(current, prev))
                    || !claimed.insert(current)
                {
                    break;
                }
                let Some(&onward) = links.iter().find(|&&link| current.step(link) != prev) else {
                    break;
                };
                prev = current;
                current = current.step(onward);
            }
        }
        for y in 0..self.rows {
            for x in 0..self.cols {
                let pos = Pos::new(x as i32, y as i32);
                if self.transparent_at(pos).is_serpent() && !claimed.contains(&pos) {
                    return Err(SnapshotError::DetachedSerpentBody { pos });
                }
            }
        }
        Ok(())
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(self.in_bounds(pos), "square {pos:?} outside {}x{} room", self.cols, self.rows);
        (pos.y as usize) * self.cols + (pos.x as usize)
    }
}

fn push_pos(bytes: &mut Vec<u8>, pos: Pos) {
    bytes.extend(pos.x.to_le_bytes());
    bytes.extend(pos.y.to_le_bytes());
}

/// Follows unclaimed body squares outward from the head, N/E/S/W first found.
fn chain_serpent_body(head: Pos, body: &mut BTreeSet<Pos>) -> Vec<Pos> {
    let mut chain = Vec::new();
    let mut current = head;
    while let Some(next) =
        current.orthogonal_neighbours().into_iter().find(|neighbour| body.contains(neighbour))
    {
        body.remove(&next);
        chain.push(next);
        current = next;
    }
    chain
}

fn opaque_glyph(glyph: char) -> Option<OpaqueTile> {
    match glyph {
        '.' => Some(OpaqueTile::Floor),
        '#' => Some(OpaqueTile::Wall),
        '%' => Some(OpaqueTile::CrumblyWall),
        'Y' => Some(OpaqueTile::YellowDoor),
        'y' => Some(OpaqueTile::YellowDoorOpen),
        'G' => Some(OpaqueTile::GreenDoor),
        'g' => Some(OpaqueTile::GreenDoorOpen),
        '_' => Some(OpaqueTile::Pit),
        '^' => Some(OpaqueTile::Trapdoor),
        '>' => Some(OpaqueTile::Stairs),
        '+' => Some(OpaqueTile::Checkpoint),
        _ => None,
    }
}

fn transparent_glyph(glyph: char) -> Option<TransparentTile> {
    match glyph {
        'O' => Some(TransparentTile::Orb),
        '?' => Some(TransparentTile::Scroll),
        'X' => Some(TransparentTile::Obstacle),
        '~' => Some(TransparentTile::Tar),
        _ => None,
    }
}

fn actor_glyph(glyph: char) -> Option<ActorKind> {
    match glyph {
        'B' => Some(ActorKind::Brain),
        'r' => Some(ActorKind::Roach),
        't' => Some(ActorKind::Tracker),
        'w' => Some(ActorKind::Wraithwing),
        'e' => Some(ActorKind::EvilEye),
        'Q' => Some(ActorKind::RoachQueen),
        'o' => Some(ActorKind::RoachEgg),
        'b' => Some(ActorKind::TarBaby),
        'S' => Some(ActorKind::Serpent),
        'M' => Some(ActorKind::TarMother),
        _ => None,
    }
}

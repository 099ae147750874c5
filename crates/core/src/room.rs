//! Two-layer tile grid with occupant back-references and attached influence maps.
//! This module exists so every terrain mutation keeps path-map obstacle flags in sync.
//! It does not own actors or the player; the turn engine decides what gets plotted.

use std::collections::{BTreeSet, VecDeque};

use crate::pathmap::InfluenceMap;
use crate::snapshot::{OrbDef, RoomSnapshot};
use crate::tiles::{OpaqueTile, TransparentTile};
use crate::types::{ActorId, MovementClass, Orientation, Pos};

#[derive(Clone, Debug)]
pub struct Room {
    cols: usize,
    rows: usize,
    opaque: Vec<OpaqueTile>,
    transparent: Vec<TransparentTile>,
    /// Head square of each live actor. Serpent bodies are found via the tile chain.
    occupants: Vec<Option<ActorId>>,
    orbs: Vec<OrbDef>,
    path_maps: [Option<InfluenceMap>; 2],
}

impl Room {
    pub fn from_snapshot(snapshot: &RoomSnapshot) -> Self {
        Self {
            cols: snapshot.cols,
            rows: snapshot.rows,
            opaque: snapshot.opaque.clone(),
            transparent: snapshot.transparent.clone(),
            occupants: vec![None; snapshot.cols * snapshot.rows],
            orbs: snapshot.orbs.clone(),
            path_maps: [None, None],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    pub fn is_edge(&self, pos: Pos) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x as usize == self.cols - 1
                || pos.y as usize == self.rows - 1)
    }

    pub fn opaque(&self, pos: Pos) -> OpaqueTile {
        self.opaque[self.index(pos)]
    }

    pub fn transparent(&self, pos: Pos) -> TransparentTile {
        self.transparent[self.index(pos)]
    }

    pub fn opaque_layer(&self) -> &[OpaqueTile] {
        &self.opaque
    }

    pub fn transparent_layer(&self) -> &[TransparentTile] {
        &self.transparent
    }

    pub fn plot_opaque(&mut self, pos: Pos, tile: OpaqueTile) {
        let idx = self.index(pos);
        self.opaque[idx] = tile;
        self.sync_path_maps(pos);
    }

    pub fn plot_transparent(&mut self, pos: Pos, tile: TransparentTile) {
        let idx = self.index(pos);
        self.transparent[idx] = tile;
        self.sync_path_maps(pos);
    }

    /// Terrain-only blocking, the classification influence maps are built from.
    pub fn is_static_obstacle(&self, pos: Pos, class: MovementClass) -> bool {
        self.opaque(pos).blocks(class) || self.transparent(pos).blocks()
    }

    pub fn occupant(&self, pos: Pos) -> Option<ActorId> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.occupants[self.index(pos)]
    }

    pub fn set_occupant(&mut self, pos: Pos, occupant: Option<ActorId>) {
        let idx = self.index(pos);
        self.occupants[idx] = occupant;
    }

    pub fn path_map(&self, class: MovementClass) -> Option<&InfluenceMap> {
        self.path_maps[class.index()].as_ref()
    }

    /// Creates the class's map on first use and points it at `target`.
    pub fn prepare_path_map(&mut self, class: MovementClass, target: Pos) -> &mut InfluenceMap {
        let map = match self.path_maps[class.index()].take() {
            Some(map) => map,
            None => {
                let mut map = InfluenceMap::new(self.cols, self.rows, target);
                map.load_obstacles(|pos| self.is_static_obstacle(pos, class));
                map
            }
        };
        let map = self.path_maps[class.index()].insert(map);
        map.set_target(target);
        map
    }

    pub fn orb_at(&self, pos: Pos) -> Option<&OrbDef> {
        self.orbs.iter().find(|orb| orb.pos == pos)
    }

    /// Orthogonally connected yellow-door squares (open or closed) containing `start`.
    pub fn door_region(&self, start: Pos) -> Vec<Pos> {
        if !self.in_bounds(start) || !self.opaque(start).is_yellow_door() {
            return Vec::new();
        }
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut region = Vec::new();
        while let Some(pos) = queue.pop_front() {
            region.push(pos);
            for next in pos.orthogonal_neighbours() {
                if self.in_bounds(next)
                    && self.opaque(next).is_yellow_door()
                    && seen.insert(next)
                {
                    queue.push_back(next);
                }
            }
        }
        region
    }

    pub fn is_tar(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.transparent(pos) == TransparentTile::Tar
    }

    /// Tar breaks unless it is braced on all four orthogonal sides.
    pub fn is_tar_vulnerable(&self, pos: Pos) -> bool {
        !pos.orthogonal_neighbours().into_iter().all(|next| self.is_tar(next))
    }

    /// Whether `pos` is one corner of a solid 2×2 tar block.
    pub fn tar_in_2x2(&self, pos: Pos) -> bool {
        [(-1, -1), (0, -1), (-1, 0), (0, 0)].into_iter().any(|(dx, dy)| {
            let corner = pos.offset(dx, dy);
            [(0, 0), (1, 0), (0, 1), (1, 1)]
                .into_iter()
                .all(|(ox, oy)| self.is_tar(corner.offset(ox, oy)))
        })
    }

    pub fn is_serpent_body(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.transparent(pos).is_serpent()
    }

    /// Body squares behind a serpent head, neck first, tail last.
    pub fn serpent_body(&self, head: Pos, orientation: Orientation) -> Vec<Pos> {
        let mut body = Vec::new();
        let mut prev = head;
        let mut current = head.step(orientation.opposite());
        while body.len() < self.cols * self.rows && self.is_serpent_body(current) {
            let links = self.transparent(current).serpent_links();
            if !links.contains(&Orientation::between(current, prev)) {
                break;
            }
            body.push(current);
            let Some(&onward) =
                links.iter().find(|&&link| current.step(link) != prev)
            else {
                break;
            };
            prev = current;
            current = current.step(onward);
        }
        body
    }

    /// Retiles a serpent body so each piece links to its neighbours.
    pub fn lay_serpent_body(&mut self, head: Pos, body: &[Pos]) {
        for (i, &segment) in body.iter().enumerate() {
            let head_side = if i == 0 { head } else { body[i - 1] };
            let tail_side = body.get(i + 1).map(|&next| Orientation::between(segment, next));
            if let Some(tile) = TransparentTile::serpent_segment(
                Orientation::between(segment, head_side),
                tail_side,
            ) {
                self.plot_transparent(segment, tile);
            }
        }
    }

    /// Walks the body chain from `pos` to the square that links off the
    /// chain and holds an occupant, i.e. the head.
    pub fn serpent_head_from_body(&self, pos: Pos) -> Option<Pos> {
        if !self.is_serpent_body(pos) {
            return None;
        }
        let mut seen = BTreeSet::from([pos]);
        let mut stack = vec![pos];
        while let Some(current) = stack.pop() {
            for &link in self.transparent(current).serpent_links() {
                let next = current.step(link);
                if !self.in_bounds(next) || !seen.insert(next) {
                    continue;
                }
                if self.is_serpent_body(next) {
                    stack.push(next);
                } else if self.occupant(next).is_some() {
                    return Some(next);
                }
            }
        }
        None
    }

    fn sync_path_maps(&mut self, pos: Pos) {
        for class in MovementClass::ALL {
            let blocked = self.is_static_obstacle(pos, class);
            if let Some(map) = self.path_maps[class.index()].as_mut() {
                map.set_obstacle(pos, blocked);
            }
        }
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(self.in_bounds(pos), "square {pos:?} outside {}x{} room", self.cols, self.rows);
        (pos.y as usize) * self.cols + (pos.x as usize)
    }
}

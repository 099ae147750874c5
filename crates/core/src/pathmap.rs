//! Incrementally computed distance/direction field anchored at one target square.
//! This module exists so brain-directed actors can share one wavefront per movement class.
//! It does not own obstacle classification; callers feed blocked flags in.
//!
//! Each `compute` call grows the settled region one Chebyshev ring at a time,
//! optionally stopping at a distance budget. Guidance read before the field
//! converges is stale but valid, and actors depend on that.

use crate::types::{Orientation, Pos};

/// Distance recorded for squares that settled without a usable neighbour.
pub const UNREACHABLE: u32 = u32::MAX / 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SquareState {
    Blocked,
    Pending,
    Frontier,
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathSquare {
    pub state: SquareState,
    pub direction: Orientation,
    pub distance: u32,
}

impl PathSquare {
    const PENDING: Self =
        Self { state: SquareState::Pending, direction: Orientation::None, distance: UNREACHABLE };
    const BLOCKED: Self =
        Self { state: SquareState::Blocked, direction: Orientation::None, distance: UNREACHABLE };

    pub fn is_settled(self) -> bool {
        self.state == SquareState::Settled
    }

    pub fn is_reachable(self) -> bool {
        self.is_settled() && self.distance != UNREACHABLE
    }
}

#[derive(Clone, Debug)]
pub struct InfluenceMap {
    cols: usize,
    rows: usize,
    target: Pos,
    obstacles: Vec<bool>,
    squares: Vec<PathSquare>,
    /// Squares settled by the most recent ring; the next expansion starts here.
    last_ring: Vec<Pos>,
    ring: u32,
    complete: bool,
}

impl InfluenceMap {
    pub fn new(cols: usize, rows: usize, target: Pos) -> Self {
        assert!(cols > 0 && rows > 0, "influence map needs a non-empty grid");
        let mut map = Self {
            cols,
            rows,
            target,
            obstacles: vec![false; cols * rows],
            squares: vec![PathSquare::PENDING; cols * rows],
            last_ring: Vec::new(),
            ring: 0,
            complete: false,
        };
        map.reset();
        map
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn target(&self) -> Pos {
        self.target
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Distance of the outermost settled ring.
    pub fn frontier_distance(&self) -> u32 {
        self.ring
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    pub fn square(&self, pos: Pos) -> PathSquare {
        self.squares[self.index(pos)]
    }

    pub fn is_obstacle(&self, pos: Pos) -> bool {
        self.obstacles[self.index(pos)]
    }

    /// Retargets the field. Same target is a no-op so settled work survives.
    pub fn set_target(&mut self, target: Pos) {
        assert!(self.in_bounds(target), "influence map target {target:?} out of range");
        if target == self.target {
            return;
        }
        self.target = target;
        self.reset();
    }

    /// Changes one square's obstacle flag. Any change discards the whole field.
    pub fn set_obstacle(&mut self, pos: Pos, blocked: bool) {
        let idx = self.index(pos);
        if self.obstacles[idx] == blocked {
            return;
        }
        self.obstacles[idx] = blocked;
        self.reset();
    }

    /// Replaces every obstacle flag at once and resets the field.
    pub fn load_obstacles(&mut self, mut is_blocked: impl FnMut(Pos) -> bool) {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let pos = Pos::new(x as i32, y as i32);
                let idx = self.index(pos);
                self.obstacles[idx] = is_blocked(pos);
            }
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        for (square, &blocked) in self.squares.iter_mut().zip(&self.obstacles) {
            *square = if blocked { PathSquare::BLOCKED } else { PathSquare::PENDING };
        }
        let idx = self.index(self.target);
        self.squares[idx] =
            PathSquare { state: SquareState::Settled, direction: Orientation::None, distance: 0 };
        self.last_ring.clear();
        self.last_ring.push(self.target);
        self.ring = 0;
        self.complete = false;
        tracing::debug!(
            target: "sword_core::pathmap",
            x = self.target.x,
            y = self.target.y,
            "pathmap.reset"
        );
    }

    /// Expands the wavefront ring by ring until it runs dry or the next ring
    /// would exceed `max_distance`. Returns true once every reachable square
    /// holds its final distance.
    pub fn compute(&mut self, max_distance: Option<u32>) -> bool {
        let start_ring = self.ring;
        while !self.complete {
            let next_ring = self.ring + 1;
            let frontier = self.collect_frontier();
            if frontier.is_empty() {
                self.complete = true;
                break;
            }
            if max_distance.is_some_and(|max| next_ring > max) {
                break;
            }
            for &pos in &frontier {
                let idx = self.index(pos);
                self.squares[idx].state = SquareState::Frontier;
            }
            let scored: Vec<(Pos, Orientation, u32)> = frontier
                .iter()
                .map(|&pos| match self.best_settled_neighbour(pos) {
                    Some(direction) => (pos, direction, next_ring),
                    None => (pos, Orientation::None, UNREACHABLE),
                })
                .collect();
            for (pos, direction, distance) in scored {
                let idx = self.index(pos);
                self.squares[idx] = PathSquare { state: SquareState::Settled, direction, distance };
            }
            self.last_ring = frontier;
            self.ring = next_ring;
        }
        tracing::trace!(
            target: "sword_core::pathmap",
            from_ring = start_ring,
            to_ring = self.ring,
            complete = self.complete,
            "pathmap.compute"
        );
        self.complete
    }

    /// Candidate squares around `pos` (itself included), best first.
    /// Score is `distance * 3` plus 2 for a diagonal step and 1 for standing
    /// still. Equal scores keep row-major neighbourhood order.
    pub fn recommended_moves(&self, pos: Pos) -> Vec<Pos> {
        let mut candidates: Vec<(u32, Pos)> = Vec::with_capacity(9);
        for candidate in pos.neighbourhood() {
            if !self.in_bounds(candidate) {
                continue;
            }
            let square = self.square(candidate);
            if !square.is_reachable() {
                continue;
            }
            let penalty = if candidate == pos {
                1
            } else if Orientation::between(pos, candidate).is_diagonal() {
                2
            } else {
                0
            };
            candidates.push((square.distance * 3 + penalty, candidate));
        }
        candidates.sort_by_key(|&(score, _)| score);
        candidates.into_iter().map(|(_, candidate)| candidate).collect()
    }

    fn collect_frontier(&self) -> Vec<Pos> {
        let mut frontier = Vec::new();
        let mut queued = vec![false; self.squares.len()];
        for &settled in &self.last_ring {
            for neighbour in settled.neighbours() {
                if !self.in_bounds(neighbour) {
                    continue;
                }
                let idx = self.index(neighbour);
                if self.squares[idx].state == SquareState::Pending && !queued[idx] {
                    queued[idx] = true;
                    frontier.push(neighbour);
                }
            }
        }
        frontier
    }

    /// Lowest `distance * 2 + (orthogonal ? 1 : 0)` among settled neighbours.
    fn best_settled_neighbour(&self, pos: Pos) -> Option<Orientation> {
        let mut best: Option<(u32, Orientation)> = None;
        for neighbour in pos.neighbours() {
            if !self.in_bounds(neighbour) {
                continue;
            }
            let square = self.square(neighbour);
            if !square.is_reachable() {
                continue;
            }
            let direction = Orientation::between(pos, neighbour);
            let bonus = u32::from(!direction.is_diagonal());
            let score = square.distance * 2 + bonus;
            if best.is_none_or(|(best_score, _)| score < best_score) {
                best = Some((score, direction));
            }
        }
        best.map(|(_, direction)| direction)
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(self.in_bounds(pos), "square {pos:?} outside {}x{} map", self.cols, self.rows);
        (pos.y as usize) * self.cols + (pos.x as usize)
    }
}

#[cfg(test)]
mod tests;

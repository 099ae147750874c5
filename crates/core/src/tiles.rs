//! Tile vocabulary for the two room layers.
//! Byte codes are stable: they feed the replay checksum and the snapshot digest.

use serde::{Deserialize, Serialize};

use crate::types::{MovementClass, Orientation};

/// Floor-layer tile. Exactly one per square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OpaqueTile {
    #[default]
    Floor,
    Wall,
    CrumblyWall,
    YellowDoor,
    YellowDoorOpen,
    GreenDoor,
    GreenDoorOpen,
    Pit,
    Trapdoor,
    Stairs,
    Checkpoint,
}

impl OpaqueTile {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn blocks(self, class: MovementClass) -> bool {
        match self {
            OpaqueTile::Wall
            | OpaqueTile::CrumblyWall
            | OpaqueTile::YellowDoor
            | OpaqueTile::GreenDoor => true,
            OpaqueTile::Pit => class == MovementClass::Ground,
            OpaqueTile::Floor
            | OpaqueTile::YellowDoorOpen
            | OpaqueTile::GreenDoorOpen
            | OpaqueTile::Trapdoor
            | OpaqueTile::Stairs
            | OpaqueTile::Checkpoint => false,
        }
    }

    pub fn is_yellow_door(self) -> bool {
        matches!(self, OpaqueTile::YellowDoor | OpaqueTile::YellowDoorOpen)
    }
}

/// Item-layer tile. At most one per square; `Empty` means none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransparentTile {
    #[default]
    Empty,
    Orb,
    Scroll,
    Obstacle,
    Tar,
    SerpentNS,
    SerpentEW,
    SerpentNE,
    SerpentNW,
    SerpentSE,
    SerpentSW,
    SerpentTailN,
    SerpentTailE,
    SerpentTailS,
    SerpentTailW,
}

impl TransparentTile {
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Static obstruction, identical for every movement class.
    pub fn blocks(self) -> bool {
        matches!(self, TransparentTile::Orb | TransparentTile::Obstacle | TransparentTile::Tar)
    }

    pub fn is_serpent(self) -> bool {
        !self.serpent_links().is_empty()
    }

    /// Directions from this body piece to its neighbouring segments.
    /// Tails have one link, pointing toward the rest of the body.
    pub fn serpent_links(self) -> &'static [Orientation] {
        use Orientation::{E, N, S, W};
        match self {
            TransparentTile::SerpentNS => &[N, S],
            TransparentTile::SerpentEW => &[E, W],
            TransparentTile::SerpentNE => &[N, E],
            TransparentTile::SerpentNW => &[N, W],
            TransparentTile::SerpentSE => &[S, E],
            TransparentTile::SerpentSW => &[S, W],
            TransparentTile::SerpentTailN => &[N],
            TransparentTile::SerpentTailE => &[E],
            TransparentTile::SerpentTailS => &[S],
            TransparentTile::SerpentTailW => &[W],
            TransparentTile::Empty
            | TransparentTile::Orb
            | TransparentTile::Scroll
            | TransparentTile::Obstacle
            | TransparentTile::Tar => &[],
        }
    }

    /// Body piece joining two orthogonal directions.
    pub fn serpent_piece(a: Orientation, b: Orientation) -> Option<Self> {
        use Orientation::{E, N, S, W};
        match (a, b) {
            (N, S) | (S, N) => Some(TransparentTile::SerpentNS),
            (E, W) | (W, E) => Some(TransparentTile::SerpentEW),
            (N, E) | (E, N) => Some(TransparentTile::SerpentNE),
            (N, W) | (W, N) => Some(TransparentTile::SerpentNW),
            (S, E) | (E, S) => Some(TransparentTile::SerpentSE),
            (S, W) | (W, S) => Some(TransparentTile::SerpentSW),
            _ => None,
        }
    }

    /// Tile for a segment given the directions to its head-side and
    /// tail-side neighbours; no tail-side neighbour makes it the tail.
    pub fn serpent_segment(
        toward_head: Orientation,
        toward_tail: Option<Orientation>,
    ) -> Option<Self> {
        match toward_tail {
            Some(toward_tail) => Self::serpent_piece(toward_head, toward_tail),
            None => Self::serpent_tail(toward_head),
        }
    }

    pub fn serpent_tail(toward_body: Orientation) -> Option<Self> {
        match toward_body {
            Orientation::N => Some(TransparentTile::SerpentTailN),
            Orientation::E => Some(TransparentTile::SerpentTailE),
            Orientation::S => Some(TransparentTile::SerpentTailS),
            Orientation::W => Some(TransparentTile::SerpentTailW),
            _ => None,
        }
    }
}

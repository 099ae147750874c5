use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct ActorId;
}

/// Square coordinate. Field order keeps the derived `Ord` row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, orientation: Orientation) -> Self {
        let (dx, dy) = orientation.offset();
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// The 3×3 neighbourhood in row-major order, centre included.
    pub fn neighbourhood(self) -> [Pos; 9] {
        let mut out = [self; 9];
        let mut i = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                out[i] = self.offset(dx, dy);
                i += 1;
            }
        }
        out
    }

    /// The eight surrounding squares in row-major order.
    pub fn neighbours(self) -> [Pos; 8] {
        let mut out = [self; 8];
        let mut i = 0;
        for p in self.neighbourhood() {
            if p != self {
                out[i] = p;
                i += 1;
            }
        }
        out
    }

    pub fn orthogonal_neighbours(self) -> [Pos; 4] {
        [self.offset(0, -1), self.offset(1, 0), self.offset(0, 1), self.offset(-1, 0)]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    #[default]
    None,
}

impl Orientation {
    pub const COMPASS: [Orientation; 8] = [
        Orientation::N,
        Orientation::NE,
        Orientation::E,
        Orientation::SE,
        Orientation::S,
        Orientation::SW,
        Orientation::W,
        Orientation::NW,
    ];

    pub const fn offset(self) -> (i32, i32) {
        match self {
            Orientation::N => (0, -1),
            Orientation::NE => (1, -1),
            Orientation::E => (1, 0),
            Orientation::SE => (1, 1),
            Orientation::S => (0, 1),
            Orientation::SW => (-1, 1),
            Orientation::W => (-1, 0),
            Orientation::NW => (-1, -1),
            Orientation::None => (0, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Orientation::N,
            (1, -1) => Orientation::NE,
            (1, 0) => Orientation::E,
            (1, 1) => Orientation::SE,
            (0, 1) => Orientation::S,
            (-1, 1) => Orientation::SW,
            (-1, 0) => Orientation::W,
            (-1, -1) => Orientation::NW,
            _ => Orientation::None,
        }
    }

    pub fn between(from: Pos, to: Pos) -> Self {
        Self::from_delta(to.x - from.x, to.y - from.y)
    }

    pub fn clockwise(self) -> Self {
        match self {
            Orientation::None => Orientation::None,
            other => Self::COMPASS[(other.code() as usize + 1) % 8],
        }
    }

    pub fn counter_clockwise(self) -> Self {
        match self {
            Orientation::None => Orientation::None,
            other => Self::COMPASS[(other.code() as usize + 7) % 8],
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Orientation::None => Orientation::None,
            other => Self::COMPASS[(other.code() as usize + 4) % 8],
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Movement capability used for obstacle classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MovementClass {
    Ground,
    Air,
}

impl MovementClass {
    pub const ALL: [MovementClass; 2] = [MovementClass::Ground, MovementClass::Air];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Player command. Codes are stable and part of the recorded format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    MoveN,
    MoveNE,
    MoveW,
    MoveE,
    MoveSW,
    MoveS,
    MoveSE,
    MoveNW,
    RotateClockwise,
    RotateCounterClockwise,
    Wait,
}

impl Command {
    pub const ALL: [Command; 11] = [
        Command::MoveN,
        Command::MoveNE,
        Command::MoveW,
        Command::MoveE,
        Command::MoveSW,
        Command::MoveS,
        Command::MoveSE,
        Command::MoveNW,
        Command::RotateClockwise,
        Command::RotateCounterClockwise,
        Command::Wait,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn movement(self) -> Option<Orientation> {
        match self {
            Command::MoveN => Some(Orientation::N),
            Command::MoveNE => Some(Orientation::NE),
            Command::MoveW => Some(Orientation::W),
            Command::MoveE => Some(Orientation::E),
            Command::MoveSW => Some(Orientation::SW),
            Command::MoveS => Some(Orientation::S),
            Command::MoveSE => Some(Orientation::SE),
            Command::MoveNW => Some(Orientation::NW),
            Command::RotateClockwise | Command::RotateCounterClockwise | Command::Wait => None,
        }
    }

    /// Keypad layout: digits move (5 waits), `w`/`q` rotate the sword.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '8' => Some(Command::MoveN),
            '9' => Some(Command::MoveNE),
            '4' => Some(Command::MoveW),
            '6' => Some(Command::MoveE),
            '1' => Some(Command::MoveSW),
            '2' => Some(Command::MoveS),
            '3' => Some(Command::MoveSE),
            '7' => Some(Command::MoveNW),
            'w' => Some(Command::RotateClockwise),
            'q' => Some(Command::RotateCounterClockwise),
            '5' => Some(Command::Wait),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_codes_are_dense_and_round_trip() {
        for (index, command) in Command::ALL.iter().enumerate() {
            assert_eq!(command.code() as usize, index);
            assert_eq!(Command::from_code(command.code()), Some(*command));
        }
        assert_eq!(Command::from_code(11), None);
        assert_eq!(Command::from_code(u8::MAX), None);
    }

    #[test]
    fn rotation_cycles_through_all_eight_headings() {
        let mut heading = Orientation::N;
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(heading);
            heading = heading.clockwise();
        }
        assert_eq!(heading, Orientation::N);
        assert_eq!(seen, Orientation::COMPASS.to_vec());
        assert_eq!(Orientation::NE.counter_clockwise(), Orientation::N);
        assert_eq!(Orientation::N.counter_clockwise(), Orientation::NW);
        assert_eq!(Orientation::SW.opposite(), Orientation::NE);
    }

    #[test]
    fn neighbourhood_is_row_major() {
        let centre = Pos::new(3, 3);
        let cells = centre.neighbourhood();
        assert_eq!(cells[0], Pos::new(2, 2));
        assert_eq!(cells[1], Pos::new(3, 2));
        assert_eq!(cells[4], centre);
        assert_eq!(cells[8], Pos::new(4, 4));
        assert!(!centre.neighbours().contains(&centre));
    }

    #[test]
    fn orientation_between_follows_sign_of_delta() {
        assert_eq!(Orientation::between(Pos::new(0, 0), Pos::new(5, 5)), Orientation::SE);
        assert_eq!(Orientation::between(Pos::new(2, 2), Pos::new(2, 0)), Orientation::N);
        assert_eq!(Orientation::between(Pos::new(2, 2), Pos::new(2, 2)), Orientation::None);
    }
}

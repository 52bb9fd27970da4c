#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Offset(pub i32, pub i32);

/// Move directions. `N` decreases `y`, `E` increases `x`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::S,
        Direction::E,
        Direction::W,
        Direction::NE,
        Direction::NW,
        Direction::SE,
        Direction::SW,
    ];

    /// Position of this direction in a per-tile weight array.
    pub fn index(self) -> usize {
        match self {
            Direction::N => 0,
            Direction::S => 1,
            Direction::E => 2,
            Direction::W => 3,
            Direction::NE => 4,
            Direction::NW => 5,
            Direction::SE => 6,
            Direction::SW => 7,
        }
    }

    pub fn offset(self) -> Offset {
        match self {
            Direction::N => Offset(0, -1),
            Direction::S => Offset(0, 1),
            Direction::E => Offset(1, 0),
            Direction::W => Offset(-1, 0),
            Direction::NE => Offset(1, -1),
            Direction::NW => Offset(-1, -1),
            Direction::SE => Offset(1, 1),
            Direction::SW => Offset(-1, 1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(self, Direction::NE | Direction::NW | Direction::SE | Direction::SW)
    }

    /// The two orthogonal directions that close the 2x2 block of a diagonal move.
    pub fn shared(self) -> Option<(Direction, Direction)> {
        match self {
            Direction::NE => Some((Direction::N, Direction::E)),
            Direction::NW => Some((Direction::N, Direction::W)),
            Direction::SE => Some((Direction::S, Direction::E)),
            Direction::SW => Some((Direction::S, Direction::W)),
            _ => None,
        }
    }
}

//! Cardinal directions
//!
//! +x is east and +y is north. A collision direction is the direction the
//! entity was travelling when it hit something.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    /// Clockwise index, north = 0
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Inverse of [`Direction::index`], wrapping modulo 4
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Quarter turn clockwise
    pub fn next_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Quarter turn counter-clockwise
    pub fn next_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Axis the direction lies on (0 = x, 1 = y)
    pub fn axis(self) -> usize {
        match self {
            Direction::East | Direction::West => 0,
            Direction::North | Direction::South => 1,
        }
    }

    /// Direction of travel along `axis` for a signed speed, `None` when still
    pub fn along_axis(axis: usize, speed: f64) -> Option<Self> {
        let direction = if speed > 0.0 {
            Direction::East
        } else if speed < 0.0 {
            Direction::West
        } else {
            return None;
        };
        if axis == 0 {
            Some(direction)
        } else {
            Some(direction.next_left())
        }
    }
}

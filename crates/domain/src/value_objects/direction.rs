//! Movement directions between rooms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
    /// Upstairs, up a ladder
    Up,
    /// Downstairs, through a hole
    Down,
}

impl Direction {
    pub fn all() -> [Direction; 6] {
        [
            Self::North,
            Self::South,
            Self::East,
            Self::West,
            Self::Up,
            Self::Down,
        ]
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Phrase for someone arriving from this direction ("from the south", "from below").
    pub fn arrival_phrase(&self) -> &'static str {
        match self {
            Self::North => "from the north",
            Self::South => "from the south",
            Self::East => "from the east",
            Self::West => "from the west",
            Self::Up => "from above",
            Self::Down => "from below",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "n" | "north" => Ok(Self::North),
            "s" | "south" => Ok(Self::South),
            "e" | "east" => Ok(Self::East),
            "w" | "west" => Ok(Self::West),
            "u" | "up" => Ok(Self::Up),
            "d" | "down" => Ok(Self::Down),
            other => Err(DomainError::parse(format!("unknown direction '{other}'"))),
        }
    }
}

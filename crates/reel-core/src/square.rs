//! Board coordinates in algebraic form (`a1` .. `h8`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated board square. Only a lowercase file letter `a`-`h` followed by
/// a rank digit `1`-`8` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8, // 0 = a
    rank: u8, // 1..=8
}

impl Square {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.as_bytes() {
            [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Ok(Self {
                file: f - b'a',
                rank: r - b'0',
            }),
            _ => Err(CoreError::InvalidSquare(s.to_string())),
        }
    }

    /// Column from the left edge of a white-oriented board, 0..=7.
    pub fn file_index(self) -> u8 {
        self.file
    }

    /// Row from the top edge of a white-oriented board; rank 8 is row 0.
    pub fn row_index(self) -> u8 {
        8 - self.rank
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// All 64 squares, rank 8 first, files a to h within each rank.
    pub fn all() -> impl Iterator<Item = Square> {
        (1..=8u8)
            .rev()
            .flat_map(|rank| (0..8u8).map(move |file| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank)
    }
}

impl FromStr for Square {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::parse(s)
    }
}

impl TryFrom<String> for Square {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Square::parse(&s)
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_string()
    }
}

use serde::{Deserialize, Serialize};

use crate::jetan::consts::BOARD_SIZE;
use crate::utils::prelude::*;

/// Board coordinate, bounded to the 10x10 grid.
///
/// Ordering is row-major so traversals over square sets are deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSquare")]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    /// Constructs a square, failing if the coordinates fall off the board.
    pub fn new(row: i64, col: i64) -> Result<Square> {
        if !(0..BOARD_SIZE as i64).contains(&row) || !(0..BOARD_SIZE as i64).contains(&col) {
            return Err(anyhow!("the board is a 10x10 board; ({row}, {col}) is not valid"));
        }
        Ok(Square { row: row as usize, col: col as usize })
    }

    /// Constructs a square from coordinates the caller already knows are in bounds.
    pub(crate) const fn at(row: usize, col: usize) -> Square {
        Square { row, col }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Offsets the square by a delta, yielding `None` off the board.
    pub fn step(&self, delta: Delta) -> Option<Square> {
        let (row, col) = (self.row as i64 + delta.dr, self.col as i64 + delta.dc);
        Square::new(row, col).ok()
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// Unvalidated mirror of the wire shape; `try_from` funnels deserialization
// through the bounds check.
#[derive(Deserialize)]
struct RawSquare {
    row: i64,
    col: i64,
}

impl TryFrom<RawSquare> for Square {
    type Error = Error;
    fn try_from(raw: RawSquare) -> std::result::Result<Square, Error> {
        Square::new(raw.row, raw.col)
    }
}

/// Signed offset pair applied to a square to reach a neighbouring square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delta {
    pub dr: i64,
    pub dc: i64,
}

const fn delta(dr: i64, dc: i64) -> Delta {
    Delta { dr, dc }
}

/// Offsets that turn a square into one of its orthogonal neighbours.
pub const ORTHO_MOVES: [Delta; 4] = [delta(-1, 0), delta(1, 0), delta(0, -1), delta(0, 1)];

/// Offsets that turn a square into one of its diagonal neighbours.
pub const DIAGONAL_MOVES: [Delta; 4] = [delta(-1, -1), delta(-1, 1), delta(1, -1), delta(1, 1)];

/// All eight king-wise offsets.
pub const ALL_MOVES: [Delta; 8] = [
    delta(-1, 0),
    delta(1, 0),
    delta(0, -1),
    delta(0, 1),
    delta(-1, -1),
    delta(-1, 1),
    delta(1, -1),
    delta(1, 1),
];

/// The Black Panthan advances everywhere except the three column-decreasing offsets.
pub const PANTHAN_MOVES_BLACK: [Delta; 5] =
    [delta(-1, 0), delta(-1, 1), delta(0, 1), delta(1, 1), delta(1, 0)];

/// The Orange Panthan advances everywhere except the three column-increasing offsets.
pub const PANTHAN_MOVES_ORANGE: [Delta; 5] =
    [delta(-1, 0), delta(-1, -1), delta(0, -1), delta(1, -1), delta(1, 0)];

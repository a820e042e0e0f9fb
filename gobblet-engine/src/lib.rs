//! Gobblet Jr. rules engine: a 3x3 stacking board, per-color reserves, and a
//! two-phase pick-up / drop turn state machine.
//!
//! # Board Encoding (64-bit)
//!
//! ```text
//! Bits 0-53:  Board state (9 cells × 6 bits per cell)
//! Bits 54-63: Unused
//!
//! Each cell (6 bits) - indexed by SIZE, not stack position:
//!   Bits 0-1: Small piece owner (0=empty, 1=A, 2=B)
//!   Bits 2-3: Medium piece owner
//!   Bits 4-5: Large piece owner
//!
//! Cell indices (row-major order, row 0 = top, col 0 = left):
//!   (0,0)=0  (0,1)=1  (0,2)=2
//!   (1,0)=3  (1,1)=4  (1,2)=5
//!   (2,0)=6  (2,1)=7  (2,2)=8
//! ```
//!
//! A piece may only cover a strictly smaller one, so sorting a cell by size
//! gives its stack from bottom to top and the encoding loses nothing.
//!
//! # Turn Model
//!
//! ```text
//!                 pick_up                       drop (legal)
//! AwaitingPickup ---------> PieceInHand ------------------------> AwaitingPickup (next player)
//!       ^                     |    |                        \---> game over (win / exposure win)
//!       |   cancel / drop     |    |
//!       +---(illegal)---------+    +-- drop (out of range): piece stays in hand
//! ```

mod board;
mod config;
mod engine;
mod error;
mod reserve;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::{Deserialize, Serialize};

pub use board::Board;
pub use config::EngineConfig;
pub use engine::{EngineState, GameEngine, InHand, Origin, Phase, Source, WinCause};
pub use error::EngineError;
pub use reserve::{Reserve, PIECES_PER_SIZE};

/// Piece color. The discriminants double as the 2-bit owner code in [`Board`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    A = 1,
    B = 2,
}

impl Color {
    /// Get the opposing color.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::A => Color::B,
            Color::B => Color::A,
        }
    }

    /// Convert from the 2-bit owner code (1 or 2).
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Color> {
        match bits {
            1 => Some(Color::A),
            2 => Some(Color::B),
            _ => None,
        }
    }

    /// Both colors, A first.
    pub fn all() -> impl Iterator<Item = Color> {
        [Color::A, Color::B].into_iter()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::A => f.write_str("A"),
            Color::B => f.write_str("B"),
        }
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(Color::A),
            "b" | "B" => Ok(Color::B),
            other => Err(format!("unknown color '{other}', expected A or B")),
        }
    }
}

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl Size {
    /// Check if this size can gobble (cover) another size.
    #[inline]
    pub fn can_gobble(self, other: Size) -> bool {
        (self as u8) > (other as u8)
    }

    /// Convert from index (0, 1, 2) to Size.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Size> {
        match idx {
            0 => Some(Size::Small),
            1 => Some(Size::Medium),
            2 => Some(Size::Large),
            _ => None,
        }
    }

    /// Index into per-size arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-letter notation: S, M or L.
    pub fn letter(self) -> char {
        match self {
            Size::Small => 'S',
            Size::Medium => 'M',
            Size::Large => 'L',
        }
    }

    /// Get all sizes as an iterator, smallest first.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::Small, Size::Medium, Size::Large].into_iter()
    }
}

/// A piece. Pieces of the same color and size are interchangeable.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub size: Size,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, size: Size) -> Piece {
        Piece { color, size }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.color, self.size.letter())
    }
}

/// Raw `(row, col)` coordinate as supplied by a caller. Not yet validated.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u8,
    pub col: u8,
}

impl CellCoord {
    #[inline]
    pub const fn new(row: u8, col: u8) -> CellCoord {
        CellCoord { row, col }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Validated position on the 3x3 board (0-8).
///
/// Layout:
/// ```text
///   0 1 2
///   3 4 5
///   6 7 8
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Pos(u8);

impl Pos {
    /// Create a position from row and column, rejecting anything off the grid.
    #[inline]
    pub fn new(row: u8, col: u8) -> Result<Pos, EngineError> {
        if row < 3 && col < 3 {
            Ok(Pos(row * 3 + col))
        } else {
            Err(EngineError::OutOfRange { row, col })
        }
    }

    /// Create a position from a row-major index (0-8).
    #[inline]
    pub fn from_index(idx: u8) -> Option<Pos> {
        (idx < 9).then_some(Pos(idx))
    }

    /// Get the row-major index (0-8).
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Get the row (0-2).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % 3
    }

    /// The caller-facing coordinate of this position.
    #[inline]
    pub fn coord(self) -> CellCoord {
        CellCoord::new(self.row(), self.col())
    }

    /// Iterate over all 9 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9).map(Pos)
    }
}

impl TryFrom<CellCoord> for Pos {
    type Error = EngineError;

    fn try_from(coord: CellCoord) -> Result<Self, Self::Error> {
        Pos::new(coord.row, coord.col)
    }
}

impl From<Pos> for CellCoord {
    fn from(pos: Pos) -> Self {
        pos.coord()
    }
}

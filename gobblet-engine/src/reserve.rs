//! Off-board piece supply for both colors.

use serde::{Deserialize, Serialize};

use crate::{Color, Size};

/// Pieces each color owns of every size.
pub const PIECES_PER_SIZE: u8 = 2;

/// Remaining off-board pieces, counted per color and size.
///
/// Counts start at [`PIECES_PER_SIZE`] and stay within `0..=PIECES_PER_SIZE`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Reserve {
    /// Indexed by `[color - 1][size]`.
    counts: [[u8; 3]; 2],
}

impl Reserve {
    /// A full reserve: two of each size for both colors.
    pub fn new() -> Reserve {
        Reserve {
            counts: [[PIECES_PER_SIZE; 3]; 2],
        }
    }

    /// Reserve whose counts are whatever is not on the board, given the
    /// per-size on-board counts of A and B.
    ///
    /// Returns None if a color has more than [`PIECES_PER_SIZE`] of a size out.
    pub fn remaining(on_board_a: [u8; 3], on_board_b: [u8; 3]) -> Option<Reserve> {
        let mut reserve = Reserve::new();
        for (slot, on_board) in [on_board_a, on_board_b].into_iter().enumerate() {
            for size in Size::all() {
                reserve.counts[slot][size.index()] =
                    PIECES_PER_SIZE.checked_sub(on_board[size.index()])?;
            }
        }
        Some(reserve)
    }

    #[inline]
    fn slot(color: Color) -> usize {
        color as usize - 1
    }

    /// Pieces of one size left for a color.
    #[inline]
    pub fn count(&self, color: Color, size: Size) -> u8 {
        self.counts[Self::slot(color)][size.index()]
    }

    /// Returns [small, medium, large] for a color.
    #[inline]
    pub fn counts(&self, color: Color) -> [u8; 3] {
        self.counts[Self::slot(color)]
    }

    /// Take one piece out of the reserve. Returns false if none are left.
    pub fn take(&mut self, color: Color, size: Size) -> bool {
        let count = &mut self.counts[Self::slot(color)][size.index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Return a piece to the reserve.
    pub fn put_back(&mut self, color: Color, size: Size) {
        let count = &mut self.counts[Self::slot(color)][size.index()];
        debug_assert!(*count < PIECES_PER_SIZE, "reserve overflow for {color:?} {size:?}");
        *count = (*count + 1).min(PIECES_PER_SIZE);
    }
}

impl Default for Reserve {
    fn default() -> Self {
        Self::new()
    }
}

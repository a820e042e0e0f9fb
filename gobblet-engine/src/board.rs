//! Packed 3x3 stacking board and top-of-stack win detection.

use crate::{Color, EngineError, Piece, Pos, Size};

/// Compact board state - fits in a single u64.
///
/// See crate documentation for encoding details.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Board(u64);

impl Board {
    /// Bits per cell (6 bits = 3 sizes × 2 bits each).
    const CELL_BITS: u32 = 6;
    /// Mask for a single cell (0b111111).
    const CELL_MASK: u64 = 0b111111;
    /// Mask for a single layer (2 bits for owner: 0=empty, 1=A, 2=B).
    const LAYER_MASK: u64 = 0b11;

    /// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
    const WIN_LINES: [[u8; 3]; 8] = [
        [0, 1, 2], // Row 0
        [3, 4, 5], // Row 1
        [6, 7, 8], // Row 2
        [0, 3, 6], // Col 0
        [1, 4, 7], // Col 1
        [2, 5, 8], // Col 2
        [0, 4, 8], // Main diagonal
        [2, 4, 6], // Anti-diagonal
    ];

    /// Create an empty board.
    #[inline]
    pub fn new() -> Board {
        Board(0)
    }

    /// Get the raw u64 encoding.
    #[inline]
    pub fn to_u64(self) -> u64 {
        self.0
    }

    #[inline]
    fn cell(&self, pos: Pos) -> u64 {
        (self.0 >> (pos.index() as u32 * Self::CELL_BITS)) & Self::CELL_MASK
    }

    #[inline]
    fn set_cell(&mut self, pos: Pos, value: u64) {
        let shift = pos.index() as u32 * Self::CELL_BITS;
        self.0 = (self.0 & !(Self::CELL_MASK << shift)) | ((value & Self::CELL_MASK) << shift);
    }

    /// Get the owner of a specific size piece at a position, covered or not.
    #[inline]
    pub fn owner_at(&self, pos: Pos, size: Size) -> Option<Color> {
        let bits = (self.cell(pos) >> (size as u32 * 2)) & Self::LAYER_MASK;
        Color::from_bits(bits as u8)
    }

    /// Get the top (visible) piece at a position.
    /// Returns None if the cell is empty.
    pub fn top(&self, pos: Pos) -> Option<Piece> {
        [Size::Large, Size::Medium, Size::Small]
            .into_iter()
            .find_map(|size| self.owner_at(pos, size).map(|color| Piece::new(color, size)))
    }

    /// The pieces in a cell from bottom to top.
    pub fn stack(&self, pos: Pos) -> Vec<Piece> {
        Size::all()
            .filter_map(|size| self.owner_at(pos, size).map(|color| Piece::new(color, size)))
            .collect()
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cell(pos) == 0
    }

    /// Check if a piece of the given size can be placed at this position.
    /// A piece can be placed if the cell is empty or the top piece is smaller.
    #[inline]
    pub fn can_place(&self, size: Size, pos: Pos) -> bool {
        match self.top(pos) {
            None => true,
            Some(top) => size.can_gobble(top.size),
        }
    }

    /// Push a piece onto a cell, gobbling whatever is visible there.
    ///
    /// Fails with [`EngineError::IllegalPlacement`] unless the cell is empty
    /// or its top piece is strictly smaller. The board is untouched on failure.
    pub fn push(&mut self, pos: Pos, piece: Piece) -> Result<(), EngineError> {
        if !self.can_place(piece.size, pos) {
            return Err(EngineError::IllegalPlacement);
        }
        self.put(pos, piece);
        Ok(())
    }

    /// Write a piece into its size layer without validation.
    ///
    /// Only for restoring a piece onto the cell it was just popped from.
    #[inline]
    pub(crate) fn put(&mut self, pos: Pos, piece: Piece) {
        let cell = self.cell(pos);
        let layer_shift = piece.size as u32 * 2;
        let cleared = cell & !(Self::LAYER_MASK << layer_shift);
        let new_cell = cleared | ((piece.color as u64) << layer_shift);
        self.set_cell(pos, new_cell);
    }

    /// Remove the top piece from a cell, uncovering whatever is below.
    /// Returns None if the cell was empty.
    pub fn pop(&mut self, pos: Pos) -> Option<Piece> {
        let top = self.top(pos)?;
        let layer_shift = top.size as u32 * 2;
        let cell = self.cell(pos);
        self.set_cell(pos, cell & !(Self::LAYER_MASK << layer_shift));
        Some(top)
    }

    /// Count pieces of each size on board for a color, covered ones included.
    /// Returns [small_count, medium_count, large_count].
    pub fn pieces_on_board(&self, color: Color) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for pos in Pos::all() {
            for size in Size::all() {
                if self.owner_at(pos, size) == Some(color) {
                    counts[size.index()] += 1;
                }
            }
        }
        counts
    }

    /// Bit i is set when the visible piece at cell i belongs to `color`.
    #[inline]
    pub fn visibility_mask(&self, color: Color) -> u16 {
        Pos::all()
            .filter(|&pos| self.top(pos).map(|p| p.color) == Some(color))
            .fold(0u16, |mask, pos| mask | (1 << pos.index()))
    }

    /// Get the first line where `color` owns all three visible pieces.
    ///
    /// Lines are scanned rows first, then columns, then the two diagonals.
    pub fn winning_line(&self, color: Color) -> Option<[Pos; 3]> {
        let mask = self.visibility_mask(color);
        Self::WIN_LINES
            .iter()
            .find(|line| line.iter().all(|&idx| mask & (1 << idx) != 0))
            .map(|line| line.map(Pos))
    }

    /// Check if `color` has three in a row among visible pieces.
    #[inline]
    pub fn has_three_in_a_row(&self, color: Color) -> bool {
        self.winning_line(color).is_some()
    }
}

impl std::fmt::Display for Board {
    /// One line per row, each cell shown by its visible piece (`--` if empty).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3u8 {
            let cells: Vec<String> = (0..3u8)
                .map(|col| {
                    let pos = Pos(row * 3 + col);
                    match self.top(pos) {
                        Some(piece) => piece.to_string(),
                        None => "--".to_string(),
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Pos {
        Pos::new(row, col).unwrap()
    }

    fn piece(color: Color, size: Size) -> Piece {
        Piece::new(color, size)
    }

    #[test]
    fn test_board_empty_cells() {
        let board = Board::new();
        for p in Pos::all() {
            assert!(board.is_empty(p));
            assert_eq!(board.top(p), None);
            assert!(board.stack(p).is_empty());
        }
    }

    #[test]
    fn test_push_gobbles() {
        let mut board = Board::new();

        board.push(pos(0, 0), piece(Color::A, Size::Small)).unwrap();
        assert_eq!(board.top(pos(0, 0)), Some(piece(Color::A, Size::Small)));

        board.push(pos(0, 0), piece(Color::B, Size::Medium)).unwrap();
        assert_eq!(board.top(pos(0, 0)), Some(piece(Color::B, Size::Medium)));

        // The small piece is still there, just hidden
        assert_eq!(board.owner_at(pos(0, 0), Size::Small), Some(Color::A));
    }

    #[test]
    fn test_push_rejects_equal_or_larger() {
        let mut board = Board::new();
        board.push(pos(1, 1), piece(Color::A, Size::Medium)).unwrap();
        let before = board;

        assert_eq!(
            board.push(pos(1, 1), piece(Color::B, Size::Medium)),
            Err(EngineError::IllegalPlacement)
        );
        assert_eq!(
            board.push(pos(1, 1), piece(Color::A, Size::Small)),
            Err(EngineError::IllegalPlacement)
        );
        assert_eq!(board, before, "rejected pushes must not change the board");

        assert_eq!(board.push(pos(1, 1), piece(Color::B, Size::Large)), Ok(()));
    }

    #[test]
    fn test_can_place() {
        let mut board = Board::new();
        let p = pos(0, 0);

        for size in Size::all() {
            assert!(board.can_place(size, p));
        }

        board.push(p, piece(Color::A, Size::Small)).unwrap();
        assert!(!board.can_place(Size::Small, p));
        assert!(board.can_place(Size::Medium, p));
        assert!(board.can_place(Size::Large, p));

        board.push(p, piece(Color::B, Size::Medium)).unwrap();
        assert!(!board.can_place(Size::Small, p));
        assert!(!board.can_place(Size::Medium, p));
        assert!(board.can_place(Size::Large, p));

        board.push(p, piece(Color::A, Size::Large)).unwrap();
        for size in Size::all() {
            assert!(!board.can_place(size, p));
        }
    }

    #[test]
    fn test_pop_uncovers() {
        let mut board = Board::new();
        let p = pos(2, 1);
        board.push(p, piece(Color::A, Size::Small)).unwrap();
        board.push(p, piece(Color::B, Size::Medium)).unwrap();
        board.push(p, piece(Color::A, Size::Large)).unwrap();

        assert_eq!(board.pop(p), Some(piece(Color::A, Size::Large)));
        assert_eq!(board.top(p), Some(piece(Color::B, Size::Medium)));
        assert_eq!(board.pop(p), Some(piece(Color::B, Size::Medium)));
        assert_eq!(board.top(p), Some(piece(Color::A, Size::Small)));
        assert_eq!(board.pop(p), Some(piece(Color::A, Size::Small)));
        assert_eq!(board.pop(p), None);
        assert_eq!(board.to_u64(), 0);
    }

    #[test]
    fn test_stack_bottom_to_top() {
        let mut board = Board::new();
        let p = pos(1, 2);
        board.push(p, piece(Color::B, Size::Small)).unwrap();
        board.push(p, piece(Color::A, Size::Large)).unwrap();

        assert_eq!(
            board.stack(p),
            vec![piece(Color::B, Size::Small), piece(Color::A, Size::Large)]
        );
    }

    #[test]
    fn test_pieces_on_board_counts_hidden() {
        let mut board = Board::new();
        board.push(pos(0, 0), piece(Color::A, Size::Small)).unwrap();
        board.push(pos(0, 0), piece(Color::B, Size::Large)).unwrap();
        board.push(pos(2, 2), piece(Color::A, Size::Small)).unwrap();

        assert_eq!(board.pieces_on_board(Color::A), [2, 0, 0]);
        assert_eq!(board.pieces_on_board(Color::B), [0, 0, 1]);
    }

    #[test]
    fn test_all_winning_lines() {
        for line in Board::WIN_LINES {
            let mut board = Board::new();
            for idx in line {
                board.push(Pos(idx), piece(Color::B, Size::Small)).unwrap();
            }
            assert!(board.has_three_in_a_row(Color::B), "Failed for line {:?}", line);
            assert!(!board.has_three_in_a_row(Color::A));
            assert_eq!(board.winning_line(Color::B), Some(line.map(Pos)));
        }
    }

    #[test]
    fn test_hidden_piece_doesnt_count() {
        let mut board = Board::new();
        board.push(pos(0, 0), piece(Color::A, Size::Small)).unwrap();
        board.push(pos(0, 1), piece(Color::A, Size::Small)).unwrap();
        board.push(pos(0, 2), piece(Color::A, Size::Medium)).unwrap();
        board.push(pos(0, 2), piece(Color::B, Size::Large)).unwrap();

        assert!(!board.has_three_in_a_row(Color::A));
        assert!(!board.has_three_in_a_row(Color::B));
    }

    #[test]
    fn test_mixed_line_no_win() {
        let mut board = Board::new();
        board.push(pos(0, 0), piece(Color::A, Size::Small)).unwrap();
        board.push(pos(1, 1), piece(Color::B, Size::Medium)).unwrap();
        board.push(pos(2, 2), piece(Color::A, Size::Large)).unwrap();

        assert!(!board.has_three_in_a_row(Color::A));
        assert!(!board.has_three_in_a_row(Color::B));
    }

    #[test]
    fn test_uncovering_completes_line() {
        let mut board = Board::new();
        board.push(pos(0, 0), piece(Color::B, Size::Small)).unwrap();
        board.push(pos(0, 1), piece(Color::B, Size::Medium)).unwrap();
        board.push(pos(0, 2), piece(Color::B, Size::Small)).unwrap();
        board.push(pos(0, 2), piece(Color::A, Size::Large)).unwrap();
        assert!(!board.has_three_in_a_row(Color::B));

        board.pop(pos(0, 2));
        assert_eq!(board.winning_line(Color::B), Some([pos(0, 0), pos(0, 1), pos(0, 2)]));
    }

    #[test]
    fn test_first_line_reported() {
        let mut board = Board::new();
        // Row 0 and column 0 both belong to A
        for (row, col) in [(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)] {
            let size = if row == 0 { Size::Medium } else { Size::Small };
            board.push(pos(row, col), piece(Color::A, size)).unwrap();
        }
        assert_eq!(board.winning_line(Color::A), Some([pos(0, 0), pos(0, 1), pos(0, 2)]));
    }

    #[test]
    fn test_visibility_mask() {
        let mut board = Board::new();
        board.push(pos(0, 0), piece(Color::A, Size::Small)).unwrap();
        board.push(pos(2, 2), piece(Color::B, Size::Small)).unwrap();
        board.push(pos(2, 2), piece(Color::A, Size::Medium)).unwrap();

        assert_eq!(board.visibility_mask(Color::A), 0b1_0000_0001);
        assert_eq!(board.visibility_mask(Color::B), 0);
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        board.push(pos(0, 0), piece(Color::A, Size::Small)).unwrap();
        board.push(pos(1, 1), piece(Color::B, Size::Large)).unwrap();

        assert_eq!(board.to_string(), "AS | -- | --\n-- | BL | --\n-- | -- | --\n");
    }
}

//! Ghost silhouette of the live piece.
//!
//! The ghost marks where the piece would rest after a hard drop. It is
//! recomputed from scratch after every accepted move: clear the previous
//! silhouette, copy the piece's cells, slide the copy down as far as it
//! goes, and write ghost cells at the final spot.
//!
//! The silhouette is suppressed while the piece hovers within its own
//! height of the landing spot. The projection must first descend a number
//! of rows equal to the piece's current height; if any of those steps is
//! refused, nothing is drawn. This keeps the ghost strictly below the
//! piece, never interleaved with it.

use arrayvec::ArrayVec;
use tetrion_types::{Cell, Pos};

use crate::board::Board;
use crate::piece::Piece;
use crate::shapes;

/// Tracked ghost cells, empty whenever the silhouette is suppressed.
#[derive(Debug, Clone, Default)]
pub struct Ghost {
    cells: ArrayVec<Pos, 4>,
}

impl Ghost {
    pub fn new() -> Self {
        Ghost::default()
    }

    /// Board positions currently drawn as ghost cells.
    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Recompute the silhouette for `piece`, replacing whatever was drawn
    /// before. Returns false when the ghost is suppressed; the previous
    /// silhouette is gone either way.
    pub fn project(&mut self, board: &mut Board, piece: &Piece) -> bool {
        self.clear(board);

        let mut cells = piece.cells();
        for _ in 0..shapes::height(piece.shape(), piece.orientation()) {
            if !descend(board, &mut cells) {
                return false;
            }
        }
        while descend(board, &mut cells) {}

        for (i, &pos) in cells.iter().enumerate() {
            board.set(pos, Cell::ghost(piece.shape(), piece.orientation(), i as u8 + 1));
            self.cells.push(pos);
        }
        true
    }

    /// Erase the tracked ghost cells. Cells the live piece has since moved
    /// onto are left alone; only cells still holding ghost data are wiped.
    pub fn clear(&mut self, board: &mut Board) {
        for &pos in &self.cells {
            if matches!(board.get(pos), Some(cell) if cell.is_ghost()) {
                board.set(pos, Cell::Empty);
            }
        }
        self.cells.clear();
    }

    /// Forget the tracked cells without touching the board, for use right
    /// after the board itself was reset.
    pub fn reset(&mut self) {
        self.cells.clear();
    }
}

/// Move the candidate cells one row down if every below-neighbor outside
/// the set itself is open.
fn descend(board: &Board, cells: &mut [Pos; 4]) -> bool {
    let open = cells.iter().all(|&pos| {
        let below = pos.below();
        cells.contains(&below) || board.is_open(below)
    });
    if open {
        for pos in cells.iter_mut() {
            *pos = pos.below();
        }
    }
    open
}

//! The live falling piece.
//!
//! A [`Piece`] owns exactly four live cells on a [`Board`]. Every movement
//! follows the same copy-validate-commit discipline: candidate positions are
//! computed from a snapshot, the piece's own cells are lifted off the board,
//! the candidates are tested, and then either the candidates are committed or
//! the original cells are rewritten. A refused move leaves board and piece
//! bit-for-bit unchanged.
//!
//! Rotation walks the wall-kick candidates in table order and commits the
//! first displacement under which all four rotated cells are open. The O
//! shape has a single identity kick, so it always rotates in place.

use tetrion_types::{Cell, Orientation, Pos, Shape, Shift, Spin};

use crate::board::Board;
use crate::shapes;

/// The piece currently under player control, plus its lock bookkeeping.
///
/// Lock flags:
///
/// - `locked`: the piece's cells now belong to the board; the piece only
///   lingers so the renderer can finish the frame it locked on.
/// - `pre_locked`: the piece has landed and the short-term lock delay is
///   running. Any accepted move clears it.
/// - `hard_dropped`: a hard drop put the piece at rest; all further moves
///   are refused and the next tick locks it.
/// - `hold_requested`: the player asked to stash this piece; the swap is
///   performed by the next tick.
/// - `can_hold`: false for the piece that replaced a held one, so hold
///   cannot be chained within a single spawn.
/// - `lock_resets`: accepted moves taken while pre-locked. At the limit,
///   translates and rotates are refused and the delay runs out undisturbed.
#[derive(Debug, Clone)]
pub struct Piece {
    shape: Shape,
    orientation: Orientation,
    cells: [Pos; 4],
    id: u32,
    pub(crate) locked: bool,
    pub(crate) pre_locked: bool,
    pub(crate) hard_dropped: bool,
    pub(crate) hold_requested: bool,
    pub(crate) can_hold: bool,
    pub(crate) lock_resets: u8,
}

impl Piece {
    /// Spawn `shape` in its North orientation at vertical `slot` (each slot
    /// is two rows tall), horizontally centered per the board width.
    ///
    /// Returns `None` without touching the board if any target cell is
    /// already occupied. On success the four cells are written with a fresh
    /// id drawn from the board.
    pub fn try_spawn(shape: Shape, board: &mut Board, slot: usize) -> Option<Piece> {
        assert!((slot + 1) * 2 <= board.rows(), "spawn slot below the board");
        let row0 = shapes::spawn_row_offset(slot);
        let col0 = shapes::spawn_col_offset(shape, board.cols());

        let mut cells = [Pos::default(); 4];
        for (cell, (dr, dc)) in cells.iter_mut().zip(shapes::spawn_cells(shape)) {
            *cell = Pos::new(row0 + dr, col0 + dc);
        }
        if cells.iter().any(|&pos| !board.is_open(pos)) {
            return None;
        }

        let piece = Piece {
            shape,
            orientation: Orientation::North,
            cells,
            id: board.next_id(),
            locked: false,
            pre_locked: false,
            hard_dropped: false,
            hold_requested: false,
            can_hold: true,
            lock_resets: 0,
        };
        piece.write_cells(board);
        Some(piece)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The four board positions this piece occupies.
    pub fn cells(&self) -> [Pos; 4] {
        self.cells
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_pre_locked(&self) -> bool {
        self.pre_locked
    }

    pub fn is_hard_dropped(&self) -> bool {
        self.hard_dropped
    }

    pub fn is_hold_requested(&self) -> bool {
        self.hold_requested
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn lock_resets(&self) -> u8 {
        self.lock_resets
    }

    /// Try to move the whole piece one step in `shift`.
    ///
    /// Commits and returns true when all four shifted cells are open;
    /// otherwise restores the original cells and returns false.
    pub fn try_translate(&mut self, board: &mut Board, shift: Shift) -> bool {
        let (dr, dc) = shift.offset();
        let mut candidate = self.cells;
        for pos in &mut candidate {
            *pos = pos.shifted(dr, dc);
        }

        self.erase_cells(board);
        if candidate.iter().all(|&pos| board.is_open(pos)) {
            self.cells = candidate;
            self.write_cells(board);
            true
        } else {
            self.write_cells(board);
            false
        }
    }

    /// Try to rotate the piece one quarter turn in `spin`.
    ///
    /// Each wall-kick candidate displaces the rotated cells as a unit; the
    /// first candidate whose four cells are all open is committed and the
    /// orientation advances. When every candidate collides the original
    /// cells are restored and the orientation is unchanged.
    pub fn try_rotate(&mut self, board: &mut Board, spin: Spin) -> bool {
        let deltas = shapes::rotation_deltas(self.shape, self.orientation, spin);
        let kicks = shapes::kick_candidates(self.shape, self.orientation, spin);

        self.erase_cells(board);
        for &(kr, kc) in kicks {
            let mut candidate = self.cells;
            for (pos, &(dr, dc)) in candidate.iter_mut().zip(deltas.iter()) {
                *pos = pos.shifted(dr + kr, dc + kc);
            }
            if candidate.iter().all(|&pos| board.is_open(pos)) {
                self.cells = candidate;
                self.orientation = self.orientation.rotated(spin);
                self.write_cells(board);
                return true;
            }
        }
        self.write_cells(board);
        false
    }

    /// True when the piece can descend no further: some cell's neighbor
    /// below is off the board or occupied, own cells excluded.
    pub fn has_landed(&self, board: &Board) -> bool {
        self.cells.iter().any(|&pos| {
            let below = pos.below();
            !self.cells.contains(&below) && !board.is_open(below)
        })
    }

    /// True while the piece sits on its support but has not locked yet.
    /// The renderer dims the piece during this window.
    pub fn is_lock_delay(&self, board: &Board) -> bool {
        !self.locked && self.has_landed(board)
    }

    /// Remove the piece's cells from the board, for hold swaps and round
    /// teardown. The cell list is parked off the board afterwards so a
    /// later erase touches nothing.
    pub fn clear(&mut self, board: &mut Board) {
        self.erase_cells(board);
        self.cells = [Pos::new(-1, -1); 4];
        self.orientation = Orientation::North;
    }

    fn write_cells(&self, board: &mut Board) {
        for (i, &pos) in self.cells.iter().enumerate() {
            board.set(pos, Cell::live(self.shape, self.orientation, i as u8 + 1, self.id));
        }
    }

    fn erase_cells(&self, board: &mut Board) {
        for &pos in &self.cells {
            if matches!(board.get(pos), Some(cell) if cell.blocks()) {
                board.set(pos, Cell::Empty);
            }
        }
    }
}

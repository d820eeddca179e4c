//! Board module - the cell grid with line-clear detection and compaction.
//!
//! The board is a `rows x cols` grid of [`Cell`] occupancy records in flat
//! row-major storage. Coordinates are (row, col) with row 0 at the top.
//! The play field is 20x10; the hold and preview boxes reuse the same type
//! at small sizes, so dimensions are fixed per instance rather than per
//! type.
//!
//! Line clears are two-phase: [`Board::find_line_clears`] overwrites every
//! full row with a [`Cell::Clearing`] tag (so the renderer can flash them),
//! then [`Board::remove_line_clears`] deletes the tagged rows and feeds
//! empty rows in at the top.

use arrayvec::ArrayVec;

use tetrion_types::{Cell, ClearType, Pos};

/// The cell grid plus the piece-id counter bumped on every spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Flat row-major storage (row * cols + col).
    cells: Vec<Cell>,
    /// Id handed to the most recent spawn; 0 means no spawn yet.
    current_id: u32,
}

impl Board {
    /// Create an empty board. Dimensions must be nonzero and addressable
    /// with 16-bit coordinates.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "degenerate board size");
        assert!(rows <= i16::MAX as usize && cols <= i16::MAX as usize);
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
            current_id: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flat index for an in-bounds position.
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row < 0
            || pos.row >= self.rows as i16
            || pos.col < 0
            || pos.col >= self.cols as i16
        {
            return None;
        }
        Some(pos.row as usize * self.cols + pos.col as usize)
    }

    /// True if the position lies on the board.
    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Cell at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Write a cell. Returns false when out of bounds.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// True if `pos` is in bounds and movement into it is legal. Ghost and
    /// clearing cells do not block; only live cells do.
    pub fn is_open(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(cell) if !cell.blocks())
    }

    /// Mint the id for a new spawn.
    pub fn next_id(&mut self) -> u32 {
        self.current_id += 1;
        self.current_id
    }

    /// Id of the most recent spawn on this board.
    pub fn current_id(&self) -> u32 {
        self.current_id
    }

    /// True when every column of `row` holds a live cell.
    pub fn is_row_full(&self, row: usize) -> bool {
        debug_assert!(row < self.rows);
        let start = row * self.cols;
        self.cells[start..start + self.cols]
            .iter()
            .all(|cell| cell.blocks())
    }

    fn is_row_clearing(&self, row: usize) -> bool {
        debug_assert!(row < self.rows);
        let start = row * self.cols;
        self.cells[start..start + self.cols]
            .iter()
            .all(|cell| cell.is_clearing())
    }

    fn mark_row_clearing(&mut self, row: usize, clear: ClearType) {
        let start = row * self.cols;
        for cell in &mut self.cells[start..start + self.cols] {
            *cell = Cell::Clearing(clear);
        }
    }

    /// Scan top to bottom for full rows, grouping contiguous runs greedily
    /// into Single/Double/Triple/Tetris, and overwrite each grouped row
    /// with the matching clearing tag. Returns the group types in scan
    /// order; empty means nothing to clear.
    ///
    /// A four-cell piece touches at most four rows, so one scan can never
    /// produce more than two groups; a third is a table/state-machine
    /// defect and panics.
    pub fn find_line_clears(&mut self) -> ArrayVec<ClearType, 2> {
        let mut clears = ArrayVec::new();
        let mut row = 0;
        while row < self.rows {
            if !self.is_row_full(row) {
                row += 1;
                continue;
            }
            let mut run = 1;
            while run < 4 && row + run < self.rows && self.is_row_full(row + run) {
                run += 1;
            }
            let clear = ClearType::from_rows(run).expect("run length stays within 1-4");
            for r in row..row + run {
                self.mark_row_clearing(r, clear);
            }
            assert!(
                clears.len() < clears.capacity(),
                "more than two line-clear groups in one scan"
            );
            clears.push(clear);
            row += run;
        }
        clears
    }

    /// True while any fully clearing-tagged row is still on the board.
    pub fn has_clearing_rows(&self) -> bool {
        (0..self.rows).any(|row| self.is_row_clearing(row))
    }

    /// Delete every fully clearing-tagged row and insert an equal number of
    /// empty rows at the top, preserving the order of everything else.
    pub fn remove_line_clears(&mut self) {
        // Bottom to top; after a removal the same index holds the row that
        // was above it and must be re-checked.
        let mut row = self.rows;
        while row > 0 {
            if self.is_row_clearing(row - 1) {
                self.remove_row(row - 1);
            } else {
                row -= 1;
            }
        }
    }

    fn remove_row(&mut self, row: usize) {
        let start = row * self.cols;
        self.cells.copy_within(0..start, self.cols);
        for cell in &mut self.cells[..self.cols] {
            *cell = Cell::Empty;
        }
    }

    /// Empty every cell and restart the id counter.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::Empty;
        }
        self.current_id = 0;
    }

    /// Flat row-major view of the grid, for rendering.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetrion_types::{Orientation, Shape};

    fn live(id: u32) -> Cell {
        Cell::live(Shape::L, Orientation::North, 1, id)
    }

    fn fill_row(board: &mut Board, row: usize) {
        for col in 0..board.cols() {
            board.set(Pos::new(row as i16, col as i16), live(1));
        }
    }

    #[test]
    fn index_bounds() {
        let board = Board::new(20, 10);
        assert!(board.contains(Pos::new(0, 0)));
        assert!(board.contains(Pos::new(19, 9)));
        assert!(!board.contains(Pos::new(-1, 0)));
        assert!(!board.contains(Pos::new(20, 0)));
        assert!(!board.contains(Pos::new(0, 10)));
        assert_eq!(board.get(Pos::new(20, 0)), None);
    }

    #[test]
    fn ghost_and_clearing_cells_do_not_block() {
        let mut board = Board::new(20, 10);
        let p = Pos::new(5, 5);
        board.set(p, Cell::ghost(Shape::T, Orientation::North, 2));
        assert!(board.is_open(p));
        board.set(p, Cell::Clearing(ClearType::Single));
        assert!(board.is_open(p));
        board.set(p, live(3));
        assert!(!board.is_open(p));
        assert!(!board.is_open(Pos::new(-1, 5)));
    }

    #[test]
    fn single_full_row_is_marked_and_removed() {
        let mut board = Board::new(20, 10);
        fill_row(&mut board, 19);
        board.set(Pos::new(18, 0), live(2));

        let clears = board.find_line_clears();
        assert_eq!(clears.as_slice(), &[ClearType::Single]);
        assert!(board.get(Pos::new(19, 0)).unwrap().is_clearing());
        assert!(board.has_clearing_rows());

        board.remove_line_clears();
        assert!(!board.has_clearing_rows());
        // The survivor above dropped into the bottom row.
        assert_eq!(board.get(Pos::new(19, 0)), Some(live(2)));
        assert!(board.get(Pos::new(18, 0)).unwrap().is_empty());
    }

    #[test]
    fn contiguous_runs_group_greedily() {
        let mut board = Board::new(20, 10);
        for row in 16..20 {
            fill_row(&mut board, row);
        }
        let clears = board.find_line_clears();
        assert_eq!(clears.as_slice(), &[ClearType::Tetris]);
    }

    #[test]
    fn split_runs_make_two_groups() {
        let mut board = Board::new(20, 10);
        fill_row(&mut board, 16);
        fill_row(&mut board, 18);
        fill_row(&mut board, 19);
        board.set(Pos::new(17, 4), live(7));

        let clears = board.find_line_clears();
        assert_eq!(clears.as_slice(), &[ClearType::Single, ClearType::Double]);

        board.remove_line_clears();
        // Three rows removed, the lone survivor cell lands on the floor.
        assert_eq!(board.get(Pos::new(19, 4)), Some(live(7)));
        for row in 0..19 {
            assert!(!board.is_row_full(row));
        }
    }

    #[test]
    fn removal_preserves_row_order() {
        let mut board = Board::new(6, 4);
        // Distinct ids above and below the cleared row.
        board.set(Pos::new(3, 0), live(10));
        fill_row(&mut board, 4);
        board.set(Pos::new(5, 1), live(11));

        board.find_line_clears();
        board.remove_line_clears();

        assert_eq!(board.get(Pos::new(4, 0)), Some(live(10)));
        assert_eq!(board.get(Pos::new(5, 1)), Some(live(11)));
        assert!(board.get(Pos::new(3, 0)).unwrap().is_empty());
    }

    #[test]
    fn reset_clears_cells_and_id_counter() {
        let mut board = Board::new(20, 10);
        board.set(Pos::new(0, 0), live(1));
        assert_eq!(board.next_id(), 1);
        board.reset();
        assert_eq!(board.current_id(), 0);
        assert!(board.cells().iter().all(|c| c.is_empty()));
    }
}

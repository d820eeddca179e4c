//! Shape library - constant offset tables for the seven tetrominoes.
//!
//! Everything in this module is data: spawn layouts, per-transition rotation
//! deltas, wall-kick candidate lists and per-orientation extents, all keyed
//! by ([`Shape`], [`Orientation`], [`Spin`]). There is no geometry code; the
//! deltas are per-cell constants because each shape pivots around its own
//! center and a naive rotation matrix reproduces none of them.
//!
//! Table layout: 8 transitions per shape, indexed North/East/South/West x
//! Cw/Ccw. A rotation delta row holds one (row, col) displacement per cell
//! of the piece's ordered position list, so entry `k` always applies to the
//! piece's cell `k`. Kick rows hold 5 candidates tried in order, the first
//! always being the identity; J, L, S, T and Z share one kick table, I has
//! its own, and O only ever rotates in place.

use tetrion_types::{Orientation, Shape, Spin};

/// Per-cell (row, col) displacements for one rotation transition.
pub type RotationDeltas = [(i16, i16); 4];

type DeltaTable = [RotationDeltas; 8];
type KickTable = [[(i16, i16); 5]; 8];

/// Index of an (orientation, direction) transition into the 8-row tables.
#[inline]
fn transition(from: Orientation, spin: Spin) -> usize {
    from.index() * 2 + spin.index()
}

/// Spawn layout at orientation North, as (row, col) cells in sub-block
/// order, relative to the spawn origin.
pub fn spawn_cells(shape: Shape) -> [(i16, i16); 4] {
    match shape {
        Shape::I => [(1, 0), (1, 1), (1, 2), (1, 3)],
        Shape::J => [(0, 0), (1, 0), (1, 1), (1, 2)],
        Shape::L => [(0, 2), (1, 0), (1, 1), (1, 2)],
        Shape::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
        Shape::S => [(0, 1), (0, 2), (1, 0), (1, 1)],
        Shape::T => [(0, 1), (1, 0), (1, 1), (1, 2)],
        Shape::Z => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// Vertical extent of the shape at `orientation`, in rows (1-4).
pub fn height(shape: Shape, orientation: Orientation) -> i16 {
    let sideways = matches!(orientation, Orientation::East | Orientation::West);
    match shape {
        Shape::I => {
            if sideways {
                4
            } else {
                1
            }
        }
        Shape::O => 2,
        _ => {
            if sideways {
                3
            } else {
                2
            }
        }
    }
}

/// Horizontal extent of the shape at `orientation`, in columns (1-4).
pub fn width(shape: Shape, orientation: Orientation) -> i16 {
    let sideways = matches!(orientation, Orientation::East | Orientation::West);
    match shape {
        Shape::I => {
            if sideways {
                1
            } else {
                4
            }
        }
        Shape::O => 2,
        _ => {
            if sideways {
                2
            } else {
                3
            }
        }
    }
}

/// Spawn origin column centering the shape within `cols` columns. An even
/// board with an odd-width shape sits one column left of true center.
pub fn spawn_col_offset(shape: Shape, cols: usize) -> i16 {
    let w = width(shape, Orientation::North) as usize;
    debug_assert!(w <= cols);
    if cols % 2 == 0 && w % 2 != 0 {
        ((cols - w - 1) / 2) as i16
    } else {
        ((cols - w) / 2) as i16
    }
}

/// Spawn origin row for preview/hold slot `slot`; slot 0 is the play field.
pub fn spawn_row_offset(slot: usize) -> i16 {
    (slot * 2) as i16
}

/// Rotation deltas for `shape` leaving `from` in direction `spin`.
pub fn rotation_deltas(shape: Shape, from: Orientation, spin: Spin) -> RotationDeltas {
    let table: &DeltaTable = match shape {
        Shape::I => &I_DELTAS,
        Shape::J => &J_DELTAS,
        Shape::L => &L_DELTAS,
        Shape::O => &O_DELTAS,
        Shape::S => &S_DELTAS,
        Shape::T => &T_DELTAS,
        Shape::Z => &Z_DELTAS,
    };
    table[transition(from, spin)]
}

/// Wall-kick candidates for `shape` leaving `from` in direction `spin`,
/// in attempt order. Five candidates for everything but O, which only
/// rotates in place.
pub fn kick_candidates(shape: Shape, from: Orientation, spin: Spin) -> &'static [(i16, i16)] {
    match shape {
        Shape::O => &O_KICKS,
        Shape::I => &I_KICKS[transition(from, spin)],
        _ => &JLSTZ_KICKS[transition(from, spin)],
    }
}

const I_DELTAS: DeltaTable = [
    [(-1, 2), (0, 1), (1, 0), (2, -1)],   // North, cw
    [(2, 1), (1, 0), (0, -1), (-1, -2)],  // North, ccw
    [(2, 1), (1, 0), (0, -1), (-1, -2)],  // East, cw
    [(1, -2), (0, -1), (-1, 0), (-2, 1)], // East, ccw
    [(1, -2), (0, -1), (-1, 0), (-2, 1)], // South, cw
    [(-2, -1), (-1, 0), (0, 1), (1, 2)],  // South, ccw
    [(-2, -1), (-1, 0), (0, 1), (1, 2)],  // West, cw
    [(-1, 2), (0, 1), (1, 0), (2, -1)],   // West, ccw
];

const J_DELTAS: DeltaTable = [
    [(0, 2), (-1, 1), (0, 0), (1, -1)],   // North, cw
    [(2, 0), (1, 1), (0, 0), (-1, -1)],   // North, ccw
    [(2, 0), (1, 1), (0, 0), (-1, -1)],   // East, cw
    [(0, -2), (1, -1), (0, 0), (-1, 1)],  // East, ccw
    [(0, -2), (1, -1), (0, 0), (-1, 1)],  // South, cw
    [(-2, 0), (-1, -1), (0, 0), (1, 1)],  // South, ccw
    [(-2, 0), (-1, -1), (0, 0), (1, 1)],  // West, cw
    [(0, 2), (-1, 1), (0, 0), (1, -1)],   // West, ccw
];

const L_DELTAS: DeltaTable = [
    [(2, 0), (-1, 1), (0, 0), (1, -1)],   // North, cw
    [(0, -2), (1, 1), (0, 0), (-1, -1)],  // North, ccw
    [(0, -2), (1, 1), (0, 0), (-1, -1)],  // East, cw
    [(-2, 0), (1, -1), (0, 0), (-1, 1)],  // East, ccw
    [(-2, 0), (1, -1), (0, 0), (-1, 1)],  // South, cw
    [(0, 2), (-1, -1), (0, 0), (1, 1)],   // South, ccw
    [(0, 2), (-1, -1), (0, 0), (1, 1)],   // West, cw
    [(2, 0), (-1, 1), (0, 0), (1, -1)],   // West, ccw
];

// O never changes its cell set; the deltas shuffle the four sub-blocks
// around the square so orientation still advances.
const O_DELTAS: DeltaTable = [
    [(0, 1), (1, 0), (-1, 0), (0, -1)],   // North, cw
    [(1, 0), (0, -1), (0, 1), (-1, 0)],   // North, ccw
    [(1, 0), (0, -1), (0, 1), (-1, 0)],   // East, cw
    [(0, -1), (-1, 0), (1, 0), (0, 1)],   // East, ccw
    [(0, -1), (-1, 0), (1, 0), (0, 1)],   // South, cw
    [(-1, 0), (0, 1), (0, -1), (1, 0)],   // South, ccw
    [(-1, 0), (0, 1), (0, -1), (1, 0)],   // West, cw
    [(0, 1), (1, 0), (-1, 0), (0, -1)],   // West, ccw
];

const S_DELTAS: DeltaTable = [
    [(1, 1), (2, 0), (-1, 1), (0, 0)],    // North, cw
    [(1, -1), (0, -2), (1, 1), (0, 0)],   // North, ccw
    [(1, -1), (0, -2), (1, 1), (0, 0)],   // East, cw
    [(-1, -1), (-2, 0), (1, -1), (0, 0)], // East, ccw
    [(-1, -1), (-2, 0), (1, -1), (0, 0)], // South, cw
    [(-1, 1), (0, 2), (-1, -1), (0, 0)],  // South, ccw
    [(-1, 1), (0, 2), (-1, -1), (0, 0)],  // West, cw
    [(1, 1), (2, 0), (-1, 1), (0, 0)],    // West, ccw
];

const T_DELTAS: DeltaTable = [
    [(1, 1), (-1, 1), (0, 0), (1, -1)],   // North, cw
    [(1, -1), (1, 1), (0, 0), (-1, -1)],  // North, ccw
    [(1, -1), (1, 1), (0, 0), (-1, -1)],  // East, cw
    [(-1, -1), (1, -1), (0, 0), (-1, 1)], // East, ccw
    [(-1, -1), (1, -1), (0, 0), (-1, 1)], // South, cw
    [(-1, 1), (-1, -1), (0, 0), (1, 1)],  // South, ccw
    [(-1, 1), (-1, -1), (0, 0), (1, 1)],  // West, cw
    [(1, 1), (-1, 1), (0, 0), (1, -1)],   // West, ccw
];

const Z_DELTAS: DeltaTable = [
    [(0, 2), (1, 1), (0, 0), (1, -1)],    // North, cw
    [(2, 0), (1, -1), (0, 0), (-1, -1)],  // North, ccw
    [(2, 0), (1, -1), (0, 0), (-1, -1)],  // East, cw
    [(0, -2), (-1, -1), (0, 0), (-1, 1)], // East, ccw
    [(0, -2), (-1, -1), (0, 0), (-1, 1)], // South, cw
    [(-2, 0), (-1, 1), (0, 0), (1, 1)],   // South, ccw
    [(-2, 0), (-1, 1), (0, 0), (1, 1)],   // West, cw
    [(0, 2), (1, 1), (0, 0), (1, -1)],    // West, ccw
];

const JLSTZ_KICKS: KickTable = [
    [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],  // North, cw
    [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],     // North, ccw
    [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],    // East, cw
    [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],    // East, ccw
    [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],     // South, cw
    [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],  // South, ccw
    [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)], // West, cw
    [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)], // West, ccw
];

const I_KICKS: KickTable = [
    [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],   // North, cw
    [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],   // North, ccw
    [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],   // East, cw
    [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],   // East, ccw
    [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],   // South, cw
    [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],   // South, ccw
    [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],   // West, cw
    [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],   // West, ccw
];

const O_KICKS: [(i16, i16); 1] = [(0, 0)];

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(cells: &mut [(i16, i16); 4], deltas: RotationDeltas) {
        for (cell, delta) in cells.iter_mut().zip(deltas) {
            cell.0 += delta.0;
            cell.1 += delta.1;
        }
    }

    #[test]
    fn four_clockwise_rotations_reproduce_spawn_layout() {
        for shape in Shape::ALL {
            let spawn = spawn_cells(shape);
            let mut cells = spawn;
            let mut orientation = Orientation::North;
            for _ in 0..4 {
                apply(&mut cells, rotation_deltas(shape, orientation, Spin::Cw));
                orientation = orientation.rotate_cw();
            }
            assert_eq!(cells, spawn, "{shape:?} cw cycle drifted");
            assert_eq!(orientation, Orientation::North);
        }
    }

    #[test]
    fn four_counter_clockwise_rotations_reproduce_spawn_layout() {
        for shape in Shape::ALL {
            let spawn = spawn_cells(shape);
            let mut cells = spawn;
            let mut orientation = Orientation::North;
            for _ in 0..4 {
                apply(&mut cells, rotation_deltas(shape, orientation, Spin::Ccw));
                orientation = orientation.rotate_ccw();
            }
            assert_eq!(cells, spawn, "{shape:?} ccw cycle drifted");
        }
    }

    #[test]
    fn cw_then_ccw_is_identity_per_transition() {
        for shape in Shape::ALL {
            for from in Orientation::ALL {
                let mut cells = spawn_cells(shape);
                let before = cells;
                apply(&mut cells, rotation_deltas(shape, from, Spin::Cw));
                apply(
                    &mut cells,
                    rotation_deltas(shape, from.rotate_cw(), Spin::Ccw),
                );
                assert_eq!(cells, before, "{shape:?} from {from:?}");
            }
        }
    }

    #[test]
    fn first_kick_candidate_is_always_identity() {
        for shape in Shape::ALL {
            for from in Orientation::ALL {
                for spin in [Spin::Cw, Spin::Ccw] {
                    let kicks = kick_candidates(shape, from, spin);
                    assert_eq!(kicks[0], (0, 0));
                    let expected = if shape == Shape::O { 1 } else { 5 };
                    assert_eq!(kicks.len(), expected, "{shape:?}");
                }
            }
        }
    }

    #[test]
    fn extents_match_spawn_layout() {
        for shape in Shape::ALL {
            let cells = spawn_cells(shape);
            let rows: Vec<i16> = cells.iter().map(|c| c.0).collect();
            let cols: Vec<i16> = cells.iter().map(|c| c.1).collect();
            let row_span = rows.iter().max().unwrap() - rows.iter().min().unwrap() + 1;
            let col_span = cols.iter().max().unwrap() - cols.iter().min().unwrap() + 1;
            assert_eq!(height(shape, Orientation::North), row_span, "{shape:?}");
            assert_eq!(width(shape, Orientation::North), col_span, "{shape:?}");
        }
    }

    #[test]
    fn extents_swap_when_sideways() {
        for shape in Shape::ALL {
            assert_eq!(height(shape, Orientation::East), width(shape, Orientation::North));
            assert_eq!(width(shape, Orientation::West), height(shape, Orientation::South));
        }
    }

    #[test]
    fn spawn_column_centers_within_board_width() {
        // 10 is even and T is 3 wide: one column left of true center.
        assert_eq!(spawn_col_offset(Shape::T, 10), 3);
        assert_eq!(spawn_col_offset(Shape::I, 10), 3);
        assert_eq!(spawn_col_offset(Shape::O, 10), 4);
        // Odd board width takes true center.
        assert_eq!(spawn_col_offset(Shape::T, 11), 4);
        // Preview boxes are 4 wide.
        assert_eq!(spawn_col_offset(Shape::I, 4), 0);
        assert_eq!(spawn_col_offset(Shape::T, 4), 0);
        assert_eq!(spawn_col_offset(Shape::O, 4), 1);
    }

    #[test]
    fn preview_slots_step_two_rows() {
        assert_eq!(spawn_row_offset(0), 0);
        assert_eq!(spawn_row_offset(2), 4);
    }
}

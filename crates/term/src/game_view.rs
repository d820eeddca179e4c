//! GameView: projects a `Game` into a terminal framebuffer.
//!
//! This module is pure (no I/O), so layout and styling are unit-testable.
//! The hold and preview boxes are filled by spawning shapes into small slot
//! boards through the regular spawn path, which keeps their centering
//! identical to the play field.

use crate::core::{Board, Game, Piece};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Cell, Pos, Shape, BOARD_COLS, BOARD_ROWS, PREVIEW_MAX};

/// Rows per slot in the hold and preview boards.
const SLOT_ROWS: usize = 2;
/// Columns of a slot board, wide enough for every spawn footprint.
const SLOT_COLS: usize = 4;
/// Columns reserved for the score panel left of the play field.
const STATS_W: u16 = 12;

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const BOARD_DOT: Rgb = Rgb::new(90, 90, 100);
const GHOST_GREY: Rgb = Rgb::new(140, 140, 140);
const CLEAR_FLASH: Rgb = Rgb::new(255, 255, 255);

/// Terminal dimensions the frame is laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Lightweight renderer for the whole screen: play field, side boxes,
/// score panel, and mode captions.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    hold_board: Board,
    preview_board: Board,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the usual terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w,
            cell_h,
            hold_board: Board::new(SLOT_ROWS, SLOT_COLS),
            preview_board: Board::new(PREVIEW_MAX * SLOT_ROWS, SLOT_COLS),
        }
    }

    /// Paint one frame of the current game state.
    ///
    /// The framebuffer is resized to the viewport and fully rewritten, so
    /// callers can keep a single buffer alive across frames.
    pub fn render_into(&mut self, game: &Game, viewport: Viewport, fb: &mut FrameBuffer) {
        self.stock_side_boards(game);

        fb.resize(viewport.width, viewport.height);
        fb.clear();

        let frame_w = (BOARD_COLS as u16) * self.cell_w + 2;
        let frame_h = (BOARD_ROWS as u16) * self.cell_h + 2;
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        draw_border(fb, start_x, start_y, frame_w, frame_h);
        self.draw_play_field(game, fb, start_x, start_y);
        self.draw_side_boxes(game, fb, viewport, start_x + frame_w + 2, start_y);
        self.draw_stats(game, fb, start_x, start_y);
        draw_captions(game, fb, start_x, start_y, frame_w, frame_h);
    }

    /// Convenience wrapper that allocates a fresh framebuffer.
    pub fn render(&mut self, game: &Game, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }

    /// Respawn the hold and preview contents into their slot boards. The
    /// boxes stay blank outside a running round, so the menu and game-over
    /// screens do not advertise the next draws.
    fn stock_side_boards(&mut self, game: &Game) {
        self.hold_board.reset();
        self.preview_board.reset();
        if !game.flags().started {
            return;
        }
        if let Some(shape) = game.hold() {
            let _ = Piece::try_spawn(shape, &mut self.hold_board, 0);
        }
        for (slot, &shape) in game.bag().preview().iter().enumerate() {
            let _ = Piece::try_spawn(shape, &mut self.preview_board, slot);
        }
    }

    fn draw_play_field(&self, game: &Game, fb: &mut FrameBuffer, start_x: u16, start_y: u16) {
        let board = game.board();
        let fading_id = game
            .piece()
            .filter(|piece| piece.is_lock_delay(board))
            .map(Piece::id);

        for row in 0..BOARD_ROWS as i16 {
            for col in 0..BOARD_COLS as i16 {
                let Some(cell) = board.get(Pos::new(row, col)) else {
                    continue;
                };
                let (ch, style) = cell_visual(cell, fading_id);
                let px = start_x + 1 + (col as u16) * self.cell_w;
                let py = start_y + 1 + (row as u16) * self.cell_h;
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
            }
        }
    }

    fn draw_side_boxes(
        &self,
        game: &Game,
        fb: &mut FrameBuffer,
        viewport: Viewport,
        x: u16,
        start_y: u16,
    ) {
        let box_w = (SLOT_COLS as u16) * self.cell_w + 2;
        if x.saturating_add(box_w) > viewport.width {
            return;
        }
        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };

        fb.put_str(x + 1, start_y, "HOLD", label);
        let hold_h = (SLOT_ROWS as u16) * self.cell_h + 2;
        self.draw_slot_box(fb, &self.hold_board, SLOT_ROWS as u16, x, start_y + 1, box_w);

        let next_y = start_y + 1 + hold_h + 1;
        fb.put_str(x + 1, next_y, "NEXT", label);
        let preview_rows = (game.bag().preview_count() * SLOT_ROWS) as u16;
        self.draw_slot_box(fb, &self.preview_board, preview_rows, x, next_y + 1, box_w);
    }

    /// Draw a bordered box around the first `rows` rows of a slot board.
    fn draw_slot_box(
        &self,
        fb: &mut FrameBuffer,
        board: &Board,
        rows: u16,
        x: u16,
        y: u16,
        w: u16,
    ) {
        let h = rows * self.cell_h + 2;
        fb.fill_rect(x + 1, y + 1, w - 2, h - 2, ' ', CellStyle::new(BOARD_DOT, BOARD_BG));
        draw_border(fb, x, y, w, h);

        for row in 0..rows as i16 {
            for col in 0..SLOT_COLS as i16 {
                if let Some(Cell::Live { shape, .. }) = board.get(Pos::new(row, col)) {
                    let style = CellStyle {
                        bold: true,
                        ..CellStyle::new(shape_color(shape), BOARD_BG)
                    };
                    let px = x + 1 + (col as u16) * self.cell_w;
                    let py = y + 1 + (row as u16) * self.cell_h;
                    fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
                }
            }
        }
    }

    fn draw_stats(&self, game: &Game, fb: &mut FrameBuffer, start_x: u16, start_y: u16) {
        if start_x < STATS_W + 2 {
            return;
        }
        let x = start_x - STATS_W - 2;
        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let stats = game.stats();

        let mut y = start_y;
        for (name, amount) in [
            ("SCORE", stats.score()),
            ("LEVEL", stats.level()),
            ("LINES", stats.lines()),
        ] {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, amount, value);
            y += 3;
        }
    }
}

/// Glyph and style for one board cell. A `fading_id` marks the piece
/// sitting out its lock delay; its cells darken as a landing hint.
fn cell_visual(cell: Cell, fading_id: Option<u32>) -> (char, CellStyle) {
    match cell {
        Cell::Empty => (
            '·',
            CellStyle {
                dim: true,
                ..CellStyle::new(BOARD_DOT, BOARD_BG)
            },
        ),
        Cell::Clearing(_) => (
            '█',
            CellStyle {
                bold: true,
                ..CellStyle::new(CLEAR_FLASH, BOARD_BG)
            },
        ),
        Cell::Ghost { .. } => (
            '░',
            CellStyle {
                dim: true,
                ..CellStyle::new(GHOST_GREY, BOARD_BG)
            },
        ),
        Cell::Live { shape, id, .. } => {
            let fading = fading_id == Some(id);
            (
                '█',
                CellStyle {
                    bold: !fading,
                    dim: fading,
                    ..CellStyle::new(shape_color(shape), BOARD_BG)
                },
            )
        }
    }
}

fn shape_color(shape: Shape) -> Rgb {
    match shape {
        Shape::I => Rgb::new(80, 220, 220),
        Shape::J => Rgb::new(80, 120, 220),
        Shape::L => Rgb::new(255, 165, 0),
        Shape::O => Rgb::new(240, 220, 80),
        Shape::S => Rgb::new(100, 220, 120),
        Shape::T => Rgb::new(200, 120, 220),
        Shape::Z => Rgb::new(220, 80, 80),
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    let style = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_captions(
    game: &Game,
    fb: &mut FrameBuffer,
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
) {
    let flags = game.flags();
    let mid_y = start_y + frame_h / 2;

    if flags.paused {
        center_text(fb, start_x, frame_w, mid_y, "PAUSED");
        return;
    }
    if flags.started {
        return;
    }

    let topped_out = game.board().cells().iter().any(|cell| cell.blocks());
    if topped_out {
        center_text(fb, start_x, frame_w, mid_y.saturating_sub(1), "GAME OVER");
        center_text(fb, start_x, frame_w, mid_y + 1, "ENTER RESTARTS");
    } else {
        center_text(fb, start_x, frame_w, mid_y.saturating_sub(2), "T E T R I O N");
        draw_level_choice(fb, start_x, frame_w, mid_y, game.stats().init_level());
        center_text(fb, start_x, frame_w, mid_y + 2, "ENTER STARTS");
        center_text(fb, start_x, frame_w, mid_y + 4, "L LEVEL  Q QUIT");
    }
}

fn draw_level_choice(fb: &mut FrameBuffer, start_x: u16, frame_w: u16, y: u16, level: u32) {
    let width = 6 + digit_count(level);
    let x = start_x + frame_w.saturating_sub(width) / 2;
    fb.put_str(x, y, "LEVEL ", caption_style());
    fb.put_u32(x + 6, y, level, caption_style());
}

fn center_text(fb: &mut FrameBuffer, start_x: u16, frame_w: u16, y: u16, text: &str) {
    let text_w = text.chars().count() as u16;
    let x = start_x + frame_w.saturating_sub(text_w) / 2;
    fb.put_str(x, y, text, caption_style());
}

fn caption_style() -> CellStyle {
    CellStyle {
        bold: true,
        ..CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0))
    }
}

fn digit_count(mut n: u32) -> u16 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FrameBudget, GameAction};

    fn started(seed: u32) -> Game {
        let mut game = Game::new(seed);
        game.apply(GameAction::Confirm);
        game.tick();
        game
    }

    fn screen_text(fb: &FrameBuffer) -> String {
        let mut text = String::new();
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if let Some(cell) = fb.get(x, y) {
                    text.push(cell.ch);
                }
            }
            text.push('\n');
        }
        text
    }

    fn blocks(fb: &FrameBuffer) -> usize {
        fb.cells().iter().filter(|cell| cell.ch == '█').count()
    }

    fn dim_blocks(fb: &FrameBuffer) -> usize {
        fb.cells()
            .iter()
            .filter(|cell| cell.ch == '█' && cell.style.dim)
            .count()
    }

    const VIEW: Viewport = Viewport {
        width: 80,
        height: 24,
    };

    #[test]
    fn menu_shows_title_level_and_start_prompt() {
        let mut view = GameView::default();
        let fb = view.render(&Game::new(1), VIEW);
        let text = screen_text(&fb);
        assert!(text.contains("T E T R I O N"));
        assert!(text.contains("LEVEL 1"));
        assert!(text.contains("ENTER STARTS"));
        assert_eq!(blocks(&fb), 0);
    }

    #[test]
    fn running_game_draws_piece_ghost_and_preview() {
        let mut view = GameView::default();
        let game = started(2);
        let fb = view.render(&game, VIEW);

        // Live piece (4 cells, 2 columns each) plus three preview shapes.
        assert_eq!(blocks(&fb), 8 + 24);
        assert_eq!(fb.cells().iter().filter(|c| c.ch == '░').count(), 8);
        assert_eq!(dim_blocks(&fb), 0);
    }

    #[test]
    fn held_shape_appears_in_the_hold_box() {
        let mut view = GameView::default();
        let mut game = started(3);
        game.apply(GameAction::Hold);
        game.tick();
        game.tick();
        assert!(game.hold().is_some());

        let fb = view.render(&game, VIEW);
        assert_eq!(blocks(&fb), 8 + 24 + 8);
    }

    #[test]
    fn landed_piece_renders_darkened() {
        let mut view = GameView::default();
        let mut game = started(4);
        for _ in 0..BOARD_ROWS + 2 {
            match game.tick() {
                FrameBudget::Grace => break,
                FrameBudget::Fall(_) => {}
                other => panic!("unexpected budget {other:?}"),
            }
        }

        let fb = view.render(&game, VIEW);
        assert_eq!(dim_blocks(&fb), 8);
    }

    #[test]
    fn pause_caption_overlays_a_visible_board() {
        let mut view = GameView::default();
        let mut game = started(5);
        game.apply(GameAction::Pause);

        let fb = view.render(&game, VIEW);
        assert!(screen_text(&fb).contains("PAUSED"));
        assert_eq!(blocks(&fb), 8 + 24);
    }

    #[test]
    fn game_over_caption_offers_a_restart() {
        let mut game = started(6);
        'fill: for _ in 0..200 {
            game.apply(GameAction::HardDrop);
            loop {
                match game.tick() {
                    FrameBudget::Over => break 'fill,
                    FrameBudget::Clearing => game.remove_line_clears(),
                    FrameBudget::Fall(_) => continue 'fill,
                    FrameBudget::Now | FrameBudget::Grace => {}
                }
            }
        }
        assert!(!game.flags().started);

        let mut view = GameView::default();
        let text = screen_text(&view.render(&game, VIEW));
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("ENTER RESTARTS"));
    }
}

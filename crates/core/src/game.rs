//! The playable game: board, bag, live piece, ghost, hold slot and score
//! under one aggregate.
//!
//! All mutation funnels through two entry points, both called under the
//! driver's shared lock:
//!
//! - [`Game::apply`] handles one player action from the input thread.
//! - [`Game::tick`] advances gravity, lock resolution, hold swaps and
//!   spawning for the gravity thread, which then sleeps according to the
//!   returned [`FrameBudget`].
//!
//! A tick never sleeps. When a lock fills rows they are only marked; the
//! driver renders the marked board, holds the lock for the clear pause and
//! then calls [`Game::remove_line_clears`] to compact the stack.

use std::mem;

use tetrion_types::{
    FrameBudget, GameAction, ModeFlags, Shape, Shift, Spin, BOARD_COLS, BOARD_ROWS,
    DEFAULT_PREVIEW, LOCK_RESET_LIMIT,
};

use crate::bag::Bag;
use crate::board::Board;
use crate::ghost::Ghost;
use crate::piece::Piece;
use crate::stats::Stats;

/// One complete game, menu state included.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    bag: Bag,
    piece: Option<Piece>,
    ghost: Ghost,
    hold: Option<Shape>,
    stats: Stats,
    flags: ModeFlags,
    hold_swap_pending: bool,
}

impl Game {
    /// A game on the standard 20x10 board with the default preview window.
    pub fn new(seed: u32) -> Self {
        Self::with_preview(seed, DEFAULT_PREVIEW)
    }

    /// # Panics
    ///
    /// Panics when `preview_count` is outside 1-6.
    pub fn with_preview(seed: u32, preview_count: usize) -> Self {
        Self {
            board: Board::new(BOARD_ROWS, BOARD_COLS),
            bag: Bag::new(seed, preview_count),
            piece: None,
            ghost: Ghost::new(),
            hold: None,
            stats: Stats::default(),
            flags: ModeFlags::default(),
            hold_swap_pending: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    pub fn ghost(&self) -> &Ghost {
        &self.ghost
    }

    pub fn bag(&self) -> &Bag {
        &self.bag
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn flags(&self) -> ModeFlags {
        self.flags
    }

    /// Shape parked in the hold slot.
    pub fn hold(&self) -> Option<Shape> {
        self.hold
    }

    /// Stop both threads at their next check.
    pub fn request_exit(&mut self) {
        self.flags.exit = true;
    }

    /// Advance the game one step and report how long the gravity loop may
    /// sleep before the next one.
    ///
    /// In order: a pending hold swap retires the piece; a live piece takes
    /// its gravity step or lock resolution; otherwise the next shape
    /// spawns. Does nothing outside a running round.
    pub fn tick(&mut self) -> FrameBudget {
        if !self.flags.running() {
            return FrameBudget::Now;
        }
        match &self.piece {
            Some(piece) if !piece.locked => {
                if piece.hold_requested {
                    self.swap_hold()
                } else {
                    self.gravity_step()
                }
            }
            _ => self.spawn_next(),
        }
    }

    /// Handle one player action. Returns true when state changed in a way
    /// worth redrawing; refused and unbound actions return false.
    pub fn apply(&mut self, action: GameAction) -> bool {
        if self.flags.exit {
            return false;
        }
        if !self.flags.started {
            self.apply_menu(action)
        } else if self.flags.paused {
            self.apply_paused(action)
        } else {
            self.apply_running(action)
        }
    }

    /// Drop the rows marked by the last lock and compact the stack above
    /// them. Called by the driver once the clear pause has been shown.
    pub fn remove_line_clears(&mut self) {
        self.board.remove_line_clears();
    }

    fn apply_menu(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Confirm => {
                self.start_round();
                true
            }
            GameAction::LevelUp => {
                self.stats.raise_init_level();
                true
            }
            GameAction::Pause => {
                self.flags.exit = true;
                true
            }
            _ => false,
        }
    }

    fn apply_paused(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Confirm => {
                self.flags.paused = false;
                true
            }
            GameAction::Pause => {
                self.abort_round();
                true
            }
            _ => false,
        }
    }

    fn apply_running(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.shift_piece(Shift::Left),
            GameAction::MoveRight => self.shift_piece(Shift::Right),
            GameAction::RotateCw => self.rotate_piece(Spin::Cw),
            GameAction::RotateCcw => self.rotate_piece(Spin::Ccw),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Hold => self.request_hold(),
            GameAction::Pause => {
                self.flags.paused = true;
                true
            }
            GameAction::Confirm | GameAction::LevelUp => false,
        }
    }

    fn start_round(&mut self) {
        self.board.reset();
        self.bag.reset();
        self.stats.reset();
        self.ghost.reset();
        self.piece = None;
        self.hold = None;
        self.hold_swap_pending = false;
        self.flags.started = true;
        self.flags.paused = false;
    }

    /// Throw the round away. The stack, live piece, ghost, and hold slot
    /// are discarded so the menu comes back over an empty board.
    fn abort_round(&mut self) {
        self.board.reset();
        self.ghost.reset();
        self.piece = None;
        self.hold = None;
        self.hold_swap_pending = false;
        self.flags.paused = false;
        self.flags.started = false;
    }

    /// Stash the live piece's shape, schedule any previously held shape for
    /// the next draw, and retire the piece. Its replacement spawns on the
    /// following tick with hold disabled.
    fn swap_hold(&mut self) -> FrameBudget {
        let Some(piece) = self.piece.as_mut() else {
            return FrameBudget::Now;
        };
        let stashed = self.hold.replace(piece.shape());
        self.bag.set_hold(stashed);

        piece.clear(&mut self.board);
        piece.hold_requested = false;
        piece.locked = true;
        self.ghost.clear(&mut self.board);
        self.hold_swap_pending = true;
        FrameBudget::Now
    }

    /// One gravity descent, or the lock-delay bookkeeping when the piece
    /// cannot fall.
    fn gravity_step(&mut self) -> FrameBudget {
        let Some(piece) = self.piece.as_mut() else {
            return FrameBudget::Now;
        };
        if piece.try_translate(&mut self.board, Shift::Down) {
            let landed = piece.has_landed(&self.board);
            piece.pre_locked = landed;
            self.ghost.project(&mut self.board, piece);
            return if landed {
                FrameBudget::Grace
            } else {
                FrameBudget::Fall(self.stats.fall_interval_ms())
            };
        }
        if !piece.pre_locked {
            piece.pre_locked = true;
            return FrameBudget::Grace;
        }
        self.lock_piece()
    }

    /// Commit the piece where it lies and mark any full rows. Marked rows
    /// stay on the board until the driver sweeps them.
    fn lock_piece(&mut self) -> FrameBudget {
        if let Some(piece) = self.piece.as_mut() {
            piece.locked = true;
            piece.pre_locked = false;
        }
        self.ghost.clear(&mut self.board);

        let clears = self.board.find_line_clears();
        if clears.is_empty() {
            return FrameBudget::Now;
        }
        for &clear in &clears {
            self.stats.line_clear(clear);
        }
        FrameBudget::Clearing
    }

    /// Draw and spawn the next shape. A blocked spawn ends the round with
    /// the board left standing for the game-over screen.
    fn spawn_next(&mut self) -> FrameBudget {
        let shape = self.bag.next();
        let can_hold = !mem::take(&mut self.hold_swap_pending);
        match Piece::try_spawn(shape, &mut self.board, 0) {
            Some(mut piece) => {
                piece.can_hold = can_hold;
                self.ghost.project(&mut self.board, &piece);
                self.piece = Some(piece);
                FrameBudget::Fall(self.stats.fall_interval_ms())
            }
            None => {
                self.flags.started = false;
                self.hold = None;
                FrameBudget::Over
            }
        }
    }

    fn shift_piece(&mut self, shift: Shift) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        if piece.locked || piece.hard_dropped || piece.lock_resets >= LOCK_RESET_LIMIT {
            return false;
        }
        if !piece.try_translate(&mut self.board, shift) {
            return false;
        }
        if piece.pre_locked {
            piece.lock_resets += 1;
            piece.pre_locked = false;
        }
        self.ghost.project(&mut self.board, piece);
        true
    }

    fn rotate_piece(&mut self, spin: Spin) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        if piece.locked || piece.hard_dropped || piece.lock_resets >= LOCK_RESET_LIMIT {
            return false;
        }
        if !piece.try_rotate(&mut self.board, spin) {
            return false;
        }
        if piece.pre_locked {
            piece.lock_resets += 1;
            piece.pre_locked = false;
        }
        self.ghost.project(&mut self.board, piece);
        true
    }

    fn soft_drop(&mut self) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        if piece.locked {
            return false;
        }
        if !piece.try_translate(&mut self.board, Shift::Down) {
            return false;
        }
        self.stats.soft_drop();
        self.ghost.project(&mut self.board, piece);
        true
    }

    fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        if piece.locked || piece.hard_dropped {
            return false;
        }
        while piece.try_translate(&mut self.board, Shift::Down) {}
        piece.hard_dropped = true;
        piece.pre_locked = true;
        self.stats.hard_drop();
        self.ghost.project(&mut self.board, piece);
        true
    }

    fn request_hold(&mut self) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        if piece.locked || piece.hard_dropped || !piece.can_hold || piece.hold_requested {
            return false;
        }
        piece.hold_requested = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetrion_types::{Cell, Orientation, Pos};

    fn fill_row_except(game: &mut Game, row: i16, skip: &[i16]) {
        for col in 0..BOARD_COLS as i16 {
            if !skip.contains(&col) {
                game.board.set(
                    Pos::new(row, col),
                    Cell::live(Shape::L, Orientation::North, 1, 77),
                );
            }
        }
    }

    fn started(seed: u32) -> Game {
        let mut game = Game::new(seed);
        assert!(game.apply(GameAction::Confirm));
        assert!(matches!(game.tick(), FrameBudget::Fall(_)));
        game
    }

    fn tick_until_grace(game: &mut Game) {
        for _ in 0..BOARD_ROWS + 2 {
            if game.tick() == FrameBudget::Grace {
                return;
            }
        }
        panic!("piece never reached its lock delay");
    }

    #[test]
    fn confirm_starts_and_spawns() {
        let game = started(1);
        assert!(game.flags().started);
        let piece = game.piece().unwrap();
        assert_eq!(game.bag().current(), Some(piece.shape()));
        assert_eq!(game.bag().preview().len(), DEFAULT_PREVIEW);
        assert_eq!(
            game.board().cells().iter().filter(|c| c.blocks()).count(),
            4
        );
    }

    #[test]
    fn gravity_reaches_the_floor_then_locks() {
        let mut game = started(2);
        tick_until_grace(&mut game);
        let piece = game.piece().unwrap();
        assert!(piece.is_pre_locked());
        assert!(piece.has_landed(game.board()));

        // Expired grace: the next tick commits the lock, the one after spawns.
        assert_eq!(game.tick(), FrameBudget::Now);
        assert!(game.piece().unwrap().is_locked());
        assert!(matches!(game.tick(), FrameBudget::Fall(_)));
        assert!(!game.piece().unwrap().is_locked());
        assert_eq!(game.piece().unwrap().id(), 2);
    }

    #[test]
    fn accepted_moves_extend_the_lock_delay_ten_times() {
        let mut game = started(3);
        tick_until_grace(&mut game);

        for i in 0..u32::from(LOCK_RESET_LIMIT) {
            let action = if i % 2 == 0 {
                GameAction::MoveLeft
            } else {
                GameAction::MoveRight
            };
            assert!(game.apply(action), "move {i} should be accepted");
            assert!(!game.piece().unwrap().is_pre_locked());
            assert_eq!(game.tick(), FrameBudget::Grace);
        }

        assert_eq!(game.piece().unwrap().lock_resets(), LOCK_RESET_LIMIT);
        assert!(!game.apply(GameAction::MoveLeft));
        assert!(!game.apply(GameAction::RotateCw));
    }

    #[test]
    fn hard_drop_scores_flat_and_locks_next_tick() {
        let mut game = started(4);
        assert!(game.apply(GameAction::HardDrop));
        assert_eq!(game.stats().score(), 2);

        let piece = game.piece().unwrap();
        assert!(piece.is_hard_dropped());
        assert!(piece.is_pre_locked());
        assert!(!game.apply(GameAction::MoveLeft));
        assert!(!game.apply(GameAction::HardDrop));

        assert_eq!(game.tick(), FrameBudget::Now);
        assert!(game.piece().unwrap().is_locked());
    }

    #[test]
    fn soft_drop_scores_per_row() {
        let mut game = started(5);
        assert!(game.apply(GameAction::SoftDrop));
        assert!(game.apply(GameAction::SoftDrop));
        assert!(game.apply(GameAction::SoftDrop));
        assert_eq!(game.stats().score(), 3);
    }

    #[test]
    fn hold_swaps_and_refuses_a_second_swap() {
        let mut game = started(6);
        let first = game.piece().unwrap().shape();

        assert!(game.apply(GameAction::Hold));
        assert_eq!(game.tick(), FrameBudget::Now);
        assert_eq!(game.hold(), Some(first));

        assert!(matches!(game.tick(), FrameBudget::Fall(_)));
        assert!(!game.piece().unwrap().can_hold());
        assert!(!game.apply(GameAction::Hold));

        // Lock the replacement; the piece after it may hold again and
        // receives the stashed shape back on the swap.
        assert!(game.apply(GameAction::HardDrop));
        assert_eq!(game.tick(), FrameBudget::Now);
        assert!(matches!(game.tick(), FrameBudget::Fall(_)));
        let third = game.piece().unwrap().shape();
        assert!(game.piece().unwrap().can_hold());

        assert!(game.apply(GameAction::Hold));
        assert_eq!(game.tick(), FrameBudget::Now);
        assert!(matches!(game.tick(), FrameBudget::Fall(_)));
        assert_eq!(game.piece().unwrap().shape(), first);
        assert_eq!(game.hold(), Some(third));
    }

    #[test]
    fn single_clear_marks_pauses_then_compacts() {
        let mut game = Game::new(1);
        assert!(game.apply(GameAction::Confirm));
        fill_row_except(&mut game, 19, &[4, 5]);
        game.piece = Piece::try_spawn(Shape::O, &mut game.board, 0);

        assert!(game.apply(GameAction::HardDrop));
        assert_eq!(game.tick(), FrameBudget::Clearing);
        assert_eq!(game.stats().lines(), 1);
        assert_eq!(game.stats().score(), 2 + 100);
        assert!(game.board().has_clearing_rows());

        game.remove_line_clears();
        assert!(!game.board().has_clearing_rows());
        let live: Vec<(i16, i16)> = (0..BOARD_ROWS as i16)
            .flat_map(|r| (0..BOARD_COLS as i16).map(move |c| (r, c)))
            .filter(|&(r, c)| {
                game.board()
                    .get(Pos::new(r, c))
                    .is_some_and(|cell| cell.blocks())
            })
            .collect();
        assert_eq!(live, vec![(19, 4), (19, 5)]);
    }

    #[test]
    fn blocked_spawn_ends_the_round() {
        let mut game = Game::new(7);
        assert!(game.apply(GameAction::Confirm));
        fill_row_except(&mut game, 0, &[]);
        fill_row_except(&mut game, 1, &[]);

        assert_eq!(game.tick(), FrameBudget::Over);
        assert!(!game.flags().started);
        assert_eq!(game.hold(), None);
    }

    #[test]
    fn pause_freezes_play_until_resumed() {
        let mut game = started(8);
        let before = game.piece().unwrap().cells();

        assert!(game.apply(GameAction::Pause));
        assert!(game.flags().paused);
        assert!(!game.apply(GameAction::MoveLeft));
        assert!(!game.apply(GameAction::SoftDrop));
        assert_eq!(game.tick(), FrameBudget::Now);
        assert_eq!(game.piece().unwrap().cells(), before);

        assert!(game.apply(GameAction::Confirm));
        assert!(!game.flags().paused);
        assert!(game.apply(GameAction::MoveLeft));
    }

    #[test]
    fn pausing_twice_aborts_to_the_menu() {
        let mut game = started(9);
        assert!(game.apply(GameAction::Pause));
        assert!(game.apply(GameAction::Pause));
        assert!(!game.flags().started);

        // The round is gone: no piece, no hold, an empty board.
        assert!(game.piece().is_none());
        assert!(game.hold().is_none());
        assert!(game.board().cells().iter().all(|cell| cell.is_empty()));

        // Menu actions work again.
        assert!(game.apply(GameAction::LevelUp));
        assert_eq!(game.stats().init_level(), 2);
    }

    #[test]
    fn menu_escape_requests_exit() {
        let mut game = Game::new(10);
        assert!(game.apply(GameAction::Pause));
        assert!(game.flags().exit);
        assert!(!game.apply(GameAction::Confirm));
    }

    #[test]
    fn restart_rebuilds_a_fresh_round() {
        let mut game = started(11);
        assert!(game.apply(GameAction::HardDrop));
        assert_eq!(game.tick(), FrameBudget::Now);
        assert!(game.apply(GameAction::Pause));
        assert!(game.apply(GameAction::Pause));

        assert!(game.apply(GameAction::Confirm));
        assert_eq!(game.stats().score(), 0);
        assert_eq!(game.hold(), None);
        assert!(game.board().cells().iter().all(|c| c.is_empty()));
        assert!(matches!(game.tick(), FrameBudget::Fall(_)));
        assert_eq!(game.piece().unwrap().id(), 1);
    }
}

//! Game engine - pure, deterministic, and testable
//!
//! This crate holds every game rule and nothing else: no terminal, no I/O,
//! no clocks. The driving binary owns the threads and the sleeps; the
//! engine just advances state under whatever lock the driver provides.
//!
//! # Module Structure
//!
//! - [`board`]: 20x10 cell grid with line-clear marking and compaction
//! - [`shapes`]: constant spawn layouts, rotation deltas and wall kicks
//! - [`piece`]: the live piece with copy-validate-commit movement
//! - [`ghost`]: hard-drop silhouette projection
//! - [`bag`]: 7-bag shape queue, preview window and hold delivery
//! - [`stats`]: score, lines, level and the gravity interval
//! - [`game`]: the aggregate tying all of the above to player actions
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every run of seven draws holds each shape once
//! - **Wall Kicks**: per-orientation kick candidates for everything but O
//! - **Lock Delay**: 500ms once a piece lands, extended by accepted moves
//!   up to a limit of 10, after which moves are refused
//! - **Ghost Piece**: shown only when it fits strictly below the piece
//! - **Hold**: stash the live piece once per spawn, swap on the next draw
//! - **Scoring**: 1 per soft-dropped row, flat 2 per hard drop, and
//!   100/300/500/800 times the level per clear group
//!
//! # Example
//!
//! ```
//! use tetrion_core::Game;
//! use tetrion_types::{FrameBudget, GameAction};
//!
//! let mut game = Game::new(12345);
//! game.apply(GameAction::Confirm); // start a round from the menu
//! assert!(matches!(game.tick(), FrameBudget::Fall(_))); // first spawn
//!
//! game.apply(GameAction::MoveRight);
//! game.apply(GameAction::HardDrop);
//! assert_eq!(game.stats().score(), 2); // hard drops score a flat 2
//! ```

pub mod bag;
pub mod board;
pub mod game;
pub mod ghost;
pub mod piece;
pub mod shapes;
pub mod stats;

pub use tetrion_types as types;

// Re-export commonly used types for convenience
pub use bag::{Bag, SimpleRng};
pub use board::Board;
pub use game::Game;
pub use ghost::Ghost;
pub use piece::Piece;
pub use stats::Stats;

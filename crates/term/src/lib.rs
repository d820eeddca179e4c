//! Terminal front end: framebuffer, diff renderer, and game view.
//!
//! Rendering is split the way a small game engine would split it:
//! `game_view` projects game state into a styled character framebuffer,
//! and `renderer` flushes framebuffers to the terminal through crossterm.
//! Nothing in this crate mutates game state, so the view can be driven
//! from any thread that holds the game lock.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetrion_core as core;
pub use tetrion_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_changes, encode_frame, TerminalRenderer};

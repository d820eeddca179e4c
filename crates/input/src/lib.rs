//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::GameAction`] values; the
//! engine decides what each action means in the current mode. One keypress
//! is one action, with no auto-repeat handling of its own, so the terminal's
//! native key repeat sets the movement cadence.

pub mod map;

pub use tetrion_types as types;

pub use map::{handle_key_event, should_quit};

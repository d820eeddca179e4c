//! Tetrion (workspace facade crate).
//!
//! This package keeps the `tetrion::{core,input,term,types}` public API in
//! one place while the implementation lives in dedicated crates under
//! `crates/`.

pub use tetrion_core as core;
pub use tetrion_input as input;
pub use tetrion_term as term;
pub use tetrion_types as types;

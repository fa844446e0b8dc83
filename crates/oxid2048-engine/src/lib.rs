//! Core rules of a sliding-tile merge game.
//!
//! - [`core`]: grid, directions and the pure slide operation
//! - [`engine`]: spawning, game modes and the authoritative [`GameSession`]

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

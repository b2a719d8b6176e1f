//! Per-frame game simulation
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One step per display frame, velocities in pixels per frame
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies; effect requests are
//!   buffered as events and drained by the shell

pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_rect_overlap, resolve_circle_rect};
pub use grid::GridLayout;
pub use state::{
    Ball, Brick, BrickKind, GameEvent, GamePhase, GameState, Paddle, PowerUp, PowerUpKind,
    SoundCue, Tuning,
};
pub use tick::{TickInput, tick};

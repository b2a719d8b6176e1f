//! Brickwave - a full-screen arcade brick breaker
//!
//! Core modules:
//! - `sim`: per-frame simulation (collisions, power-ups, rounds, lives, score)
//! - `music`: step-driven background music sequencer
//! - `audio`: Web Audio synthesis for effect cues and music notes (wasm only)
//! - `render`: Canvas 2D drawing, a pure consumer of sim state (wasm only)

pub mod highscores;
pub mod music;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
///
/// Velocities are in pixels per display frame; the simulation advances one
/// step per animation frame rather than by wall-clock delta.
pub mod consts {
    /// Thickness of the left/right/top playfield border
    pub const WALL_THICKNESS: f32 = 10.0;

    /// Lives at the start of a run
    pub const START_LIVES: u8 = 3;

    /// Serve position above the bottom edge
    pub const SERVE_OFFSET_BOTTOM: f32 = 60.0;
    /// Ball speed for a respawned serve after a lost life
    pub const BALL_SERVE_SPEED: f32 = 4.0;
    /// Screen width below which the slower launch speed is used
    pub const SLOW_LAUNCH_WIDTH: f32 = 600.0;
    /// Launch speeds for wide and narrow screens
    pub const BALL_LAUNCH_SPEED: f32 = 6.0;
    pub const BALL_LAUNCH_SPEED_NARROW: f32 = 4.0;
    /// Per-round speed multiplier applied to every active ball on round clear
    pub const ROUND_SPEEDUP: f32 = 1.1;

    /// Horizontal velocity per pixel of offset from the paddle center
    pub const PADDLE_DEFLECT_FACTOR: f32 = 0.15;
    /// Minimum |dx| after a paddle bounce so the ball never goes vertical
    pub const PADDLE_MIN_DX: f32 = 2.0;

    /// Power-up drop probability on brick destruction
    pub const POWERUP_DROP_CHANCE: f64 = 0.15;
    /// Power-up fall speed (pixels per frame)
    pub const POWERUP_FALL_SPEED: f32 = 3.0;

    /// Chance for a grid cell to be a reinforced brick
    pub const REINFORCED_CHANCE: f64 = 0.15;
    /// Point value of a normal brick
    pub const NORMAL_BRICK_VALUE: u64 = 100;
    /// Per-round point value of a reinforced brick
    pub const REINFORCED_VALUE_PER_ROUND: u64 = 50;

    /// Expand power-up: width multiplier and cap as a fraction of screen width
    pub const EXPAND_FACTOR: f32 = 1.5;
    pub const EXPAND_MAX_RATIO: f32 = 0.3;
    /// Slow power-up: scale applied to velocity components above the threshold
    pub const SLOW_FACTOR: f32 = 0.6;
    pub const SLOW_THRESHOLD: f32 = 2.0;
}

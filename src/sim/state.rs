//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::grid::{self, GridLayout};
use crate::consts::*;

/// Current phase of gameplay
///
/// Exactly one phase is active at a time; the simulation only advances in
/// `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start overlay shown, waiting for user interaction
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, final score frozen
    GameOver,
}

/// Fire-and-forget sound effect requests emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Brick destroyed
    BrickBreak,
    /// Reinforced brick took a hit
    ReinforcedHit,
    /// Ball bounced off the paddle
    PaddleBounce,
    /// Ball bounced off a wall
    WallBounce,
    /// Power-up caught by the paddle
    PowerUpCollect,
    /// Ball lost below the paddle
    Death,
    /// Run ended
    GameOver,
    /// Round cleared
    Win,
}

/// Effect requests consumed by external collaborators (audio, screens)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundCue),
    MusicStart,
    MusicStop,
}

/// A ball entity
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            active: true,
        }
    }
}

/// Brick toughness classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickKind {
    /// Destroyed on first contact
    Normal,
    /// Requires multiple contacts, tougher in later rounds
    Reinforced,
}

/// A grid cell brick
///
/// Bricks are never removed from the grid vector during a round; destruction
/// clears `alive` so grid indices stay stable.
#[derive(Debug, Clone, Copy)]
pub struct Brick {
    pub col: u32,
    pub row: u32,
    /// Screen position, recomputed on grid build and resize
    pub x: f32,
    pub y: f32,
    pub alive: bool,
    pub kind: BrickKind,
    /// Remaining contacts before destruction
    pub hits: u8,
    pub value: u64,
    /// Packed 0xRRGGBB display color
    pub color: u32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Widen the paddle
    Expand,
    /// Slow fast balls down
    Slow,
    /// Split an active ball into three
    MultiBall,
    /// One extra life
    ExtraLife,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Expand,
        PowerUpKind::Slow,
        PowerUpKind::MultiBall,
        PowerUpKind::ExtraLife,
    ];

    /// Capsule letter shown on the falling pickup
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Expand => "E",
            PowerUpKind::Slow => "S",
            PowerUpKind::MultiBall => "M",
            PowerUpKind::ExtraLife => "P",
        }
    }

    /// Packed 0xRRGGBB capsule color
    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Expand => 0x00AAFF,
            PowerUpKind::Slow => 0xFFAA00,
            PowerUpKind::MultiBall => 0x00FF00,
            PowerUpKind::ExtraLife => 0xAAAAAA,
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, Copy)]
pub struct PowerUp {
    /// Top-left corner of the capsule
    pub pos: Vec2,
    /// Vertical fall speed (pixels per frame)
    pub fall_speed: f32,
    pub kind: PowerUpKind,
    pub active: bool,
}

/// The player's paddle
///
/// Width is mutable via the Expand power-up and decays back to the default on
/// life loss and resize. Height and vertical position are fixed per profile.
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
}

/// Layout profile, chosen from the canvas dimensions
///
/// Small screens get a thicker paddle, a narrower grid, and larger pickups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub paddle_height: f32,
    pub paddle_width_ratio: f32,
    pub ball_radius_ratio: f32,
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_padding: f32,
    pub brick_offset_top: f32,
    pub brick_offset_left: f32,
    pub brick_height: f32,
    pub powerup_width: f32,
    pub powerup_height: f32,
    /// Distance of the paddle from the bottom edge
    pub paddle_lift: f32,
}

impl Tuning {
    pub const DESKTOP: Tuning = Tuning {
        paddle_height: 32.0,
        paddle_width_ratio: 0.15,
        ball_radius_ratio: 0.012,
        brick_rows: 8,
        brick_cols: 10,
        brick_padding: 8.0,
        brick_offset_top: 50.0,
        brick_offset_left: 35.0,
        brick_height: 25.0,
        powerup_width: 60.0,
        powerup_height: 30.0,
        paddle_lift: 40.0,
    };

    pub const MOBILE: Tuning = Tuning {
        paddle_height: 36.0,
        paddle_width_ratio: 0.25,
        ball_radius_ratio: 0.025,
        brick_rows: 10,
        brick_cols: 6,
        brick_padding: 5.0,
        brick_offset_top: 100.0,
        brick_offset_left: 10.0,
        brick_height: 30.0,
        powerup_width: 70.0,
        powerup_height: 35.0,
        paddle_lift: 80.0,
    };

    /// Pick the profile for a playfield size
    pub fn for_size(width: f32, height: f32) -> Self {
        if width <= 600.0 || height <= 600.0 {
            Tuning::MOBILE
        } else {
            Tuning::DESKTOP
        }
    }
}

/// Complete game state, owned by a single controller
#[derive(Debug, Clone)]
pub struct GameState {
    /// Playfield dimensions
    pub width: f32,
    pub height: f32,
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub layout: GridLayout,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub round: u32,
    pub paddle: Paddle,
    /// Derived from screen width, floor of 4px
    pub ball_radius: f32,
    /// Top edge of the paddle band
    pub paddle_y: f32,
    pub balls: Vec<Ball>,
    pub power_ups: Vec<PowerUp>,
    pub bricks: Vec<Brick>,
    /// Buffered effect requests, drained once per frame by the shell
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
}

impl GameState {
    /// Create a new game state showing the start overlay
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let tuning = Tuning::for_size(width, height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let (bricks, layout) = grid::build(&tuning, width, 1, &mut rng);

        let paddle_width = width * tuning.paddle_width_ratio;
        Self {
            width,
            height,
            seed,
            tuning,
            layout,
            phase: GamePhase::Start,
            score: 0,
            lives: START_LIVES,
            round: 1,
            paddle: Paddle {
                x: (width - paddle_width) / 2.0,
                width: paddle_width,
            },
            ball_radius: ball_radius_for(width, &tuning),
            paddle_y: height - tuning.paddle_lift,
            balls: Vec::new(),
            power_ups: Vec::new(),
            bricks,
            events: Vec::new(),
            rng,
        }
    }

    /// Default paddle width for the current screen
    pub fn default_paddle_width(&self) -> f32 {
        self.width * self.tuning.paddle_width_ratio
    }

    /// Launch speed for a fresh run on the current screen
    pub fn launch_speed(&self) -> f32 {
        if self.width < SLOW_LAUNCH_WIDTH {
            BALL_LAUNCH_SPEED_NARROW
        } else {
            BALL_LAUNCH_SPEED
        }
    }

    /// Full reset: new run, phase moves to Playing
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.round = 1;
        self.power_ups.clear();

        self.paddle.width = self.default_paddle_width();
        self.paddle.x = (self.width - self.paddle.width) / 2.0;

        let speed = self.launch_speed();
        let dir = self.random_sign();
        self.balls.clear();
        self.balls.push(Ball::new(
            Vec2::new(self.width / 2.0, self.height - SERVE_OFFSET_BOTTOM),
            Vec2::new(speed * dir, -speed),
        ));

        self.rebuild_grid();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::MusicStart);
    }

    /// Adapt to a new canvas size mid-run
    ///
    /// The layout profile may flip between desktop and mobile; brick pixel
    /// positions and derived dimensions are recomputed, the paddle width drops
    /// back to its default, and the paddle is kept on screen.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.tuning = Tuning::for_size(width, height);
        self.paddle_y = height - self.tuning.paddle_lift;
        self.ball_radius = ball_radius_for(width, &self.tuning);
        self.paddle.width = self.default_paddle_width();
        if self.paddle.x + self.paddle.width > width {
            self.paddle.x = width - self.paddle.width;
        }
        self.layout = grid::relayout(&mut self.bricks, &self.tuning, width);
    }

    /// Rebuild the brick grid for the current round
    pub fn rebuild_grid(&mut self) {
        let (bricks, layout) = grid::build(&self.tuning, self.width, self.round, &mut self.rng);
        self.bricks = bricks;
        self.layout = layout;
    }

    /// Spawn a fresh serve ball after a lost life
    pub fn spawn_serve_ball(&mut self) {
        let dir = self.random_sign();
        self.balls.push(Ball::new(
            Vec2::new(self.width / 2.0, self.height - SERVE_OFFSET_BOTTOM),
            Vec2::new(BALL_SERVE_SPEED * dir, -BALL_SERVE_SPEED),
        ));
    }

    /// Clamp the paddle to the playfield
    pub fn clamp_paddle(&mut self) {
        if self.paddle.x < 0.0 {
            self.paddle.x = 0.0;
        }
        if self.paddle.x + self.paddle.width > self.width {
            self.paddle.x = self.width - self.paddle.width;
        }
    }

    /// Number of bricks still alive
    pub fn alive_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    /// Drain buffered effect requests
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn random_sign(&mut self) -> f32 {
        if self.rng.random::<bool>() { 1.0 } else { -1.0 }
    }
}

fn ball_radius_for(width: f32, tuning: &Tuning) -> f32 {
    (width * tuning.ball_radius_ratio).max(4.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_on_overlay() {
        let state = GameState::new(1280.0, 800.0, 7);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.round, 1);
        assert!(state.balls.is_empty());
        assert_eq!(
            state.bricks.len(),
            (state.tuning.brick_cols * state.tuning.brick_rows) as usize
        );
    }

    #[test]
    fn reset_spawns_single_ball_moving_up() {
        let mut state = GameState::new(1280.0, 800.0, 7);
        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].vel.y < 0.0);
        assert_eq!(state.balls[0].vel.x.abs(), state.launch_speed());
        assert!(state.events.contains(&GameEvent::MusicStart));
    }

    #[test]
    fn narrow_screen_uses_mobile_profile_and_slow_launch() {
        let state = GameState::new(480.0, 800.0, 7);
        assert_eq!(state.tuning, Tuning::MOBILE);
        assert_eq!(state.launch_speed(), BALL_LAUNCH_SPEED_NARROW);
    }

    #[test]
    fn resize_resets_paddle_width_and_keeps_it_on_screen() {
        let mut state = GameState::new(1280.0, 800.0, 7);
        state.reset();
        state.paddle.width *= 2.0;
        state.paddle.x = 1200.0;
        state.resize(700.0, 700.0);
        assert_eq!(state.paddle.width, state.default_paddle_width());
        assert!(state.paddle.x + state.paddle.width <= state.width);
    }
}

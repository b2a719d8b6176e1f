//! The per-frame simulation tick
//!
//! Advances every moving entity one display frame: brick collisions, round
//! progression, falling power-ups, ball movement, and lives bookkeeping, in
//! that order.

use glam::Vec2;
use rand::Rng;

use super::collision::{Rect, circle_rect_overlap, resolve_circle_rect};
use super::state::{Ball, BrickKind, GameEvent, GamePhase, GameState, PowerUp, PowerUpKind, SoundCue};
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Absolute paddle center target (pointer position)
    pub paddle_x: Option<f32>,
    /// Relative paddle movement (touch drag)
    pub paddle_dx: Option<f32>,
    /// User interaction: start a new run from the start or game-over overlay
    pub start: bool,
}

/// Advance the game state by one display frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.start && matches!(state.phase, GamePhase::Start | GamePhase::GameOver) {
        state.reset();
        return;
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    if let Some(x) = input.paddle_x {
        state.paddle.x = x - state.paddle.width / 2.0;
        state.clamp_paddle();
    }
    if let Some(dx) = input.paddle_dx {
        state.paddle.x += dx;
        state.clamp_paddle();
    }

    brick_collisions(state);
    round_clear_check(state);
    update_power_ups(state);
    update_balls(state);
    life_loss_check(state);
}

/// Test every active ball against every alive brick
///
/// No spatial partitioning and no early exit per ball: a single ball may
/// resolve against several bricks in one pass. A brick stops taking contacts
/// the moment it is destroyed.
fn brick_collisions(state: &mut GameState) {
    let radius = state.ball_radius;
    let mut drop_sites: Vec<Vec2> = Vec::new();

    for bi in 0..state.bricks.len() {
        if !state.bricks[bi].alive {
            continue;
        }
        let rect = Rect::new(
            state.bricks[bi].x,
            state.bricks[bi].y,
            state.layout.brick_w,
            state.layout.brick_h,
        );

        for li in 0..state.balls.len() {
            if !state.balls[li].active {
                continue;
            }
            let ball = &mut state.balls[li];
            if !circle_rect_overlap(ball.pos, radius, &rect) {
                continue;
            }
            resolve_circle_rect(&mut ball.pos, &mut ball.vel, radius, &rect);

            let brick = &mut state.bricks[bi];
            if brick.kind == BrickKind::Reinforced {
                brick.hits = brick.hits.saturating_sub(1);
                state.events.push(GameEvent::Sound(SoundCue::ReinforcedHit));
                if brick.hits > 0 {
                    continue;
                }
            }

            brick.alive = false;
            state.score += brick.value;
            state.events.push(GameEvent::Sound(SoundCue::BrickBreak));
            drop_sites.push(rect.center());
            break;
        }
    }

    for center in drop_sites {
        maybe_spawn_power_up(state, center);
    }
}

/// Probabilistically drop a power-up centered on a destroyed brick
fn maybe_spawn_power_up(state: &mut GameState, brick_center: Vec2) {
    if !state.rng.random_bool(POWERUP_DROP_CHANCE) {
        return;
    }
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    state.power_ups.push(PowerUp {
        pos: Vec2::new(
            brick_center.x - state.tuning.powerup_width / 2.0,
            brick_center.y,
        ),
        fall_speed: POWERUP_FALL_SPEED,
        kind,
        active: true,
    });
}

/// On a cleared grid: advance the round, rebuild, and speed up the balls
fn round_clear_check(state: &mut GameState) {
    if state.bricks.iter().any(|b| b.alive) {
        return;
    }
    state.events.push(GameEvent::MusicStop);
    state.events.push(GameEvent::Sound(SoundCue::Win));
    state.round += 1;
    state.rebuild_grid();
    for ball in state.balls.iter_mut() {
        ball.vel *= ROUND_SPEEDUP;
    }
}

/// Advance falling power-ups; collect on paddle contact, expire off-screen
fn update_power_ups(state: &mut GameState) {
    state.power_ups.retain(|p| p.active);

    let paddle_rect = Rect::new(
        state.paddle.x,
        state.paddle_y,
        state.paddle.width,
        state.tuning.paddle_height,
    );
    let mut collected: Vec<PowerUpKind> = Vec::new();

    for p in state.power_ups.iter_mut() {
        p.pos.y += p.fall_speed;

        let capsule = Rect::new(
            p.pos.x,
            p.pos.y,
            state.tuning.powerup_width,
            state.tuning.powerup_height,
        );
        if capsule.intersects(&paddle_rect) {
            p.active = false;
            collected.push(p.kind);
        } else if p.pos.y > state.height {
            p.active = false;
        }
    }

    for kind in collected {
        apply_power_up(state, kind);
    }
}

fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    state.events.push(GameEvent::Sound(SoundCue::PowerUpCollect));
    match kind {
        PowerUpKind::Expand => {
            state.paddle.width =
                (state.paddle.width * EXPAND_FACTOR).min(state.width * EXPAND_MAX_RATIO);
            state.clamp_paddle();
        }
        PowerUpKind::Slow => {
            for ball in state.balls.iter_mut() {
                if ball.vel.x.abs() > SLOW_THRESHOLD {
                    ball.vel.x *= SLOW_FACTOR;
                }
                if ball.vel.y.abs() > SLOW_THRESHOLD {
                    ball.vel.y *= SLOW_FACTOR;
                }
            }
        }
        PowerUpKind::MultiBall => {
            if let Some(template) = state.balls.iter().find(|b| b.active).copied() {
                state.balls.push(Ball::new(
                    template.pos,
                    Vec2::new(template.vel.x, -template.vel.y),
                ));
                state.balls.push(Ball::new(
                    template.pos,
                    Vec2::new(-template.vel.x, template.vel.y),
                ));
            }
        }
        PowerUpKind::ExtraLife => {
            state.lives = state.lives.saturating_add(1);
        }
    }
}

/// Move balls: wall and paddle bounces, bottom-edge loss, then integrate
fn update_balls(state: &mut GameState) {
    state.balls.retain(|b| b.active);

    let radius = state.ball_radius;
    let width = state.width;
    let height = state.height;
    let paddle = state.paddle;
    let paddle_y = state.paddle_y;
    let paddle_height = state.tuning.paddle_height;

    for ball in state.balls.iter_mut() {
        // Side walls: reflect on the predicted position
        let next_x = ball.pos.x + ball.vel.x;
        if next_x > width - WALL_THICKNESS - radius || next_x < WALL_THICKNESS + radius {
            ball.vel.x = -ball.vel.x;
            state.events.push(GameEvent::Sound(SoundCue::WallBounce));
        }

        if ball.pos.y + ball.vel.y < WALL_THICKNESS + radius {
            // Top wall
            ball.vel.y = -ball.vel.y;
            state.events.push(GameEvent::Sound(SoundCue::WallBounce));
        } else if ball.vel.y > 0.0
            && ball.pos.y + radius >= paddle_y - ball.vel.y
            && ball.pos.y - radius <= paddle_y + paddle_height
            && ball.pos.x >= paddle.x
            && ball.pos.x <= paddle.x + paddle.width
        {
            // Paddle: force upward, snap to the top edge, redirect by offset
            // from the paddle center
            ball.vel.y = -ball.vel.y.abs();
            ball.pos.y = paddle_y - radius;
            state.events.push(GameEvent::Sound(SoundCue::PaddleBounce));

            let offset = ball.pos.x - (paddle.x + paddle.width / 2.0);
            ball.vel.x = offset * PADDLE_DEFLECT_FACTOR;
            if ball.vel.x.abs() < PADDLE_MIN_DX {
                ball.vel.x = PADDLE_MIN_DX * if ball.vel.x < 0.0 { -1.0 } else { 1.0 };
            }
        } else if ball.pos.y + ball.vel.y > height - radius {
            // Past the paddle
            ball.active = false;
        }

        ball.pos += ball.vel;
    }
}

/// When no balls remain: lose a life, end the run or serve a fresh ball
fn life_loss_check(state: &mut GameState) {
    if state.balls.iter().any(|b| b.active) {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::Sound(SoundCue::Death));

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::MusicStop);
        state.events.push(GameEvent::Sound(SoundCue::GameOver));
    } else {
        state.paddle.width = state.default_paddle_width();
        state.paddle.x = (state.width - state.paddle.width) / 2.0;
        state.spawn_serve_ball();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Brick;
    use proptest::prelude::*;

    const W: f32 = 1280.0;
    const H: f32 = 800.0;

    fn playing_state() -> GameState {
        let mut state = GameState::new(W, H, 12345);
        state.reset();
        state.take_events();
        state
    }

    /// Replace the grid with a single hand-built brick
    fn with_single_brick(state: &mut GameState, x: f32, y: f32, kind: BrickKind, hits: u8, value: u64) {
        state.layout.brick_w = 50.0;
        state.layout.brick_h = 20.0;
        state.bricks = vec![Brick {
            col: 0,
            row: 0,
            x,
            y,
            alive: true,
            kind,
            hits,
            value,
            color: 0xFF0000,
        }];
    }

    #[test]
    fn start_input_begins_a_run() {
        let mut state = GameState::new(W, H, 1);
        assert_eq!(state.phase, GamePhase::Start);
        tick(&mut state, &TickInput { start: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn normal_brick_destroyed_after_exactly_one_contact() {
        let mut state = playing_state();
        with_single_brick(&mut state, 100.0, 100.0, BrickKind::Normal, 1, 100);
        state.ball_radius = 5.0;
        state.balls = vec![Ball::new(Vec2::new(100.0, 100.0), Vec2::new(0.0, 5.0))];

        brick_collisions(&mut state);

        assert!(!state.bricks[0].alive);
        assert_eq!(state.score, 100);
        assert!(state.balls[0].vel.y < 0.0);
        assert!(state
            .events
            .contains(&GameEvent::Sound(SoundCue::BrickBreak)));
    }

    #[test]
    fn reinforced_brick_takes_exactly_n_contacts() {
        let n = 3u8;
        let mut state = playing_state();
        with_single_brick(&mut state, 100.0, 100.0, BrickKind::Reinforced, n, 150);
        state.ball_radius = 5.0;

        for contact in 1..=n {
            // Re-seat the ball on the brick for each contact
            state.balls = vec![Ball::new(Vec2::new(125.0, 98.0), Vec2::new(0.0, 5.0))];
            brick_collisions(&mut state);
            if contact < n {
                assert!(state.bricks[0].alive, "destroyed after {contact} contacts");
                assert_eq!(state.score, 0);
            }
        }

        assert!(!state.bricks[0].alive);
        assert_eq!(state.score, 150);
        // Every contact sounds the hit; the destroying one also sounds the break
        assert_eq!(
            state
                .events
                .iter()
                .filter(|e| **e == GameEvent::Sound(SoundCue::ReinforcedHit))
                .count(),
            n as usize
        );
        assert!(state
            .events
            .contains(&GameEvent::Sound(SoundCue::BrickBreak)));
    }

    #[test]
    fn round_clear_rebuilds_grid_and_speeds_up_balls() {
        let mut state = playing_state();
        let vel_before = state.balls[0].vel;
        for brick in state.bricks.iter_mut() {
            brick.alive = false;
        }
        assert_eq!(state.alive_bricks(), 0);

        round_clear_check(&mut state);

        assert_eq!(state.round, 2);
        assert_eq!(state.alive_bricks(), state.bricks.len());
        assert_eq!(state.balls[0].vel, vel_before * ROUND_SPEEDUP);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::MusicStop));
        assert!(events.contains(&GameEvent::Sound(SoundCue::Win)));
    }

    #[test]
    fn last_life_lost_transitions_to_game_over_with_frozen_score() {
        let mut state = playing_state();
        state.lives = 1;
        state.score = 4200;
        state.balls.clear();

        life_loss_check(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(state.score, 4200);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::Death)));
        assert!(events.contains(&GameEvent::Sound(SoundCue::GameOver)));
        assert!(events.contains(&GameEvent::MusicStop));
    }

    #[test]
    fn life_loss_recenters_paddle_and_serves_new_ball() {
        let mut state = playing_state();
        state.lives = 3;
        state.paddle.width *= 1.5;
        state.paddle.x = 0.0;
        state.balls.clear();

        life_loss_check(&mut state);

        assert_eq!(state.lives, 2);
        assert_eq!(state.paddle.width, state.default_paddle_width());
        assert_eq!(
            state.paddle.x,
            (state.width - state.paddle.width) / 2.0
        );
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].vel.y < 0.0);
    }

    #[test]
    fn multi_ball_triples_the_active_ball() {
        let mut state = playing_state();
        state.balls = vec![Ball::new(Vec2::new(400.0, 400.0), Vec2::new(3.0, -4.0))];

        apply_power_up(&mut state, PowerUpKind::MultiBall);

        assert_eq!(state.balls.iter().filter(|b| b.active).count(), 3);
        assert_eq!(state.balls[1].pos, Vec2::new(400.0, 400.0));
        assert_eq!(state.balls[1].vel, Vec2::new(3.0, 4.0));
        assert_eq!(state.balls[2].pos, Vec2::new(400.0, 400.0));
        assert_eq!(state.balls[2].vel, Vec2::new(-3.0, -4.0));
    }

    #[test]
    fn expand_is_capped_at_a_fraction_of_the_screen() {
        let mut state = playing_state();
        for _ in 0..10 {
            apply_power_up(&mut state, PowerUpKind::Expand);
        }
        assert_eq!(state.paddle.width, state.width * EXPAND_MAX_RATIO);
    }

    #[test]
    fn slow_only_touches_fast_components() {
        let mut state = playing_state();
        state.balls = vec![
            Ball::new(Vec2::new(400.0, 400.0), Vec2::new(5.0, -1.0)),
            Ball::new(Vec2::new(500.0, 400.0), Vec2::new(-1.5, 6.0)),
        ];

        apply_power_up(&mut state, PowerUpKind::Slow);

        assert_eq!(state.balls[0].vel, Vec2::new(5.0 * SLOW_FACTOR, -1.0));
        assert_eq!(state.balls[1].vel, Vec2::new(-1.5, 6.0 * SLOW_FACTOR));
    }

    #[test]
    fn extra_life_increments_lives() {
        let mut state = playing_state();
        apply_power_up(&mut state, PowerUpKind::ExtraLife);
        assert_eq!(state.lives, START_LIVES + 1);
    }

    #[test]
    fn power_up_is_collected_by_the_paddle() {
        let mut state = playing_state();
        state.balls[0].pos = Vec2::new(200.0, 300.0); // Keep the ball out of the way
        state.paddle.x = 500.0;
        state.power_ups.push(PowerUp {
            pos: Vec2::new(510.0, state.paddle_y - 1.0),
            fall_speed: POWERUP_FALL_SPEED,
            kind: PowerUpKind::ExtraLife,
            active: true,
        });

        update_power_ups(&mut state);

        assert!(!state.power_ups[0].active);
        assert_eq!(state.lives, START_LIVES + 1);
        assert!(state
            .events
            .contains(&GameEvent::Sound(SoundCue::PowerUpCollect)));
    }

    #[test]
    fn power_up_expires_below_the_playfield() {
        let mut state = playing_state();
        state.power_ups.push(PowerUp {
            pos: Vec2::new(100.0, H + 1.0),
            fall_speed: POWERUP_FALL_SPEED,
            kind: PowerUpKind::Expand,
            active: true,
        });
        let width_before = state.paddle.width;

        update_power_ups(&mut state);

        assert!(!state.power_ups[0].active);
        assert_eq!(state.paddle.width, width_before);
    }

    #[test]
    fn ball_below_the_paddle_is_deactivated() {
        let mut state = playing_state();
        state.paddle.x = 0.0; // Ball falls far from the paddle
        state.balls = vec![Ball::new(
            Vec2::new(W - 100.0, H - state.ball_radius),
            Vec2::new(0.0, 4.0),
        )];

        update_balls(&mut state);

        assert!(!state.balls[0].active);
    }

    #[test]
    fn power_up_spawn_rate_converges_to_drop_chance() {
        let mut state = playing_state();
        let trials = 100_000;
        let mut spawned = 0u32;
        for _ in 0..trials {
            state.power_ups.clear();
            maybe_spawn_power_up(&mut state, Vec2::new(100.0, 100.0));
            if !state.power_ups.is_empty() {
                spawned += 1;
            }
        }
        let rate = spawned as f64 / trials as f64;
        assert!(
            (rate - POWERUP_DROP_CHANCE).abs() < 0.005,
            "observed rate {rate}"
        );
    }

    #[test]
    fn deterministic_for_equal_seeds() {
        let mut a = GameState::new(W, H, 999);
        let mut b = GameState::new(W, H, 999);
        let inputs = [
            TickInput { start: true, ..Default::default() },
            TickInput { paddle_x: Some(300.0), ..Default::default() },
            TickInput::default(),
            TickInput { paddle_dx: Some(-20.0), ..Default::default() },
        ];
        for input in &inputs {
            tick(&mut a, input);
            tick(&mut b, input);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.balls.len(), b.balls.len());
        assert_eq!(a.balls[0].pos, b.balls[0].pos);
        assert_eq!(a.paddle.x, b.paddle.x);
    }

    proptest! {
        /// Side-wall reflection strictly reverses the horizontal component
        /// and preserves its magnitude.
        #[test]
        fn wall_reflection_reverses_dx(dx in 2.0f32..8.0, dy in -6.0f32..-1.0) {
            let mut state = playing_state();
            state.paddle.x = 0.0;
            let radius = state.ball_radius;
            state.balls = vec![Ball::new(
                Vec2::new(W - WALL_THICKNESS - radius - 0.5, 400.0),
                Vec2::new(dx, dy),
            )];

            update_balls(&mut state);

            prop_assert_eq!(state.balls[0].vel.x, -dx);
            prop_assert_eq!(state.balls[0].vel.y, dy);
        }

        /// After a paddle bounce the ball always moves upward, regardless of
        /// where on the paddle it lands.
        #[test]
        fn paddle_bounce_always_sends_ball_upward(
            offset in -0.49f32..0.49,
            dy in 1.0f32..8.0,
        ) {
            let mut state = playing_state();
            state.paddle.x = (W - state.paddle.width) / 2.0;
            let hit_x = state.paddle.x + state.paddle.width * (0.5 + offset);
            state.balls = vec![Ball::new(
                Vec2::new(hit_x, state.paddle_y - state.ball_radius + 0.1),
                Vec2::new(0.0, dy),
            )];

            update_balls(&mut state);

            let ball = &state.balls[0];
            prop_assert!(ball.vel.y <= 0.0);
            // Horizontal speed never drops below the clamp
            prop_assert!(ball.vel.x.abs() >= PADDLE_MIN_DX - 1e-3);
        }
    }
}

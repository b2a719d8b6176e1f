//! Canvas 2D rendering
//!
//! A pure consumer of simulation state: draws one complete frame per call and
//! holds no gameplay data of its own. HUD overlays (start and game-over
//! screens) live in the DOM and are toggled by the shell, not drawn here.

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::WALL_THICKNESS;
use crate::sim::{GameState, PowerUp};

const BACKGROUND: &str = "#05060f";
const WALL_COLOR: &str = "#2a2f4a";
const BALL_COLOR: &str = "#f5f5f5";
const HUD_COLOR: &str = "#e0e0e0";

/// Pack a 0xRRGGBB color into a CSS hex string
fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0xFFFFFF)
}

/// Darken a packed color channel-wise
fn darken(rgb: u32, factor: f32) -> u32 {
    let scale = |c: u32| ((c as f32 * factor) as u32).min(255);
    (scale((rgb >> 16) & 0xFF) << 16) | (scale((rgb >> 8) & 0xFF) << 8) | scale(rgb & 0xFF)
}

/// Canvas renderer bound to a single 2D context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Grab the 2D context from a canvas
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        use wasm_bindgen::JsCast;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    /// Draw one full frame
    pub fn draw(&self, state: &GameState, top_score: Option<u64>) {
        self.draw_background(state);
        self.draw_walls(state);
        self.draw_bricks(state);
        self.draw_power_ups(state);
        self.draw_balls(state);
        self.draw_paddle(state);
        self.draw_hud(state, top_score);
    }

    fn draw_background(&self, state: &GameState) {
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx
            .fill_rect(0.0, 0.0, state.width as f64, state.height as f64);
    }

    fn draw_walls(&self, state: &GameState) {
        let w = state.width as f64;
        let h = state.height as f64;
        let t = WALL_THICKNESS as f64;
        self.ctx.set_fill_style_str(WALL_COLOR);
        self.ctx.fill_rect(0.0, 0.0, t, h);
        self.ctx.fill_rect(w - t, 0.0, t, h);
        self.ctx.fill_rect(0.0, 0.0, w, t);
    }

    fn draw_bricks(&self, state: &GameState) {
        let bw = state.layout.brick_w as f64;
        let bh = state.layout.brick_h as f64;
        for brick in state.bricks.iter().filter(|b| b.alive) {
            self.ctx.set_fill_style_str(&css_color(brick.color));
            self.ctx.fill_rect(brick.x as f64, brick.y as f64, bw, bh);

            // Bevel strip along the bottom edge
            self.ctx
                .set_fill_style_str(&css_color(darken(brick.color, 0.5)));
            self.ctx
                .fill_rect(brick.x as f64, brick.y as f64 + bh - 3.0, bw, 3.0);

            // Damaged reinforced bricks get a crack line
            if brick.hits > 1 {
                continue;
            }
            if brick.kind == crate::sim::BrickKind::Reinforced {
                self.ctx
                    .set_stroke_style_str(&css_color(darken(brick.color, 0.4)));
                self.ctx.begin_path();
                self.ctx.move_to(brick.x as f64 + bw * 0.3, brick.y as f64);
                self.ctx
                    .line_to(brick.x as f64 + bw * 0.5, brick.y as f64 + bh * 0.6);
                self.ctx
                    .line_to(brick.x as f64 + bw * 0.7, brick.y as f64 + bh);
                self.ctx.stroke();
            }
        }
    }

    fn draw_power_ups(&self, state: &GameState) {
        let pw = state.tuning.powerup_width as f64;
        let ph = state.tuning.powerup_height as f64;
        for p in state.power_ups.iter().filter(|p| p.active) {
            self.draw_capsule(p, pw, ph);
        }
    }

    fn draw_capsule(&self, p: &PowerUp, pw: f64, ph: f64) {
        let x = p.pos.x as f64;
        let y = p.pos.y as f64;

        self.ctx.set_fill_style_str(&css_color(p.kind.color()));
        self.ctx.fill_rect(x, y, pw, ph);
        self.ctx
            .set_stroke_style_str(&css_color(darken(p.kind.color(), 0.5)));
        self.ctx.stroke_rect(x, y, pw, ph);

        self.ctx.set_fill_style_str("#101010");
        self.ctx.set_font("bold 18px monospace");
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let _ = self
            .ctx
            .fill_text(p.kind.label(), x + pw / 2.0, y + ph / 2.0);
    }

    fn draw_balls(&self, state: &GameState) {
        self.ctx.set_fill_style_str(BALL_COLOR);
        for ball in state.balls.iter().filter(|b| b.active) {
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                ball.pos.x as f64,
                ball.pos.y as f64,
                state.ball_radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            self.ctx.fill();
        }
    }

    fn draw_paddle(&self, state: &GameState) {
        let x = state.paddle.x as f64;
        let y = state.paddle_y as f64;
        let w = state.paddle.width as f64;
        let h = state.tuning.paddle_height as f64;

        let gradient = self.ctx.create_linear_gradient(x, y, x, y + h);
        let _ = gradient.add_color_stop(0.0, "#00e5ff");
        let _ = gradient.add_color_stop(1.0, "#0077aa");
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn draw_hud(&self, state: &GameState, top_score: Option<u64>) {
        let t = WALL_THICKNESS as f64;
        self.ctx.set_fill_style_str(HUD_COLOR);
        self.ctx.set_font("16px monospace");
        self.ctx.set_text_baseline("top");

        self.ctx.set_text_align("left");
        let _ = self
            .ctx
            .fill_text(&format!("Score: {}", state.score), t + 8.0, t + 6.0);

        self.ctx.set_text_align("center");
        let _ = self.ctx.fill_text(
            &format!("Round {}", state.round),
            state.width as f64 / 2.0,
            t + 6.0,
        );

        self.ctx.set_text_align("right");
        let mut right = format!("Lives: {}", state.lives);
        if let Some(best) = top_score {
            right = format!("Best: {}   {}", best, right);
        }
        let _ = self
            .ctx
            .fill_text(&right, state.width as f64 - t - 8.0, t + 6.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_color_is_zero_padded() {
        assert_eq!(css_color(0xFF0000), "#ff0000");
        assert_eq!(css_color(0x0000AA), "#0000aa");
        assert_eq!(css_color(0x01), "#000001");
    }

    #[test]
    fn darken_scales_each_channel() {
        assert_eq!(darken(0xFF8800, 0.5), 0x7F4400);
        assert_eq!(darken(0x000000, 0.5), 0x000000);
    }
}

//! Brick grid construction and pixel layout
//!
//! The grid is laid out once per round into a fixed column x row pattern and
//! fully rebuilt on round advance and game reset; no brick state persists
//! across rounds. Pixel positions are part of the grid itself rather than a
//! per-frame render derivation, so hit-testing and drawing always agree.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Brick, BrickKind, Tuning};
use crate::consts::*;

/// Row-cycled brick colors (packed 0xRRGGBB)
const ROW_COLORS: [u32; 8] = [
    0xFF0000, 0xFF9900, 0xFFFF00, 0x00FF00, 0x0099FF, 0xFF00FF, 0xFFFFFF, 0xFFD700,
];

/// Silver tone for reinforced bricks
const REINFORCED_COLOR: u32 = 0xC0C0C0;

/// Shared brick dimensions for the current grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub brick_w: f32,
    pub brick_h: f32,
}

/// Width of one brick given the playfield width and profile
fn brick_width(tuning: &Tuning, width: f32) -> f32 {
    let cols = tuning.brick_cols as f32;
    (width - tuning.brick_offset_left * 2.0 - tuning.brick_padding * (cols - 1.0)) / cols
}

fn cell_position(tuning: &Tuning, layout: &GridLayout, col: u32, row: u32) -> (f32, f32) {
    let x = tuning.brick_offset_left + col as f32 * (layout.brick_w + tuning.brick_padding);
    let y = tuning.brick_offset_top + row as f32 * (layout.brick_h + tuning.brick_padding);
    (x, y)
}

/// Build a fresh grid for the given round
///
/// Reinforced bricks are assigned per cell with a fixed probability; their hit
/// count and point value scale with the round number.
pub fn build(
    tuning: &Tuning,
    width: f32,
    round: u32,
    rng: &mut Pcg32,
) -> (Vec<Brick>, GridLayout) {
    let layout = GridLayout {
        brick_w: brick_width(tuning, width),
        brick_h: tuning.brick_height,
    };

    let mut bricks = Vec::with_capacity((tuning.brick_cols * tuning.brick_rows) as usize);
    for col in 0..tuning.brick_cols {
        for row in 0..tuning.brick_rows {
            let (x, y) = cell_position(tuning, &layout, col, row);
            let brick = if rng.random_bool(REINFORCED_CHANCE) {
                Brick {
                    col,
                    row,
                    x,
                    y,
                    alive: true,
                    kind: BrickKind::Reinforced,
                    hits: u8::try_from(2 + round / 5).unwrap_or(u8::MAX),
                    value: REINFORCED_VALUE_PER_ROUND * round as u64,
                    color: REINFORCED_COLOR,
                }
            } else {
                Brick {
                    col,
                    row,
                    x,
                    y,
                    alive: true,
                    kind: BrickKind::Normal,
                    hits: 1,
                    value: NORMAL_BRICK_VALUE,
                    color: ROW_COLORS[row as usize % ROW_COLORS.len()],
                }
            };
            bricks.push(brick);
        }
    }

    (bricks, layout)
}

/// Recompute pixel positions for an existing grid after a canvas resize
///
/// The grid keeps its column count from when it was built, so a profile flip
/// mid-round only changes spacing, not the brick population.
pub fn relayout(bricks: &mut [Brick], tuning: &Tuning, width: f32) -> GridLayout {
    let cols = bricks.iter().map(|b| b.col + 1).max().unwrap_or(1);
    let cols_f = cols as f32;
    let brick_w = (width - tuning.brick_offset_left * 2.0 - tuning.brick_padding * (cols_f - 1.0))
        / cols_f;
    let layout = GridLayout {
        brick_w,
        brick_h: tuning.brick_height,
    };

    for brick in bricks.iter_mut() {
        let (x, y) = cell_position(tuning, &layout, brick.col, brick.row);
        brick.x = x;
        brick.y = y;
    }

    layout
}

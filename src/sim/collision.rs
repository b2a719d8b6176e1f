//! Circle-vs-rectangle collision detection and response
//!
//! Detection finds the closest point on the rectangle to the ball center and
//! compares squared distance against the ball radius. Resolution compares
//! penetration depth per axis; the axis with the smaller overlap is the
//! collision normal.

use glam::Vec2;

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Closest point on this rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        )
    }

    /// Axis-aligned overlap test against another rectangle
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.w
            && self.x + self.w >= other.x
            && self.y <= other.y + other.h
            && self.y + self.h >= other.y
    }
}

/// True if a circle overlaps the rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Resolve a circle-vs-rectangle collision in place
///
/// Flips the velocity component along the axis of least penetration and pushes
/// the circle out by the overlap amount. Call only after `circle_rect_overlap`
/// reported a hit.
pub fn resolve_circle_rect(pos: &mut Vec2, vel: &mut Vec2, radius: f32, rect: &Rect) {
    let center = rect.center();
    let overlap_x = (rect.w / 2.0 + radius) - (pos.x - center.x).abs();
    let overlap_y = (rect.h / 2.0 + radius) - (pos.y - center.y).abs();

    if overlap_x < overlap_y {
        vel.x = -vel.x;
        pos.x += if pos.x < center.x { -overlap_x } else { overlap_x };
    } else {
        vel.y = -vel.y;
        pos.y += if pos.y < center.y { -overlap_y } else { overlap_y };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn overlap_detects_edge_contact() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        // Ball centered just above the top edge, overlapping by 1px
        assert!(circle_rect_overlap(Vec2::new(120.0, 96.0), 5.0, &rect));
        // Ball clear of the rectangle
        assert!(!circle_rect_overlap(Vec2::new(120.0, 90.0), 5.0, &rect));
        // Corner case: diagonal distance just outside the radius
        assert!(!circle_rect_overlap(Vec2::new(96.0, 96.0), 5.0, &rect));
    }

    #[test]
    fn resolve_flips_vertical_axis_when_hit_from_above() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        let mut pos = Vec2::new(125.0, 98.0);
        let mut vel = Vec2::new(1.0, 5.0);
        resolve_circle_rect(&mut pos, &mut vel, 5.0, &rect);
        assert_eq!(vel, Vec2::new(1.0, -5.0));
        // Pushed back out above the brick
        assert!(pos.y < 98.0);
    }

    #[test]
    fn resolve_flips_horizontal_axis_when_hit_from_side() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        let mut pos = Vec2::new(98.0, 110.0);
        let mut vel = Vec2::new(4.0, 0.5);
        resolve_circle_rect(&mut pos, &mut vel, 5.0, &rect);
        assert_eq!(vel, Vec2::new(-4.0, 0.5));
        assert!(pos.x < 98.0);
    }

    #[test]
    fn rect_intersects_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(8.0, 8.0, 10.0, 10.0);
        let c = Rect::new(30.0, 30.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    proptest! {
        /// Resolution always preserves speed on both axes (a pure sign flip
        /// on one component).
        #[test]
        fn resolve_preserves_component_magnitudes(
            px in 80.0f32..170.0,
            py in 90.0f32..130.0,
            vx in -8.0f32..8.0,
            vy in -8.0f32..8.0,
        ) {
            let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
            prop_assume!(circle_rect_overlap(Vec2::new(px, py), 5.0, &rect));
            let mut pos = Vec2::new(px, py);
            let mut vel = Vec2::new(vx, vy);
            resolve_circle_rect(&mut pos, &mut vel, 5.0, &rect);
            prop_assert!((vel.x.abs() - vx.abs()).abs() < 1e-6);
            prop_assert!((vel.y.abs() - vy.abs()).abs() < 1e-6);
            // Exactly one component flipped
            prop_assert!((vel.x == -vx) ^ (vel.y == -vy) || vx == 0.0 || vy == 0.0);
        }
    }
}

//! Collision detection and response for bubbles
//!
//! Walls are axis-aligned viewport edges; bubble pairs are circles whose hit
//! margin is inflated by the moving bubble's speed so fast bubbles can't tunnel.

use glam::Vec2;

use super::state::{Bubble, Viewport};
use crate::consts::NORMAL_EPSILON;
use crate::error::{NormalizationFailedSnafu, Result};
use crate::settings::Physics;

/// Which walls a bubble bounced off during one check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    /// Top or bottom edge
    pub vertical: bool,
    /// Left or right edge
    pub horizontal: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.vertical || self.horizontal
    }
}

/// Clamp a bubble back inside the viewport and bounce it.
///
/// Each axis is checked independently, so a corner hit corrects both. Within
/// an axis only one edge can fire. The bounced component is negated and both
/// components are scaled by `friction`.
pub fn wall_check(bubble: &mut Bubble, viewport: Viewport, friction: f32) -> WallHits {
    let size = viewport.size();
    let r = bubble.radius;
    let mut hits = WallHits::default();

    // bottom & top
    if bubble.pos.y + r > size.y {
        bubble.pos.y = size.y - r;
        bubble.vel *= Vec2::new(friction, -friction);
        hits.vertical = true;
    } else if bubble.pos.y - r < 0.0 {
        bubble.pos.y = r;
        bubble.vel *= Vec2::new(friction, -friction);
        hits.vertical = true;
    }

    // sides
    if bubble.pos.x + r > size.x {
        bubble.pos.x = size.x - r;
        bubble.vel *= Vec2::new(-friction, friction);
        hits.horizontal = true;
    } else if bubble.pos.x - r < 0.0 {
        bubble.pos.x = r;
        bubble.vel *= Vec2::new(-friction, friction);
        hits.horizontal = true;
    }

    hits
}

/// Position-only clamp into `[r, extent - r]` on both axes
#[inline]
pub fn contain(bubble: &mut Bubble, viewport: Viewport) {
    let r = Vec2::splat(bubble.radius);
    bubble.pos = bubble.pos.clamp(r, viewport.size() - r);
}

/// Whether `bubble` (moving at `speed`) is close enough to `other` to bounce
#[inline]
pub fn bubbles_touch(bubble: &Bubble, other: &Bubble, speed: f32) -> bool {
    bubble.pos.distance(other.pos) < bubble.radius + other.radius + speed
}

/// Unit vector from `other` toward `bubble`.
///
/// Fails when the centers coincide, since the direction is then undefined.
pub fn collision_normal(bubble: &Bubble, other: &Bubble) -> Result<Vec2> {
    let delta = bubble.pos - other.pos;
    let distance = delta.length();
    if distance < NORMAL_EPSILON {
        return NormalizationFailedSnafu { distance }.fail();
    }
    Ok(delta / distance)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce `bubble` off `other`, handing part of the bounce to `other`.
///
/// `bubble` is reflected across `normal`, nudged `speed` pixels along it and
/// damped by `ball_friction`. `other` loses `energy_transfer / other.mass` of
/// that new velocity. Neither momentum nor energy is conserved.
pub fn resolve_bubble_collision(
    bubble: &mut Bubble,
    other: &mut Bubble,
    normal: Vec2,
    speed: f32,
    physics: &Physics,
) {
    let reflected = reflect_velocity(bubble.vel, normal) * physics.ball_friction;

    bubble.pos += normal * speed;
    bubble.vel = reflected;

    other.vel -= reflected * physics.energy_transfer / other.mass;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BubbleError;

    fn bubble(x: f32, y: f32, vx: f32, vy: f32) -> Bubble {
        Bubble::new(Vec2::new(x, y), Vec2::new(vx, vy), 10.0, 10.0)
    }

    #[test]
    fn test_wall_check_left_edge() {
        let mut b = bubble(4.0, 50.0, -1.0, 0.0);
        let hits = wall_check(&mut b, Viewport::new(800, 600), 1.0);

        assert!(hits.horizontal && !hits.vertical);
        assert_eq!(b.pos.x, 10.0);
        assert_eq!(b.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_wall_check_bottom_edge() {
        let mut b = bubble(400.0, 595.0, 2.0, 3.0);
        let hits = wall_check(&mut b, Viewport::new(800, 600), 1.0);

        assert!(hits.vertical && !hits.horizontal);
        assert_eq!(b.pos.y, 590.0);
        assert_eq!(b.vel, Vec2::new(2.0, -3.0));
    }

    #[test]
    fn test_wall_check_corner_hits_both_axes() {
        let mut b = bubble(795.0, 2.0, 3.0, -4.0);
        let hits = wall_check(&mut b, Viewport::new(800, 600), 1.0);

        assert!(hits.vertical && hits.horizontal);
        assert_eq!(b.pos, Vec2::new(790.0, 10.0));
        assert_eq!(b.vel, Vec2::new(-3.0, 4.0));
    }

    #[test]
    fn test_wall_check_friction_scales_both_components() {
        let mut b = bubble(400.0, 598.0, 2.0, 4.0);
        wall_check(&mut b, Viewport::new(800, 600), 0.5);
        assert_eq!(b.vel, Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_wall_check_inside_is_noop() {
        let mut b = bubble(400.0, 300.0, 2.0, 4.0);
        let before = b;
        let hits = wall_check(&mut b, Viewport::new(800, 600), 0.5);
        assert!(!hits.any());
        assert_eq!(b, before);
    }

    #[test]
    fn test_contain_clamps_position_only() {
        let mut b = bubble(-3.0, 700.0, -1.0, 1.0);
        contain(&mut b, Viewport::new(800, 600));
        assert_eq!(b.pos, Vec2::new(10.0, 590.0));
        assert_eq!(b.vel, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_touch_margin_grows_with_speed() {
        let a = bubble(100.0, 100.0, 0.0, 0.0);
        let b = bubble(120.5, 100.0, 0.0, 0.0);
        assert!(!bubbles_touch(&a, &b, 0.0));
        assert!(bubbles_touch(&a, &b, 1.0));
    }

    #[test]
    fn test_collision_normal_points_toward_bubble() {
        let a = bubble(100.0, 100.0, 0.0, 0.0);
        let b = bubble(100.0, 130.0, 0.0, 0.0);
        let n = collision_normal(&a, &b).unwrap();
        assert!((n - Vec2::new(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_collision_normal_concentric_fails() {
        let a = bubble(100.0, 100.0, 1.0, 0.0);
        let b = bubble(100.0, 100.0, 0.0, 0.0);
        assert!(matches!(
            collision_normal(&a, &b),
            Err(BubbleError::NormalizationFailed { .. })
        ));
    }

    #[test]
    fn test_reflect_velocity() {
        // Bubble moving right, hits a bubble on its right (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_resolve_is_asymmetric() {
        let mut a = bubble(100.0, 100.0, 3.0, 4.0);
        let mut b = bubble(100.0, 115.0, -1.0, 0.0);
        let normal = collision_normal(&a, &b).unwrap();
        let speed = a.speed();

        resolve_bubble_collision(&mut a, &mut b, normal, speed, &Physics::default());

        // Straight-on along y: only the y component flips
        assert!((a.vel - Vec2::new(3.0, -4.0)).length() < 1e-5);
        assert!((a.speed() - 5.0).abs() < 1e-5);
        // Nudged 5px away from b
        assert!((a.pos - Vec2::new(100.0, 95.0)).length() < 1e-5);
        // b loses 0.2 * a.vel / 10
        assert!((b.vel - Vec2::new(-1.0 - 0.06, 0.08)).length() < 1e-5);
    }

    #[test]
    fn test_resolve_applies_ball_friction() {
        let mut a = bubble(100.0, 100.0, 2.0, 0.0);
        let mut b = bubble(115.0, 100.0, 0.0, 0.0);
        let physics = Physics {
            ball_friction: 0.5,
            ..Default::default()
        };
        resolve_bubble_collision(&mut a, &mut b, Vec2::new(-1.0, 0.0), 2.0, &physics);

        assert!((a.vel - Vec2::new(-1.0, 0.0)).length() < 1e-6);
        assert!((b.vel - Vec2::new(0.02, 0.0)).length() < 1e-6);
    }
}

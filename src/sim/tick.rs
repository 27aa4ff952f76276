//! Fixed-step simulation tick
//!
//! One tick moves every bubble by its velocity, then bounces it off walls and
//! other bubbles. There is no delta time: a tick is one frame.

use super::collision::{bubbles_touch, collision_normal, contain, resolve_bubble_collision, wall_check};
use super::state::{Bubble, BubbleField, Viewport};
use crate::settings::Physics;

/// What happened while stepping a single bubble
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Bounced off at least one wall
    pub wall_bounce: bool,
    /// Bubble pairs that collided
    pub collisions: u32,
    /// Pairs skipped because their centers coincide
    pub degenerate_pairs: u32,
}

/// Totals for one full pass over the field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Bubbles that bounced off at least one wall
    pub wall_bounces: u32,
    /// Bubble pairs that collided
    pub collisions: u32,
    /// Pairs skipped because their centers coincide
    pub degenerate_pairs: u32,
}

impl TickReport {
    fn add(&mut self, step: StepReport) {
        self.wall_bounces += u32::from(step.wall_bounce);
        self.collisions += step.collisions;
        self.degenerate_pairs += step.degenerate_pairs;
    }
}

/// Advance the bubble at `index` by one tick.
///
/// Order: integrate, wall check, then a collision check against every other
/// bubble in index order. Other bubbles only have their velocity changed.
/// Bubbles are updated in place, so a bubble stepped later in the same frame
/// sees this one's new state.
///
/// Panics if `index` is out of bounds.
pub fn step(bubbles: &mut [Bubble], index: usize, viewport: Viewport, physics: &Physics) -> StepReport {
    let mut report = StepReport::default();
    let mut bubble = bubbles[index];

    bubble.pos += bubble.vel;

    report.wall_bounce = wall_check(&mut bubble, viewport, physics.friction).any();

    for (j, other) in bubbles.iter_mut().enumerate() {
        if j == index {
            continue;
        }

        let speed = bubble.speed();
        if !bubbles_touch(&bubble, other, speed) {
            continue;
        }

        match collision_normal(&bubble, other) {
            Ok(normal) => {
                resolve_bubble_collision(&mut bubble, other, normal, speed, physics);
                report.collisions += 1;
            }
            Err(err) => {
                log::debug!("Skipping bubbles {index} and {j}: {err}");
                report.degenerate_pairs += 1;
            }
        }
    }

    // Collision nudges can push a bubble back over a wall
    if viewport.fits(bubble.radius) {
        contain(&mut bubble, viewport);
    }

    bubbles[index] = bubble;
    report
}

/// Run one full stepping pass over every bubble in index order
pub fn tick(field: &mut BubbleField, physics: &Physics) -> TickReport {
    let viewport = field.viewport;
    let bubbles = field.bubbles_mut();
    let mut report = TickReport::default();

    for index in 0..bubbles.len() {
        report.add(step(bubbles, index, viewport, physics));
    }

    field.time_ticks += 1;
    if report.degenerate_pairs > 0 {
        log::debug!(
            "Tick {}: {} degenerate bubble pairs skipped",
            field.time_ticks,
            report.degenerate_pairs
        );
    }
    report
}

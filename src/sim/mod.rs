//! Deterministic simulation module
//!
//! All bubble physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only, and only when the field is created
//! - Stable iteration order (by bubble index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{WallHits, collision_normal, reflect_velocity, resolve_bubble_collision, wall_check};
pub use state::{Bubble, BubbleField, RngState, Viewport};
pub use tick::{StepReport, TickReport, step, tick};

//! Bubble Saver - a bouncing bubble screensaver simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bubble store, wall bounce, collisions)
//! - `host`: Contract with the window host (viewport, frame pacing, renderer)
//! - `settings`: Tuning constants and presets
//! - `error`: Error types

pub mod error;
pub mod host;
pub mod settings;
pub mod sim;

pub use error::BubbleError;
pub use settings::{Preset, Settings};

/// Default simulation constants
pub mod consts {
    /// Bubble count of the overlay preset
    pub const NUMBER_OF_BUBBLES: usize = 10;
    /// Bubble count of the classic preset
    pub const NUMBER_OF_BUBBLES_DENSE: usize = 50;
    /// Fixed radius used when not scaling to the viewport
    pub const BUBBLE_RADIUS: f32 = 120.0;
    /// Divisor for viewport-scaled radius: w*h / (count * RADIUS_AREA_DIVISOR)
    pub const RADIUS_AREA_DIVISOR: u64 = 1000;

    /// Bubble mass (only used when handing energy to the other bubble)
    pub const BUBBLE_MASS: f32 = 10.0;
    /// Small rightward drift every bubble starts with
    pub const INITIAL_VELOCITY: (f32, f32) = (0.5, 0.0);

    /// Wall friction (1 = lossless)
    pub const WALL_FRICTION: f32 = 1.0;
    /// Bubble-on-bubble restitution (1 = lossless)
    pub const BALL_FRICTION: f32 = 1.0;
    /// Fraction of the reflected velocity handed to the other bubble
    pub const BALL_ENERGY_TRANSFER: f32 = 0.2;

    /// Below this center distance a collision normal is undefined
    pub const NORMAL_EPSILON: f32 = 1.0e-4;

    /// Frame interval of the overlay preset (~30 fps)
    pub const FRAME_INTERVAL_MS: f32 = 33.0;
    /// Frame interval of the classic preset (~95 fps)
    pub const FRAME_INTERVAL_DENSE_MS: f32 = 10.5;
}

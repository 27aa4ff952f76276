//! Simulation settings and presets
//!
//! Every tuning constant of the screensaver lives here so hosts can load them
//! from a JSON file instead of recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt as _, ensure};

use crate::consts::*;
use crate::error::{InvalidSettingsSnafu, Result, SettingsIoSnafu, SettingsParseSnafu};

/// Preset bundles matching the two screensaver variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Few large bubbles sized to the screen, ~30 fps
    #[default]
    Overlay,
    /// Many fixed-size bubbles clustered around the center, ~95 fps
    Classic,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Overlay => "Overlay",
            Preset::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "overlay" => Some(Preset::Overlay),
            "classic" | "dense" => Some(Preset::Classic),
            _ => None,
        }
    }

    /// Number of bubbles for this preset
    pub fn bubble_count(&self) -> usize {
        match self {
            Preset::Overlay => NUMBER_OF_BUBBLES,
            Preset::Classic => NUMBER_OF_BUBBLES_DENSE,
        }
    }

    pub fn radius(&self) -> RadiusPolicy {
        match self {
            Preset::Overlay => RadiusPolicy::ScaleToViewport,
            Preset::Classic => RadiusPolicy::Fixed(BUBBLE_RADIUS),
        }
    }

    pub fn spawn(&self) -> SpawnRegion {
        match self {
            Preset::Overlay => SpawnRegion::FullViewport,
            Preset::Classic => SpawnRegion::CenteredBox {
                width: 400.0,
                height: 400.0,
            },
        }
    }

    /// Milliseconds between frames
    pub fn frame_interval_ms(&self) -> f32 {
        match self {
            Preset::Overlay => FRAME_INTERVAL_MS,
            Preset::Classic => FRAME_INTERVAL_DENSE_MS,
        }
    }
}

/// How the bubble radius is chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusPolicy {
    /// Same radius regardless of screen size
    Fixed(f32),
    /// `width * height / (count * 1000)`, so denser screens get smaller bubbles
    ScaleToViewport,
}

impl RadiusPolicy {
    /// Resolve the radius for `count` bubbles on a `width` x `height` viewport.
    ///
    /// The scaled variant uses integer division, truncating to whole pixels.
    pub fn resolve(&self, count: usize, width: u32, height: u32) -> f32 {
        match *self {
            RadiusPolicy::Fixed(radius) => radius,
            RadiusPolicy::ScaleToViewport => {
                let area = u64::from(width) * u64::from(height);
                let divisor = (count as u64).max(1).saturating_mul(RADIUS_AREA_DIVISOR);
                (area / divisor) as f32
            }
        }
    }
}

/// Where bubbles are placed at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnRegion {
    /// Anywhere in `[0, width) x [0, height)`
    FullViewport,
    /// A box of the given size centered on the viewport center
    CenteredBox { width: f32, height: f32 },
}

/// Coefficients applied by the physics stepper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Wall friction (1 = lossless)
    pub friction: f32,
    /// Restitution of bubble-on-bubble bounces (1 = lossless)
    pub ball_friction: f32,
    /// Fraction of the reflected velocity subtracted from the other bubble
    pub energy_transfer: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            friction: WALL_FRICTION,
            ball_friction: BALL_FRICTION,
            energy_transfer: BALL_ENERGY_TRANSFER,
        }
    }
}

/// Screensaver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset these settings were derived from
    pub preset: Preset,

    // === Bubble store ===
    /// Number of bubbles, fixed for the run
    pub bubble_count: usize,
    /// Radius policy
    pub radius: RadiusPolicy,
    /// Spawn region
    pub spawn: SpawnRegion,
    /// Velocity every bubble starts with
    pub initial_velocity: (f32, f32),
    /// Mass of every bubble
    pub mass: f32,
    /// Carried on each bubble; the stepper never reads it
    pub gravity: bool,

    // === Physics ===
    pub physics: Physics,

    // === Host ===
    /// Target milliseconds between frames
    pub frame_interval_ms: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Settings {
    /// Create settings from a preset
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            bubble_count: preset.bubble_count(),
            radius: preset.radius(),
            spawn: preset.spawn(),
            initial_velocity: INITIAL_VELOCITY,
            mass: BUBBLE_MASS,
            gravity: false,
            physics: Physics::default(),
            frame_interval_ms: preset.frame_interval_ms(),
        }
    }

    /// Check values that would otherwise corrupt the simulation
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.bubble_count > 0,
            InvalidSettingsSnafu {
                reason: "bubble_count must be at least 1"
            }
        );
        ensure!(
            self.mass.is_finite() && self.mass > 0.0,
            InvalidSettingsSnafu {
                reason: format!("mass must be positive, got {}", self.mass)
            }
        );
        if let RadiusPolicy::Fixed(radius) = self.radius {
            ensure!(
                radius.is_finite() && radius > 0.0,
                InvalidSettingsSnafu {
                    reason: format!("fixed radius must be positive, got {radius}")
                }
            );
        }
        if let SpawnRegion::CenteredBox { width, height } = self.spawn {
            ensure!(
                width > 0.0 && height > 0.0,
                InvalidSettingsSnafu {
                    reason: format!("spawn box must be non-empty, got {width}x{height}")
                }
            );
        }
        let (vx, vy) = self.initial_velocity;
        let Physics {
            friction,
            ball_friction,
            energy_transfer,
        } = self.physics;
        ensure!(
            [vx, vy, friction, ball_friction, energy_transfer]
                .iter()
                .all(|v| v.is_finite()),
            InvalidSettingsSnafu {
                reason: "velocity and physics coefficients must be finite"
            }
        );
        ensure!(
            self.frame_interval_ms.is_finite() && self.frame_interval_ms >= 0.0,
            InvalidSettingsSnafu {
                reason: format!(
                    "frame_interval_ms must be non-negative, got {}",
                    self.frame_interval_ms
                )
            }
        );
        Ok(())
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).context(SettingsIoSnafu { path })?;
        let settings: Self = serde_json::from_str(&json).context(SettingsParseSnafu { path })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context(SettingsParseSnafu { path })?;
        std::fs::write(path, json).context(SettingsIoSnafu { path })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

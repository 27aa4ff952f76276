//! Bubble store
//!
//! All state that must be kept between frames (and persisted for replay) lives here.

use std::path::Path;

use glam::Vec2;
use rand::{Rng as _, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt as _, ensure};

use crate::error::{InvalidSettingsSnafu, InvalidViewportSnafu, Result, StateIoSnafu, StateParseSnafu};
use crate::settings::{Settings, SpawnRegion};

/// Drawable area in pixels, queried once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size as floats, for physics
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Whether a circle of `radius` fits at all
    pub fn fits(&self, radius: f32) -> bool {
        let size = self.size();
        2.0 * radius <= size.x && 2.0 * radius <= size.y
    }
}

/// A bubble entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed for the bubble's lifetime
    pub radius: f32,
    /// Only used as a divisor when another bubble hands energy to this one
    pub mass: f32,
    /// Not consulted by the stepper
    #[serde(default)]
    pub gravity_enabled: bool,
}

impl Bubble {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass,
            gravity_enabled: false,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// The fixed-size bubble collection (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BubbleField {
    /// Seed used to place the bubbles
    pub rng_state: RngState,
    /// Viewport the bubbles are confined to
    pub viewport: Viewport,
    /// Full stepping passes completed
    pub time_ticks: u64,
    /// Bubbles in stable index order; never grows or shrinks
    bubbles: Vec<Bubble>,
}

impl BubbleField {
    /// Populate `settings.bubble_count` bubbles on `viewport`.
    ///
    /// Positions are uniformly random inside the configured spawn region, drawn
    /// from a PCG stream seeded with `seed`; everything else is constant.
    pub fn new(settings: &Settings, viewport: Viewport, seed: u64) -> Result<Self> {
        settings.validate()?;

        let Viewport { width, height } = viewport;
        let count = settings.bubble_count;
        let radius = settings.radius.resolve(count, width, height);
        ensure!(
            width > 0 && height > 0 && radius > 0.0 && viewport.fits(radius),
            InvalidViewportSnafu { width, height }
        );
        log::info!(
            "Spawning {count} bubbles of radius {radius} on {width}x{height} (seed {seed})"
        );

        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let (vx, vy) = settings.initial_velocity;
        let vel = Vec2::new(vx, vy);

        let bubbles = (0..count)
            .map(|_| {
                let pos = spawn_position(&mut rng, settings.spawn, viewport);
                let mut bubble = Bubble::new(pos, vel, radius, settings.mass);
                bubble.gravity_enabled = settings.gravity;
                bubble
            })
            .collect();

        Ok(Self {
            rng_state,
            viewport,
            time_ticks: 0,
            bubbles,
        })
    }

    /// Build a field from explicit bubbles (fixtures, replays).
    ///
    /// Nothing is validated here; call [`BubbleField::validate`] before stepping
    /// untrusted bubbles. The field records seed 0 since no RNG placed them.
    pub fn from_bubbles(viewport: Viewport, bubbles: Vec<Bubble>) -> Self {
        Self {
            rng_state: RngState::new(0),
            viewport,
            time_ticks: 0,
            bubbles,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bubble> {
        self.bubbles.get(index)
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Mutable access to the bubbles. The slice length cannot change.
    pub fn bubbles_mut(&mut self) -> &mut [Bubble] {
        &mut self.bubbles
    }

    /// Write the field to a JSON snapshot
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).context(StateParseSnafu { path })?;
        std::fs::write(path, json).context(StateIoSnafu { path })?;
        log::info!("Saved {} bubbles at tick {} to {}", self.len(), self.time_ticks, path.display());
        Ok(())
    }

    /// Restore a field from a JSON snapshot
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).context(StateIoSnafu { path })?;
        let field: Self = serde_json::from_str(&json).context(StateParseSnafu { path })?;
        field.validate()?;
        Ok(field)
    }

    /// Check every bubble can be stepped without producing NaN or inf:
    /// positive finite mass and radius, a radius that fits the viewport, and
    /// finite position and velocity.
    pub fn validate(&self) -> Result<()> {
        let Viewport { width, height } = self.viewport;
        ensure!(width > 0 && height > 0, InvalidViewportSnafu { width, height });

        for (index, bubble) in self.bubbles.iter().enumerate() {
            ensure!(
                bubble.mass.is_finite() && bubble.mass > 0.0,
                InvalidSettingsSnafu {
                    reason: format!("bubble {index} has mass {}", bubble.mass)
                }
            );
            ensure!(
                bubble.radius.is_finite() && bubble.radius > 0.0,
                InvalidSettingsSnafu {
                    reason: format!("bubble {index} has radius {}", bubble.radius)
                }
            );
            ensure!(
                self.viewport.fits(bubble.radius),
                InvalidViewportSnafu { width, height }
            );
            ensure!(
                bubble.pos.is_finite() && bubble.vel.is_finite(),
                InvalidSettingsSnafu {
                    reason: format!("bubble {index} has a non-finite position or velocity")
                }
            );
        }
        Ok(())
    }
}

fn spawn_position(rng: &mut Pcg32, region: SpawnRegion, viewport: Viewport) -> Vec2 {
    match region {
        SpawnRegion::FullViewport => Vec2::new(
            rng.random_range(0..viewport.width) as f32,
            rng.random_range(0..viewport.height) as f32,
        ),
        SpawnRegion::CenteredBox { width, height } => {
            let origin = viewport.center() - Vec2::new(width, height) * 0.5;
            origin + Vec2::new(rng.random::<f32>() * width, rng.random::<f32>() * height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BubbleError;
    use crate::settings::{Preset, RadiusPolicy};

    #[test]
    fn test_initialize_overlay() {
        let settings = Settings::from_preset(Preset::Overlay);
        let viewport = Viewport::new(1920, 1080);
        let field = BubbleField::new(&settings, viewport, 42).unwrap();

        assert_eq!(field.len(), 10);
        for bubble in field.bubbles() {
            assert_eq!(bubble.radius, 207.0);
            assert_eq!(bubble.mass, 10.0);
            assert_eq!(bubble.vel, Vec2::new(0.5, 0.0));
            assert!(!bubble.gravity_enabled);
            assert!(bubble.pos.x >= 0.0 && bubble.pos.x < 1920.0);
            assert!(bubble.pos.y >= 0.0 && bubble.pos.y < 1080.0);
        }
    }

    #[test]
    fn test_initialize_centered_box() {
        let settings = Settings::from_preset(Preset::Classic);
        let viewport = Viewport::new(1920, 1080);
        let field = BubbleField::new(&settings, viewport, 7).unwrap();

        assert_eq!(field.len(), 50);
        for bubble in field.bubbles() {
            assert!((bubble.pos.x - 960.0).abs() <= 200.0);
            assert!((bubble.pos.y - 540.0).abs() <= 200.0);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let settings = Settings::default();
        let viewport = Viewport::new(800, 600);
        let a = BubbleField::new(&settings, viewport, 1234).unwrap();
        let b = BubbleField::new(&settings, viewport, 1234).unwrap();
        let c = BubbleField::new(&settings, viewport, 4321).unwrap();

        assert_eq!(a.bubbles(), b.bubbles());
        assert_ne!(a.bubbles(), c.bubbles());
    }

    #[test]
    fn test_rejects_viewport_too_small() {
        let mut settings = Settings::default();
        settings.radius = RadiusPolicy::Fixed(120.0);
        let result = BubbleField::new(&settings, Viewport::new(200, 600), 1);
        assert!(matches!(
            result,
            Err(BubbleError::InvalidViewport {
                width: 200,
                height: 600
            })
        ));

        let result = BubbleField::new(&Settings::default(), Viewport::new(0, 600), 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_scaled_radius() {
        // 100 * 50 / (10 * 1000) truncates to 0
        let result = BubbleField::new(&Settings::default(), Viewport::new(100, 50), 1);
        assert!(matches!(result, Err(BubbleError::InvalidViewport { .. })));
    }

    #[test]
    fn test_gravity_flag_is_carried() {
        let mut settings = Settings::default();
        settings.gravity = true;
        let field = BubbleField::new(&settings, Viewport::new(1920, 1080), 3).unwrap();
        assert!(field.bubbles().iter().all(|b| b.gravity_enabled));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let field = BubbleField::new(&Settings::default(), Viewport::new(1280, 720), 9).unwrap();
        let path = std::env::temp_dir().join(format!("bubble-saver-{}.json", std::process::id()));

        field.save(&path).unwrap();
        let loaded = BubbleField::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.bubbles(), field.bubbles());
        assert_eq!(loaded.viewport, field.viewport);
        assert_eq!(loaded.rng_state.seed, 9);
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("bubble-saver-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn test_load_rejects_zero_mass() {
        let viewport = Viewport::new(800, 600);
        let field = BubbleField::from_bubbles(
            viewport,
            vec![
                Bubble::new(Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.0), 10.0, 10.0),
                Bubble::new(Vec2::new(115.0, 100.0), Vec2::ZERO, 10.0, 0.0),
            ],
        );
        let path = temp_path("zero-mass");

        field.save(&path).unwrap();
        let result = BubbleField::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(BubbleError::InvalidSettings { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_bubbles() {
        let viewport = Viewport::new(800, 600);
        let ok = Bubble::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 10.0, 10.0);
        assert!(BubbleField::from_bubbles(viewport, vec![ok]).validate().is_ok());

        let mut too_big = ok;
        too_big.radius = 400.0;
        assert!(matches!(
            BubbleField::from_bubbles(viewport, vec![too_big]).validate(),
            Err(BubbleError::InvalidViewport { .. })
        ));

        let mut no_radius = ok;
        no_radius.radius = 0.0;
        assert!(BubbleField::from_bubbles(viewport, vec![no_radius]).validate().is_err());

        let mut runaway = ok;
        runaway.vel = Vec2::new(f32::INFINITY, 0.0);
        assert!(BubbleField::from_bubbles(viewport, vec![runaway]).validate().is_err());

        let mut lost = ok;
        lost.pos = Vec2::new(f32::NAN, 100.0);
        assert!(BubbleField::from_bubbles(viewport, vec![lost]).validate().is_err());
    }

    #[test]
    fn test_load_malformed_snapshot() {
        let path = temp_path("malformed-state");
        std::fs::write(&path, "{ \"viewport\": ").unwrap();
        let result = BubbleField::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(BubbleError::StateParse { .. })));
    }
}

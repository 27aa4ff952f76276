//! Errors for this crate

use std::path::PathBuf;

/// All the known errors returned by this crate.
#[derive(Debug, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BubbleError {
    #[snafu(display("Viewport {width}x{height} cannot hold the configured bubbles"))]
    /// The viewport is empty or smaller than a single bubble
    InvalidViewport {
        /// Viewport width in pixels
        width: u32,
        /// Viewport height in pixels
        height: u32,
    },

    #[snafu(display("Invalid settings: {reason}"))]
    /// Settings that cannot produce a valid bubble field
    InvalidSettings {
        /// What is wrong with them
        reason: String,
    },

    #[snafu(display("Bubble centers {distance} apart have no collision normal"))]
    /// Two bubble centers (nearly) coincide, so the line between them has no direction
    NormalizationFailed {
        /// Distance between the two centers
        distance: f32,
    },

    #[snafu(display("Couldn't read settings file {}", path.display()))]
    /// Reading a settings file failed
    SettingsIo {
        /// The settings file
        path: PathBuf,
        /// The parent error type
        source: std::io::Error,
    },

    #[snafu(display("Couldn't parse settings file {}", path.display()))]
    /// A settings file isn't valid JSON for [`crate::Settings`]
    SettingsParse {
        /// The settings file
        path: PathBuf,
        /// The parent error type
        source: serde_json::Error,
    },

    #[snafu(display("Couldn't access state file {}", path.display()))]
    /// Reading or writing a bubble field snapshot failed
    StateIo {
        /// The snapshot file
        path: PathBuf,
        /// The parent error type
        source: std::io::Error,
    },

    #[snafu(display("Couldn't (de)serialize state file {}", path.display()))]
    /// A bubble field snapshot couldn't be converted to or from JSON
    StateParse {
        /// The snapshot file
        path: PathBuf,
        /// The parent error type
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the crate
pub type Result<T, E = BubbleError> = std::result::Result<T, E>;

//! Frame pacing and FPS tracking
//!
//! There is no delta time in the simulation, so the pacing chosen here decides
//! how fast bubbles appear to move.

use std::time::{Duration, Instant};

/// Frames averaged for the FPS counter
pub const FPS_WINDOW: usize = 60;

/// Sleeps between frames to hold a target cadence
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    paced: bool,
    start: Instant,
    frame_start: Instant,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,
}

impl FrameClock {
    /// A clock targeting one frame every `interval_ms` milliseconds
    pub fn new(interval_ms: f32) -> Self {
        let now = Instant::now();
        Self {
            interval: Duration::from_micros((interval_ms.max(0.0) * 1000.0).round() as u64),
            paced: true,
            start: now,
            frame_start: now,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
        }
    }

    /// A clock that never sleeps (benchmarks, tests, headless runs)
    pub fn unpaced() -> Self {
        let mut clock = Self::new(0.0);
        clock.paced = false;
        clock
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Mark the end of a frame: update FPS, then sleep off the rest of the interval
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        self.record(now.duration_since(self.start).as_secs_f64());

        if self.paced {
            let spent = now.duration_since(self.frame_start);
            if let Some(remaining) = self.interval.checked_sub(spent) {
                std::thread::sleep(remaining);
            }
        }
        self.frame_start = Instant::now();
    }

    /// Track frame times for FPS (seconds since the clock started)
    fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_seen += 1;

        // Calculate FPS from oldest to newest frame
        if self.frames_seen >= FPS_WINDOW {
            let oldest_time = self.frame_times[self.frame_index];
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }
}

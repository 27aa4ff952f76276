//! Host contract
//!
//! The window, transparency, desktop capture and idle detection live outside
//! this crate. A host provides:
//! - a viewport, once, at startup
//! - a tick per frame (`Screensaver::run_frame`)
//! - a renderer that draws each bubble's circle

pub mod clock;
pub mod frame;

pub use clock::FrameClock;
pub use frame::{Circle, Frame, FrameBuffer};

use crate::error::Result;
use crate::settings::{Physics, Settings};
use crate::sim::{BubbleField, TickReport, Viewport, tick};

/// Draws bubbles. The simulation has no drawing code of its own.
pub trait Renderer {
    /// Called once before the frame's circles
    fn begin_frame(&mut self, _frame: &Frame) {}

    /// Draw one bubble
    fn draw_bubble(&mut self, circle: Circle);

    /// Called once after the frame's circles
    fn end_frame(&mut self) {}
}

/// Any `FnMut(Circle)` is a renderer, for hosts that only need a draw callback
impl<F: FnMut(Circle)> Renderer for F {
    fn draw_bubble(&mut self, circle: Circle) {
        self(circle);
    }
}

/// Screensaver instance holding all state
pub struct Screensaver {
    field: BubbleField,
    physics: Physics,
    frames: FrameBuffer,
    clock: FrameClock,
    last_report: TickReport,
}

impl Screensaver {
    /// Build the bubble field and publish its initial frame
    pub fn new(settings: &Settings, viewport: Viewport, seed: u64) -> Result<Self> {
        let field = BubbleField::new(settings, viewport, seed)?;
        Ok(Self::from_field(field, settings))
    }

    /// Resume from an existing field (e.g. a loaded snapshot)
    pub fn from_field(field: BubbleField, settings: &Settings) -> Self {
        let frames = FrameBuffer::new();
        frames.publish(Frame::capture(&field));
        Self {
            field,
            physics: settings.physics,
            frames,
            clock: FrameClock::new(settings.frame_interval_ms),
            last_report: TickReport::default(),
        }
    }

    /// Replace the frame clock (e.g. with [`FrameClock::unpaced`])
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Run one full stepping pass, then publish the result
    pub fn update(&mut self) -> TickReport {
        let report = tick(&mut self.field, &self.physics);
        self.frames.publish(Frame::capture(&self.field));
        self.last_report = report;
        report
    }

    /// Draw the latest published frame
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        render_frame(&self.frames, renderer);
    }

    /// Update, render and wait out the rest of the frame interval
    pub fn run_frame<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> TickReport {
        let report = self.update();
        self.render(renderer);
        self.clock.end_frame();
        report
    }

    /// Handle for renderers on other threads
    pub fn frame_buffer(&self) -> FrameBuffer {
        self.frames.clone()
    }

    pub fn field(&self) -> &BubbleField {
        &self.field
    }

    pub fn last_report(&self) -> TickReport {
        self.last_report
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }
}

/// Draw whatever frame is currently published in `frames`
pub fn render_frame<R: Renderer + ?Sized>(frames: &FrameBuffer, renderer: &mut R) {
    frames.with_latest(|frame| {
        renderer.begin_frame(frame);
        for circle in &frame.circles {
            renderer.draw_bubble(*circle);
        }
        renderer.end_frame();
    });
}

//! Frame snapshots handed to renderers
//!
//! A stepping pass mutates bubbles in place, so renderers never read the field
//! directly. After each full pass the host publishes a [`Frame`]; a renderer
//! on any thread only ever sees a complete one.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::sim::BubbleField;

/// Everything a renderer needs to draw one bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

/// The drawable state after one full stepping pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Tick this frame was taken after
    pub tick: u64,
    /// One circle per bubble, in bubble index order
    pub circles: Vec<Circle>,
}

impl Frame {
    /// Snapshot a field
    pub fn capture(field: &BubbleField) -> Self {
        Self {
            tick: field.time_ticks,
            circles: field
                .bubbles()
                .iter()
                .map(|b| Circle {
                    x: b.pos.x,
                    y: b.pos.y,
                    r: b.radius,
                })
                .collect(),
        }
    }
}

/// Latest published frame, shareable across threads
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    latest: Arc<RwLock<Frame>>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest frame
    pub fn publish(&self, frame: Frame) {
        // A frame is replaced wholesale, so a poisoned lock still holds a whole frame
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        *latest = frame;
    }

    /// Run `f` against the latest frame while holding the read lock
    pub fn with_latest<T>(&self, f: impl FnOnce(&Frame) -> T) -> T {
        let latest = self.latest.read().unwrap_or_else(PoisonError::into_inner);
        f(&latest)
    }

    /// Clone of the latest frame
    pub fn snapshot(&self) -> Frame {
        self.with_latest(Frame::clone)
    }
}

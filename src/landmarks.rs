//! The validated landmark contract at the provider boundary.
//!
//! A tracked hand is exactly 21 frame-normalized points at fixed anatomical
//! indices. Anything shorter, longer, or absent is "no hand" to the rest of
//! the pipeline.

use anyhow::{Result, anyhow};

use crate::types::Frame;

pub const NUM_LANDMARKS: usize = 21;

// Landmark indices, wrist first, then four joints per digit.
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// One detected hand: 21 points, (x, y) in [0, 1] relative to the frame,
/// z as relative depth. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [[f32; 3]; NUM_LANDMARKS],
}

impl HandLandmarks {
    /// Build from a provider payload, rejecting anything that is not exactly
    /// 21 points.
    pub fn from_points(points: &[[f32; 3]]) -> Result<Self> {
        if points.len() != NUM_LANDMARKS {
            return Err(anyhow!(
                "unexpected landmarks length: got {}, need {}",
                points.len(),
                NUM_LANDMARKS
            ));
        }
        let mut fixed = [[0.0f32; 3]; NUM_LANDMARKS];
        fixed.copy_from_slice(points);
        Ok(Self { points: fixed })
    }

    pub fn point(&self, index: usize) -> [f32; 3] {
        self.points[index]
    }

    pub fn points(&self) -> &[[f32; 3]; NUM_LANDMARKS] {
        &self.points
    }
}

/// External landmark backend. Implementations wrap whatever actually finds
/// the hand (an on-device model, a remote service, a recording); the core
/// only sees the validated result.
///
/// `load` is the one-time, potentially slow backend initialization; `detect`
/// runs once per frame. A `detect` error or `Ok(None)` both mean "no hand
/// this frame" downstream.
pub trait LandmarkProvider: Send + 'static {
    fn load(&mut self) -> Result<()>;

    fn detect(&mut self, frame: &Frame) -> Result<Option<HandLandmarks>>;
}

//! A landmark provider that replays a pre-recorded sequence.
//!
//! Useful for driving the pipeline offline: demos, regression runs, and
//! tests all feed canned landmark frames through the exact code path a live
//! backend would use. Once the recording is exhausted every further frame
//! reads as "no hand".

use std::collections::VecDeque;

use anyhow::Result;

use crate::{
    landmarks::{HandLandmarks, LandmarkProvider},
    types::Frame,
};

#[derive(Debug, Default)]
pub struct ReplayProvider {
    frames: VecDeque<Option<HandLandmarks>>,
}

impl ReplayProvider {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Option<HandLandmarks>>,
    {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkProvider for ReplayProvider {
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Option<HandLandmarks>> {
        Ok(self.frames.pop_front().flatten())
    }
}

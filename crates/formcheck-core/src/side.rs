//! Sticky left/right side selection.

use formcheck_models::{Joint, Side};
use tracing::debug;

use crate::pose::PoseFrame;

/// Picks the body side facing the camera.
///
/// Re-evaluated every frame. The other side takes over immediately when its
/// mean visibility leads by `switch_margin`, or after it has been preferred
/// for `sticky_frames` consecutive frames. Ties go to the right side.
#[derive(Debug, Clone)]
pub struct SideSelector {
    switch_margin: f64,
    sticky_frames: u32,
    current: Option<Side>,
    challenger_frames: u32,
}

impl SideSelector {
    pub fn new(switch_margin: f64, sticky_frames: u32) -> Self {
        Self {
            switch_margin,
            sticky_frames: sticky_frames.max(1),
            current: None,
            challenger_frames: 0,
        }
    }

    /// Side in use, right until the first selection.
    pub fn current(&self) -> Side {
        self.current.unwrap_or_default()
    }

    /// Update the selection from one frame and return the side to use.
    pub fn select(&mut self, frame: &PoseFrame, joints: &[Joint]) -> Side {
        let left = frame.mean_visibility(Side::Left, joints);
        let right = frame.mean_visibility(Side::Right, joints);
        let preferred = if left > right { Side::Left } else { Side::Right };

        let Some(current) = self.current else {
            self.current = Some(preferred);
            return preferred;
        };

        if preferred == current {
            self.challenger_frames = 0;
            return current;
        }

        self.challenger_frames += 1;
        let lead = (left - right).abs();
        if lead >= self.switch_margin || self.challenger_frames >= self.sticky_frames {
            debug!(
                from = %current,
                to = %preferred,
                lead,
                frames = self.challenger_frames,
                "Switching tracked side"
            );
            self.current = Some(preferred);
            self.challenger_frames = 0;
            return preferred;
        }
        current
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.challenger_frames = 0;
    }
}

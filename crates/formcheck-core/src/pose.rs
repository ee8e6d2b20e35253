//! Index of one frame's landmarks.

use formcheck_models::{Joint, Landmark, PoseLandmark, Side, POSE_LANDMARK_COUNT};

/// Landmarks of a single frame, addressable by pose index.
///
/// Ids outside the 33-point topology are ignored; when an id appears twice
/// the later landmark wins.
#[derive(Debug, Clone)]
pub struct PoseFrame {
    slots: [Option<Landmark>; POSE_LANDMARK_COUNT],
    count: usize,
}

impl PoseFrame {
    pub fn from_landmarks(landmarks: &[Landmark]) -> Self {
        let mut slots = [None; POSE_LANDMARK_COUNT];
        for landmark in landmarks {
            if let Some(slot) = slots.get_mut(landmark.id as usize) {
                *slot = Some(*landmark);
            }
        }
        let count = slots.iter().filter(|s| s.is_some()).count();
        Self { slots, count }
    }

    /// Number of distinct known landmarks.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, landmark: PoseLandmark) -> Option<&Landmark> {
        self.slots[landmark.index() as usize].as_ref()
    }

    /// Landmark of `joint` on `side`.
    pub fn joint(&self, side: Side, joint: Joint) -> Option<&Landmark> {
        self.get(side.landmark(joint))
    }

    /// Visibility of a joint, zero when missing.
    pub fn visibility(&self, side: Side, joint: Joint) -> f64 {
        self.joint(side, joint).map_or(0.0, |lm| lm.visibility)
    }

    /// Mean visibility of `joints` on `side`, counting missing ones as zero.
    pub fn mean_visibility(&self, side: Side, joints: &[Joint]) -> f64 {
        if joints.is_empty() {
            return 0.0;
        }
        let total: f64 = joints.iter().map(|j| self.visibility(side, *j)).sum();
        total / joints.len() as f64
    }

    /// Lowest visibility among `joints` on `side`, zero if any is missing.
    pub fn min_visibility(&self, side: Side, joints: &[Joint]) -> f64 {
        joints
            .iter()
            .map(|j| self.visibility(side, *j))
            .fold(f64::INFINITY, f64::min)
            .min(1.0)
            .max(0.0)
    }

    /// Position of a joint, if present.
    pub fn point(&self, side: Side, joint: Joint) -> Option<(f64, f64)> {
        self.joint(side, joint).map(Landmark::point)
    }

    /// Every known landmark in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.slots.iter().flatten()
    }
}

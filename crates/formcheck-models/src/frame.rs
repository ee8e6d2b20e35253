//! Per-frame analysis output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ExerciseKind, IssueCode, RepPhase, Severity, Side};

/// Structured result for one processed frame.
///
/// Every field is populated on every frame; angles and depth markers hold
/// their last known values through transient occlusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameResult {
    /// Primary joint angle in degrees (knee for squats, elbow for push-ups)
    pub primary_angle: f64,

    /// Secondary posture angle in degrees (hip for squats, body line for push-ups)
    pub secondary_angle: f64,

    /// Current repetition phase
    pub stage: RepPhase,

    /// Reps counted as valid since the last reset
    pub valid_reps: u32,

    /// Reps counted as invalid since the last reset
    pub invalid_reps: u32,

    /// Total counted reps
    pub rep_count: u32,

    /// Displayed coaching message
    pub feedback: String,

    /// Severity of the displayed message
    pub feedback_level: Severity,

    /// True when the displayed message differs from the previous frame's
    pub feedback_changed: bool,

    /// True when no form fault was raised on this frame
    pub good_form: bool,

    /// False when the subject could not be tracked on this frame
    pub subject_detected: bool,

    /// Normalized y the tracked point must reach for full depth
    pub target_depth_y: f64,

    /// Normalized y of the tracked point
    pub current_depth_y: f64,

    /// Recent positions of the tracked point, oldest first
    pub trajectory: Vec<[f64; 2]>,

    /// Body side used for this frame
    pub side: Side,
}

/// Aggregate statistics for one session since its last reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionSummary {
    pub exercise: ExerciseKind,
    pub valid_reps: u32,
    pub invalid_reps: u32,
    /// Completed cycles that were not counted (too fast or low confidence)
    pub discarded_reps: u32,
    /// How many counted invalid reps carried each issue
    #[serde(default)]
    pub issue_counts: BTreeMap<IssueCode, u32>,
}

impl SessionSummary {
    pub fn new(exercise: ExerciseKind) -> Self {
        Self {
            exercise,
            ..Default::default()
        }
    }

    pub fn total_reps(&self) -> u32 {
        self.valid_reps + self.invalid_reps
    }

    /// The issue seen in the most invalid reps, if any.
    pub fn most_common_issue(&self) -> Option<IssueCode> {
        self.issue_counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(code, _)| *code)
    }
}

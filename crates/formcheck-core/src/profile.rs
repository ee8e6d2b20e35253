//! Exercise profiles.
//!
//! An [`ExerciseProfile`] is plain data: which joints form the tracked
//! angles, the phase thresholds, the form checks, and the wording of the
//! exercise-specific messages. The analyzer machinery is shared by every
//! exercise and never branches on the exercise kind.

use formcheck_models::{ExerciseKind, IssueCode, Joint, RepPhase, Side};
use std::fmt;

use crate::angle;
use crate::phase::PhaseThresholds;
use crate::pose::PoseFrame;

/// A joint angle measured at the middle joint of three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleSpec {
    /// Smoother key.
    pub name: &'static str,
    pub joints: [Joint; 3],
}

impl AngleSpec {
    pub const fn new(name: &'static str, a: Joint, b: Joint, c: Joint) -> Self {
        Self {
            name,
            joints: [a, b, c],
        }
    }

    /// Raw angle on `side`, if all three joints are present.
    pub fn measure(&self, frame: &PoseFrame, side: Side) -> Option<f64> {
        let [a, b, c] = self.joints;
        Some(angle::angle(
            frame.point(side, a)?,
            frame.point(side, b)?,
            frame.point(side, c)?,
        ))
    }

    /// Whether every joint of the angle is visible enough to trust.
    pub fn is_confident(&self, frame: &PoseFrame, side: Side, threshold: f64) -> bool {
        frame.min_visibility(side, &self.joints) >= threshold
    }
}

/// Everything a form check may look at for one frame.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub frame: &'a PoseFrame,
    pub side: Side,
    /// Smoothed primary angle.
    pub primary: f64,
    /// Smoothed secondary angle.
    pub secondary: f64,
    /// Phase before this frame's transition.
    pub phase: RepPhase,
    pub thresholds: &'a PhaseThresholds,
}

impl CheckContext<'_> {
    pub fn point(&self, joint: Joint) -> Option<(f64, f64)> {
        self.frame.point(self.side, joint)
    }
}

/// An instantaneous form predicate, debounced by the analyzer.
#[derive(Clone, Copy)]
pub struct FormCheck {
    pub code: IssueCode,
    pub text: &'static str,
    /// Consecutive firing frames before the issue is raised.
    pub frames_required: u32,
    /// Only evaluated while a rep is in progress.
    pub active_only: bool,
    /// Joints the predicate reads, directly or through the secondary angle.
    pub joints: &'static [Joint],
    pub predicate: fn(&CheckContext<'_>) -> bool,
}

impl FormCheck {
    /// Whether every joint the check reads is visible enough to trust.
    pub fn is_confident(&self, frame: &PoseFrame, side: Side, threshold: f64) -> bool {
        frame.min_visibility(side, self.joints) >= threshold
    }
}

impl fmt::Debug for FormCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormCheck")
            .field("code", &self.code)
            .field("frames_required", &self.frames_required)
            .field("active_only", &self.active_only)
            .field("joints", &self.joints)
            .finish_non_exhaustive()
    }
}

/// How reaching full depth is judged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthRule {
    /// Smoothed primary angle at or below the bottom threshold.
    PrimaryAngle,
    /// The current marker joint at or below the target marker joint, with
    /// `tolerance` of normalized height to spare.
    MarkerHeight { tolerance: f64 },
}

/// Joints whose heights are reported as the depth guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthMarkers {
    pub target: Joint,
    pub current: Joint,
}

/// Exercise-specific wording of status and coaching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileTexts {
    pub ready: &'static str,
    pub good_depth: &'static str,
    pub go_lower: &'static str,
    pub lockout: &'static str,
    pub shallow_rep: &'static str,
}

/// Complete description of one exercise.
#[derive(Debug, Clone)]
pub struct ExerciseProfile {
    pub kind: ExerciseKind,
    pub thresholds: PhaseThresholds,
    /// Joints whose mean visibility decides the side.
    pub side_joints: &'static [Joint],
    pub primary: AngleSpec,
    pub secondary: AngleSpec,
    pub checks: Vec<FormCheck>,
    pub depth_rule: DepthRule,
    pub depth_markers: DepthMarkers,
    /// Point whose recent positions form the visual trail.
    pub trail_joint: Joint,
    /// Framing also requires a head-to-ankle vertical span.
    pub upright: bool,
    pub texts: ProfileTexts,
}

impl ExerciseProfile {
    /// Profile of a supported exercise with default thresholds.
    pub fn for_kind(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::Squat => crate::exercises::squat::profile(),
            ExerciseKind::Pushup => crate::exercises::pushup::profile(),
        }
    }

    /// Whether this frame shows full depth.
    pub fn depth_achieved(&self, ctx: &CheckContext<'_>) -> bool {
        match self.depth_rule {
            DepthRule::PrimaryAngle => ctx.primary <= self.thresholds.bottom,
            DepthRule::MarkerHeight { tolerance } => {
                match (
                    ctx.point(self.depth_markers.current),
                    ctx.point(self.depth_markers.target),
                ) {
                    (Some(current), Some(target)) => current.1 >= target.1 - tolerance,
                    _ => false,
                }
            }
        }
    }

    /// `(target_y, current_y)` of the depth guide, if both joints are present.
    pub fn depth_guide(&self, frame: &PoseFrame, side: Side) -> Option<(f64, f64)> {
        let target = frame.point(side, self.depth_markers.target)?;
        let current = frame.point(side, self.depth_markers.current)?;
        Some((target.1, current.1))
    }
}

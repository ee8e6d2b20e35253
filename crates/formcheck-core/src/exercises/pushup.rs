//! Push-up, viewed from the side.
//!
//! The elbow angle drives the cycle; the shoulder-hip-ankle body line is
//! the secondary reading. Sag is graded in two tiers and a raised hip is
//! judged by its distance above the shoulder-ankle line.

use formcheck_models::{ExerciseKind, IssueCode, Joint};

use crate::angle::{angle, height_above_line};
use crate::phase::PhaseThresholds;
use crate::profile::{
    AngleSpec, CheckContext, DepthMarkers, DepthRule, ExerciseProfile, FormCheck, ProfileTexts,
};

/// Body-line angle below which the hips are sagging badly.
pub const BODY_SAG_SEVERE: f64 = 150.0;

/// Body-line angle below which the core is loosening.
pub const BODY_SAG_WARNING: f64 = 160.0;

/// Hip height above the shoulder-ankle line that counts as a pike, as a
/// fraction of body length.
pub const PIKE_RATIO: f64 = 0.06;

/// Ear-shoulder-hip angle below which the head is dropping.
pub const NECK_MIN_ANGLE: f64 = 140.0;

const SIDE_JOINTS: &[Joint] = &[
    Joint::Shoulder,
    Joint::Elbow,
    Joint::Wrist,
    Joint::Hip,
    Joint::Ankle,
];
const BODY_LINE: &[Joint] = &[Joint::Shoulder, Joint::Hip, Joint::Ankle];
const NECK: &[Joint] = &[Joint::Ear, Joint::Shoulder, Joint::Hip];

pub fn profile() -> ExerciseProfile {
    ExerciseProfile {
        kind: ExerciseKind::Pushup,
        thresholds: PhaseThresholds::default(),
        side_joints: SIDE_JOINTS,
        primary: AngleSpec::new("elbow", Joint::Shoulder, Joint::Elbow, Joint::Wrist),
        secondary: AngleSpec::new("body", Joint::Shoulder, Joint::Hip, Joint::Ankle),
        checks: vec![
            FormCheck {
                code: IssueCode::BodySag,
                text: IssueCode::BodySag.message(),
                frames_required: 6,
                active_only: true,
                joints: BODY_LINE,
                predicate: severe_sag,
            },
            FormCheck {
                code: IssueCode::CoreLoose,
                text: IssueCode::CoreLoose.message(),
                frames_required: 6,
                active_only: true,
                joints: BODY_LINE,
                predicate: mild_sag,
            },
            FormCheck {
                code: IssueCode::HipPike,
                text: IssueCode::HipPike.message(),
                frames_required: 8,
                active_only: true,
                joints: BODY_LINE,
                predicate: hip_pike,
            },
            FormCheck {
                code: IssueCode::NeckAlignment,
                text: IssueCode::NeckAlignment.message(),
                frames_required: 8,
                active_only: true,
                joints: NECK,
                predicate: head_dropping,
            },
        ],
        depth_rule: DepthRule::PrimaryAngle,
        depth_markers: DepthMarkers {
            target: Joint::Wrist,
            current: Joint::Shoulder,
        },
        trail_joint: Joint::Shoulder,
        upright: false,
        texts: ProfileTexts {
            ready: "Start Push-ups",
            good_depth: "Good depth! Push up!",
            go_lower: "Lower your chest more",
            lockout: "Full lockout at top",
            shallow_rep: "Lower chest more next rep",
        },
    }
}

/// Signed hip height above the shoulder-ankle line and the body length.
fn hip_offset(ctx: &CheckContext<'_>) -> Option<(f64, f64)> {
    let shoulder = ctx.point(Joint::Shoulder)?;
    let hip = ctx.point(Joint::Hip)?;
    let ankle = ctx.point(Joint::Ankle)?;
    let length = (ankle.0 - shoulder.0).hypot(ankle.1 - shoulder.1);
    Some((height_above_line(hip, shoulder, ankle), length))
}

fn hips_low(ctx: &CheckContext<'_>) -> bool {
    hip_offset(ctx).is_some_and(|(offset, _)| offset <= 0.0)
}

fn severe_sag(ctx: &CheckContext<'_>) -> bool {
    ctx.secondary < BODY_SAG_SEVERE && hips_low(ctx)
}

fn mild_sag(ctx: &CheckContext<'_>) -> bool {
    (BODY_SAG_SEVERE..BODY_SAG_WARNING).contains(&ctx.secondary) && hips_low(ctx)
}

fn hip_pike(ctx: &CheckContext<'_>) -> bool {
    hip_offset(ctx).is_some_and(|(offset, length)| length > 0.0 && offset > PIKE_RATIO * length)
}

fn head_dropping(ctx: &CheckContext<'_>) -> bool {
    let (Some(ear), Some(shoulder), Some(hip)) = (
        ctx.point(Joint::Ear),
        ctx.point(Joint::Shoulder),
        ctx.point(Joint::Hip),
    ) else {
        return false;
    };
    angle(ear, shoulder, hip) < NECK_MIN_ANGLE
}

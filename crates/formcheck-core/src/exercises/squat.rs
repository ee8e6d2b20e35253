//! Bodyweight squat, viewed from the side.
//!
//! The knee angle drives the cycle and the hip angle is reported as the
//! secondary reading. Depth counts once the hip drops to knee height.

use formcheck_models::{ExerciseKind, IssueCode, Joint};

use crate::angle::lean_from_vertical;
use crate::phase::PhaseThresholds;
use crate::profile::{
    AngleSpec, CheckContext, DepthMarkers, DepthRule, ExerciseProfile, FormCheck, ProfileTexts,
};

/// Torso lean from vertical that risks the lower back, in degrees.
pub const BACK_LEAN_SEVERE: f64 = 60.0;

/// Torso lean from vertical worth a chest-up cue, in degrees.
pub const BACK_LEAN_WARNING: f64 = 45.0;

/// Horizontal knee travel past the ankle, as a fraction of shin length.
pub const KNEE_TRAVEL_RATIO: f64 = 0.35;

const SIDE_JOINTS: &[Joint] = &[Joint::Shoulder, Joint::Hip, Joint::Knee, Joint::Ankle];
const TORSO: &[Joint] = &[Joint::Shoulder, Joint::Hip];
const SHIN: &[Joint] = &[Joint::Knee, Joint::Ankle];

pub fn profile() -> ExerciseProfile {
    ExerciseProfile {
        kind: ExerciseKind::Squat,
        thresholds: PhaseThresholds::default(),
        side_joints: SIDE_JOINTS,
        primary: AngleSpec::new("knee", Joint::Hip, Joint::Knee, Joint::Ankle),
        secondary: AngleSpec::new("hip", Joint::Shoulder, Joint::Hip, Joint::Knee),
        checks: vec![
            FormCheck {
                code: IssueCode::BackRounding,
                text: IssueCode::BackRounding.message(),
                frames_required: 6,
                active_only: true,
                joints: TORSO,
                predicate: back_rounding,
            },
            FormCheck {
                code: IssueCode::ChestUp,
                text: IssueCode::ChestUp.message(),
                frames_required: 6,
                active_only: true,
                joints: TORSO,
                predicate: chest_dropping,
            },
            FormCheck {
                code: IssueCode::KneesPastToes,
                text: IssueCode::KneesPastToes.message(),
                frames_required: 8,
                active_only: true,
                joints: SHIN,
                predicate: knees_past_toes,
            },
        ],
        depth_rule: DepthRule::MarkerHeight { tolerance: 0.0 },
        depth_markers: DepthMarkers {
            target: Joint::Knee,
            current: Joint::Hip,
        },
        trail_joint: Joint::Hip,
        upright: true,
        texts: ProfileTexts {
            ready: "Start Squats",
            good_depth: "Good depth!",
            go_lower: "Squat deeper",
            lockout: "Stand up fully",
            shallow_rep: "Go deeper next rep",
        },
    }
}

fn torso_lean(ctx: &CheckContext<'_>) -> Option<f64> {
    Some(lean_from_vertical(
        ctx.point(Joint::Shoulder)?,
        ctx.point(Joint::Hip)?,
    ))
}

fn back_rounding(ctx: &CheckContext<'_>) -> bool {
    torso_lean(ctx).is_some_and(|lean| lean > BACK_LEAN_SEVERE)
}

fn chest_dropping(ctx: &CheckContext<'_>) -> bool {
    torso_lean(ctx).is_some_and(|lean| lean > BACK_LEAN_WARNING && lean <= BACK_LEAN_SEVERE)
}

fn knees_past_toes(ctx: &CheckContext<'_>) -> bool {
    let (Some(knee), Some(ankle)) = (ctx.point(Joint::Knee), ctx.point(Joint::Ankle)) else {
        return false;
    };
    let shin = (knee.0 - ankle.0).hypot(knee.1 - ankle.1);
    shin > 0.0 && (knee.0 - ankle.0).abs() > KNEE_TRAVEL_RATIO * shin
}

//! Feedback severities and issue codes.
//!
//! Every message the analyzers can show is identified by an [`IssueCode`].
//! The code fixes the message's priority and tier, so selection never
//! depends on string matching or on the order candidates were produced in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display severity of a feedback message.
///
/// Controls display color and whether voice output should announce it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Whether voice output should announce messages of this severity.
    pub fn is_voice_eligible(&self) -> bool {
        !matches!(self, Severity::Success)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority band of an issue code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CueTier {
    /// Injury-relevant posture faults. Preempt anything on screen.
    Safety,
    /// Technique coaching.
    Technique,
    /// Neutral or positive status messages.
    Status,
}

/// Discrete feedback message identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    // Safety
    BackRounding,
    BodySag,
    HipPike,

    // Technique
    ChestUp,
    CoreLoose,
    KneesPastToes,
    NeckAlignment,
    InsufficientDepth,
    IncompleteLockout,

    // Status
    SubjectLost,
    OutOfFrame,
    RepFaulty,
    RepShallow,
    GoodRep,
    GoodDepth,
    Ready,
}

impl IssueCode {
    /// Every code, most urgent first.
    pub const ALL: &'static [IssueCode] = &[
        IssueCode::BackRounding,
        IssueCode::BodySag,
        IssueCode::HipPike,
        IssueCode::ChestUp,
        IssueCode::CoreLoose,
        IssueCode::KneesPastToes,
        IssueCode::NeckAlignment,
        IssueCode::InsufficientDepth,
        IssueCode::IncompleteLockout,
        IssueCode::SubjectLost,
        IssueCode::OutOfFrame,
        IssueCode::RepFaulty,
        IssueCode::RepShallow,
        IssueCode::GoodRep,
        IssueCode::GoodDepth,
        IssueCode::Ready,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::BackRounding => "back_rounding",
            IssueCode::BodySag => "body_sag",
            IssueCode::HipPike => "hip_pike",
            IssueCode::ChestUp => "chest_up",
            IssueCode::CoreLoose => "core_loose",
            IssueCode::KneesPastToes => "knees_past_toes",
            IssueCode::NeckAlignment => "neck_alignment",
            IssueCode::InsufficientDepth => "insufficient_depth",
            IssueCode::IncompleteLockout => "incomplete_lockout",
            IssueCode::SubjectLost => "subject_lost",
            IssueCode::OutOfFrame => "out_of_frame",
            IssueCode::RepFaulty => "rep_faulty",
            IssueCode::RepShallow => "rep_shallow",
            IssueCode::GoodRep => "good_rep",
            IssueCode::GoodDepth => "good_depth",
            IssueCode::Ready => "ready",
        }
    }

    /// Selection rank, lower is more urgent. Unique per code.
    pub fn priority(&self) -> u8 {
        match self {
            IssueCode::BackRounding => 0,
            IssueCode::BodySag => 1,
            IssueCode::HipPike => 2,
            IssueCode::ChestUp => 10,
            IssueCode::CoreLoose => 11,
            IssueCode::KneesPastToes => 12,
            IssueCode::NeckAlignment => 13,
            IssueCode::InsufficientDepth => 14,
            IssueCode::IncompleteLockout => 15,
            IssueCode::SubjectLost => 20,
            IssueCode::OutOfFrame => 21,
            IssueCode::RepFaulty => 22,
            IssueCode::RepShallow => 23,
            IssueCode::GoodRep => 24,
            IssueCode::GoodDepth => 25,
            IssueCode::Ready => 26,
        }
    }

    pub fn tier(&self) -> CueTier {
        match self {
            IssueCode::BackRounding | IssueCode::BodySag | IssueCode::HipPike => CueTier::Safety,
            IssueCode::ChestUp
            | IssueCode::CoreLoose
            | IssueCode::KneesPastToes
            | IssueCode::NeckAlignment
            | IssueCode::InsufficientDepth
            | IssueCode::IncompleteLockout => CueTier::Technique,
            _ => CueTier::Status,
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self.tier() {
            CueTier::Safety => Severity::Error,
            CueTier::Technique => Severity::Warning,
            CueTier::Status => match self {
                IssueCode::GoodRep | IssueCode::GoodDepth | IssueCode::Ready => Severity::Success,
                _ => Severity::Warning,
            },
        }
    }

    /// Whether raising this code on any frame makes the whole rep invalid.
    pub fn invalidates_rep(&self) -> bool {
        self.tier() == CueTier::Safety
    }

    /// Rep verdict messages are shown immediately, skipping the dwell time.
    pub fn bypasses_dwell(&self) -> bool {
        matches!(
            self,
            IssueCode::GoodRep | IssueCode::RepFaulty | IssueCode::RepShallow
        )
    }

    /// Default message text. Exercise profiles override the codes whose
    /// wording depends on the movement.
    pub fn message(&self) -> &'static str {
        match self {
            IssueCode::BackRounding => "Keep your back straight!",
            IssueCode::BodySag => "Keep body straight!",
            IssueCode::HipPike => "Don't pike hips up!",
            IssueCode::ChestUp => "Keep your chest up",
            IssueCode::CoreLoose => "Tighten your core",
            IssueCode::KneesPastToes => "Knees past toes, sit back",
            IssueCode::NeckAlignment => "Keep your neck neutral",
            IssueCode::InsufficientDepth => "Go lower",
            IssueCode::IncompleteLockout => "Full lockout at top",
            IssueCode::SubjectLost => "Position yourself in frame",
            IssueCode::OutOfFrame => "Step back so your whole body is visible",
            IssueCode::RepFaulty => "Check form",
            IssueCode::RepShallow => "Go deeper next rep",
            IssueCode::GoodRep => "Good rep!",
            IssueCode::GoodDepth => "Good depth!",
            IssueCode::Ready => "Ready when you are",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One candidate feedback message for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cue {
    pub code: IssueCode,
    pub severity: Severity,
    pub text: &'static str,
}

impl Cue {
    /// Cue with the code's default severity and text.
    pub fn new(code: IssueCode) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            text: code.message(),
        }
    }

    /// Cue with the code's default severity and custom text.
    pub fn with_text(code: IssueCode, text: &'static str) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            text,
        }
    }

    /// Selection key: priority first, then text for a stable total order.
    pub fn rank(&self) -> (u8, &'static str) {
        (self.code.priority(), self.text)
    }
}

//! Pose landmarks as produced by the external pose extractor.
//!
//! Coordinates are normalized to the image (`0.0..=1.0`, y grows downward)
//! and every landmark carries a visibility score. Indices follow the
//! 33-point MediaPipe pose topology.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of landmarks in a complete pose.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// A single tracked body keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    /// Landmark index (see [`PoseLandmark`])
    pub id: u32,
    /// Normalized horizontal position
    pub x: f64,
    /// Normalized vertical position (0 = top of frame)
    pub y: f64,
    /// Detection visibility/confidence
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(id: u32, x: f64, y: f64, visibility: f64) -> Self {
        Self {
            id,
            x,
            y,
            visibility,
        }
    }

    /// Position as an `(x, y)` pair.
    pub fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// MediaPipe pose landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    /// Landmark index as emitted by the extractor.
    pub fn index(self) -> u32 {
        self as u32
    }
}

/// Side-agnostic joint names used by exercise profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Ear,
    Shoulder,
    Elbow,
    Wrist,
    Hip,
    Knee,
    Ankle,
}

/// Body side used for angle computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    /// Preferred on visibility ties.
    #[default]
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// The opposite side.
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Resolve a joint to this side's landmark.
    pub fn landmark(self, joint: Joint) -> PoseLandmark {
        use PoseLandmark as P;
        match (self, joint) {
            (Side::Left, Joint::Ear) => P::LeftEar,
            (Side::Left, Joint::Shoulder) => P::LeftShoulder,
            (Side::Left, Joint::Elbow) => P::LeftElbow,
            (Side::Left, Joint::Wrist) => P::LeftWrist,
            (Side::Left, Joint::Hip) => P::LeftHip,
            (Side::Left, Joint::Knee) => P::LeftKnee,
            (Side::Left, Joint::Ankle) => P::LeftAnkle,
            (Side::Right, Joint::Ear) => P::RightEar,
            (Side::Right, Joint::Shoulder) => P::RightShoulder,
            (Side::Right, Joint::Elbow) => P::RightElbow,
            (Side::Right, Joint::Wrist) => P::RightWrist,
            (Side::Right, Joint::Hip) => P::RightHip,
            (Side::Right, Joint::Knee) => P::RightKnee,
            (Side::Right, Joint::Ankle) => P::RightAnkle,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            _ => Err(SideParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown side: {0}")]
pub struct SideParseError(String);

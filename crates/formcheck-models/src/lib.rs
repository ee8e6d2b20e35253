//! Shared data models for FormCheck.
//!
//! This crate provides Serde-serializable types for:
//! - Pose landmarks, body sides and side-agnostic joints
//! - Exercise kinds and repetition phases
//! - Feedback severities and issue codes with a fixed priority order
//! - Per-frame analysis results
//! - Session wire messages (frames, reset, acknowledgements)

pub mod exercise;
pub mod feedback;
pub mod frame;
pub mod landmark;
pub mod phase;
pub mod session;

// Re-export common types
pub use exercise::{ExerciseKind, ExerciseKindParseError};
pub use feedback::{Cue, CueTier, IssueCode, Severity};
pub use frame::{FrameResult, SessionSummary};
pub use landmark::{Joint, Landmark, PoseLandmark, Side, SideParseError, POSE_LANDMARK_COUNT};
pub use phase::RepPhase;
pub use session::{ClientMessage, ServerMessage, SessionId};

#![deny(unreachable_patterns)]
//! Per-frame exercise form analysis.
//!
//! This crate provides:
//! - Planar joint angles and confidence-gated angle smoothing
//! - A four-phase rep cycle state machine with hysteresis
//! - Per-rep validation with rep gating
//! - Priority-ordered, debounced coaching feedback
//! - Squat and push-up profiles over one shared analyzer
//! - Sequence-checked sessions with reset

pub mod analyzer;
pub mod angle;
pub mod config;
pub mod debounce;
pub mod error;
pub mod exercises;
pub mod feedback;
pub mod framing;
pub mod metrics;
pub mod phase;
pub mod pose;
pub mod profile;
pub mod session;
pub mod side;
pub mod smoother;
pub mod validator;

pub use analyzer::ExerciseAnalyzer;
pub use angle::angle;
pub use config::AnalyzerConfig;
pub use error::{CoreError, CoreResult};
pub use exercises::{analyzer_for, parse_exercise, resolve_exercise};
pub use feedback::{DisplayedFeedback, FeedbackStabilizer};
pub use phase::{PhaseThresholds, PhaseTransition, RepCycleStateMachine, TransitionKind};
pub use pose::PoseFrame;
pub use profile::ExerciseProfile;
pub use session::Session;
pub use smoother::AngleSmoother;
pub use validator::{CycleOutcome, DiscardReason, RepRecord, RepValidator, RepVerdict, SessionCounters};

//! Analyzer metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.

use metrics::{counter, gauge, histogram};

use crate::validator::{DiscardReason, RepVerdict};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Frames processed by exercise.
    pub const FRAMES_PROCESSED_TOTAL: &str = "formcheck_frames_processed_total";

    /// Per-frame processing time in seconds.
    pub const FRAME_PROCESSING_SECONDS: &str = "formcheck_frame_processing_seconds";

    /// Counted reps by exercise and verdict.
    pub const REPS_COUNTED_TOTAL: &str = "formcheck_reps_counted_total";

    /// Completed cycles that were not counted, by reason.
    pub const REPS_DISCARDED_TOTAL: &str = "formcheck_reps_discarded_total";

    /// In-flight reps abandoned because the subject was lost.
    pub const SAFETY_ESCAPES_TOTAL: &str = "formcheck_safety_escapes_total";

    /// Frames dropped for arriving out of order or before a reset.
    pub const STALE_FRAMES_TOTAL: &str = "formcheck_stale_frames_total";

    /// Session resets.
    pub const SESSION_RESETS_TOTAL: &str = "formcheck_session_resets_total";

    /// Sessions currently alive.
    pub const SESSIONS_ACTIVE: &str = "formcheck_sessions_active";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record one processed frame.
pub fn record_frame(exercise: &str, duration_secs: f64) {
    counter!(names::FRAMES_PROCESSED_TOTAL, "exercise" => exercise.to_string()).increment(1);
    histogram!(names::FRAME_PROCESSING_SECONDS, "exercise" => exercise.to_string())
        .record(duration_secs);
}

/// Record a counted rep.
pub fn record_rep(exercise: &str, verdict: RepVerdict) {
    counter!(
        names::REPS_COUNTED_TOTAL,
        "exercise" => exercise.to_string(),
        "verdict" => verdict.as_str()
    )
    .increment(1);
}

/// Record a completed cycle that was not counted.
pub fn record_discard(exercise: &str, reason: DiscardReason) {
    counter!(
        names::REPS_DISCARDED_TOTAL,
        "exercise" => exercise.to_string(),
        "reason" => reason.as_str()
    )
    .increment(1);
}

pub fn record_escape(exercise: &str) {
    counter!(names::SAFETY_ESCAPES_TOTAL, "exercise" => exercise.to_string()).increment(1);
}

pub fn record_stale_frame() {
    counter!(names::STALE_FRAMES_TOTAL).increment(1);
}

pub fn record_reset() {
    counter!(names::SESSION_RESETS_TOTAL).increment(1);
}

pub fn record_session_opened() {
    gauge!(names::SESSIONS_ACTIVE).increment(1.0);
}

pub fn record_session_closed() {
    gauge!(names::SESSIONS_ACTIVE).decrement(1.0);
}

//! Analyzer configuration.
//!
//! Exercise-specific geometry lives in the exercise profiles; this struct
//! holds the tunables shared by every analyzer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Configuration shared by all exercise analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    // === Confidence ===
    /// Minimum landmark visibility for an angle sample to count (default: 0.45)
    pub visibility_threshold: f64,

    // === Smoothing ===
    /// EMA weight of the newest sample (default: 0.4)
    pub smoothing_alpha: f64,

    // === Side Selection ===
    /// Visibility lead that switches sides immediately (default: 0.15)
    pub side_switch_margin: f64,

    /// Consecutive frames the other side must be preferred before switching (default: 5)
    pub side_sticky_frames: u32,

    // === Rep Gating ===
    /// Minimum seconds between two counted reps (default: 0.8)
    pub min_rep_interval_secs: f64,

    /// Low-confidence frames tolerated inside one rep before it is discarded (default: 0)
    pub max_low_confidence_frames: u32,

    // === Subject Loss ===
    /// Consecutive untracked frames before an in-flight rep is abandoned (default: 15)
    pub max_lost_frames: u32,

    /// Consecutive untracked frames before asking the user to step into frame (default: 5)
    pub lost_cue_frames: u32,

    // === Feedback ===
    /// Minimum seconds a message stays on screen before a non-urgent change (default: 0.4)
    pub feedback_min_dwell_secs: f64,

    /// Consecutive frames a new message must be wanted before it replaces the old one (default: 2)
    pub feedback_confirm_frames: u32,

    /// Frames spent above depth while descending before "go lower" (default: 8)
    pub depth_hover_frames: u32,

    /// Frames spent short of lockout while ascending before "lockout" (default: 12)
    pub lockout_hover_frames: u32,

    // === Display ===
    /// Maximum trajectory samples kept for the visual trail (default: 30)
    pub trajectory_len: usize,

    /// Margin of the normalized frame key landmarks must stay inside (default: 0.03)
    pub framing_margin: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.45,
            smoothing_alpha: 0.4,
            side_switch_margin: 0.15,
            side_sticky_frames: 5,
            min_rep_interval_secs: 0.8,
            max_low_confidence_frames: 0,
            max_lost_frames: 15,
            lost_cue_frames: 5,
            feedback_min_dwell_secs: 0.4,
            feedback_confirm_frames: 2,
            depth_hover_frames: 8,
            lockout_hover_frames: 12,
            trajectory_len: 30,
            framing_margin: 0.03,
        }
    }
}

impl AnalyzerConfig {
    /// Stricter gating for coached sessions.
    pub fn strict() -> Self {
        Self {
            visibility_threshold: 0.55,
            min_rep_interval_secs: 1.0,
            feedback_confirm_frames: 3,
            ..Default::default()
        }
    }

    /// Tolerant gating for poor lighting or partial framing.
    pub fn lenient() -> Self {
        Self {
            visibility_threshold: 0.35,
            max_low_confidence_frames: 3,
            max_lost_frames: 25,
            ..Default::default()
        }
    }

    /// Create config from `FORMCHECK_*` environment variables, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            visibility_threshold: env_or("FORMCHECK_VISIBILITY_THRESHOLD", d.visibility_threshold),
            smoothing_alpha: env_or("FORMCHECK_SMOOTHING_ALPHA", d.smoothing_alpha),
            side_switch_margin: env_or("FORMCHECK_SIDE_SWITCH_MARGIN", d.side_switch_margin),
            side_sticky_frames: env_or("FORMCHECK_SIDE_STICKY_FRAMES", d.side_sticky_frames),
            min_rep_interval_secs: env_or("FORMCHECK_MIN_REP_INTERVAL_SECS", d.min_rep_interval_secs),
            max_low_confidence_frames: env_or(
                "FORMCHECK_MAX_LOW_CONFIDENCE_FRAMES",
                d.max_low_confidence_frames,
            ),
            max_lost_frames: env_or("FORMCHECK_MAX_LOST_FRAMES", d.max_lost_frames),
            lost_cue_frames: env_or("FORMCHECK_LOST_CUE_FRAMES", d.lost_cue_frames),
            feedback_min_dwell_secs: env_or(
                "FORMCHECK_FEEDBACK_MIN_DWELL_SECS",
                d.feedback_min_dwell_secs,
            ),
            feedback_confirm_frames: env_or(
                "FORMCHECK_FEEDBACK_CONFIRM_FRAMES",
                d.feedback_confirm_frames,
            ),
            depth_hover_frames: env_or("FORMCHECK_DEPTH_HOVER_FRAMES", d.depth_hover_frames),
            lockout_hover_frames: env_or("FORMCHECK_LOCKOUT_HOVER_FRAMES", d.lockout_hover_frames),
            trajectory_len: env_or("FORMCHECK_TRAJECTORY_LEN", d.trajectory_len),
            framing_margin: env_or("FORMCHECK_FRAMING_MARGIN", d.framing_margin),
        }
    }

    /// Check ranges; analyzers refuse to build from an invalid config.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(CoreError::invalid_config(format!(
                "visibility_threshold must be within 0..=1, got {}",
                self.visibility_threshold
            )));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(CoreError::invalid_config(format!(
                "smoothing_alpha must be within (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        for (name, secs) in [
            ("min_rep_interval_secs", self.min_rep_interval_secs),
            ("feedback_min_dwell_secs", self.feedback_min_dwell_secs),
        ] {
            if let Err(e) = Duration::try_from_secs_f64(secs) {
                return Err(CoreError::invalid_config(format!(
                    "{} must be a representable non-negative number of seconds, got {}: {}",
                    name, secs, e
                )));
            }
        }
        if self.max_lost_frames == 0 || self.feedback_confirm_frames == 0 {
            return Err(CoreError::invalid_config(
                "max_lost_frames and feedback_confirm_frames must be at least 1",
            ));
        }
        if self.trajectory_len == 0 {
            return Err(CoreError::invalid_config("trajectory_len must be at least 1"));
        }
        if !(0.0..0.5).contains(&self.framing_margin) {
            return Err(CoreError::invalid_config(format!(
                "framing_margin must be within 0..0.5, got {}",
                self.framing_margin
            )));
        }
        Ok(())
    }

    pub fn min_rep_interval(&self) -> Duration {
        Duration::from_secs_f64(self.min_rep_interval_secs)
    }

    pub fn feedback_min_dwell(&self) -> Duration {
        Duration::from_secs_f64(self.feedback_min_dwell_secs)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

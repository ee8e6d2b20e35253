//! Per-rep validity accumulation.
//!
//! One [`RepRecord`] lives from the frame a rep starts until the cycle
//! completes or is abandoned. Issues accumulate as a union over the whole
//! rep, so a single bad frame taints it.

use formcheck_models::{ExerciseKind, IssueCode, SessionSummary};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

/// Final classification of a counted rep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepVerdict {
    Valid,
    Invalid,
}

impl RepVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepVerdict::Valid => "valid",
            RepVerdict::Invalid => "invalid",
        }
    }
}

/// Why a completed cycle was not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Completed sooner than the minimum interval after the previous counted rep.
    TooSoon,
    /// Too many frames of the cycle lacked confident primary landmarks.
    LowConfidence,
}

impl DiscardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardReason::TooSoon => "too_soon",
            DiscardReason::LowConfidence => "low_confidence",
        }
    }
}

/// Result of finishing one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Counted { verdict: RepVerdict, record: RepRecord },
    Discarded { reason: DiscardReason },
}

impl CycleOutcome {
    pub fn verdict(&self) -> Option<RepVerdict> {
        match self {
            CycleOutcome::Counted { verdict, .. } => Some(*verdict),
            CycleOutcome::Discarded { .. } => None,
        }
    }
}

/// State of the rep in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct RepRecord {
    pub issues: BTreeSet<IssueCode>,
    pub reached_target_depth: bool,
    pub started_at: Duration,
    pub frames: u32,
    pub low_confidence_frames: u32,
}

impl RepRecord {
    pub fn new(started_at: Duration) -> Self {
        Self {
            issues: BTreeSet::new(),
            reached_target_depth: false,
            started_at,
            frames: 0,
            low_confidence_frames: 0,
        }
    }

    /// Most urgent issue seen during the rep.
    pub fn top_issue(&self) -> Option<IssueCode> {
        self.issues.iter().min_by_key(|code| code.priority()).copied()
    }

    pub fn verdict(&self) -> RepVerdict {
        if self.reached_target_depth && self.issues.is_empty() {
            RepVerdict::Valid
        } else {
            RepVerdict::Invalid
        }
    }
}

/// Counted reps since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub valid_reps: u32,
    pub invalid_reps: u32,
}

impl SessionCounters {
    pub fn total(&self) -> u32 {
        self.valid_reps + self.invalid_reps
    }
}

/// Accumulates rep records and turns completed cycles into verdicts.
#[derive(Debug, Clone)]
pub struct RepValidator {
    min_rep_interval: Duration,
    max_low_confidence_frames: u32,
    record: Option<RepRecord>,
    last_counted_at: Option<Duration>,
    summary: SessionSummary,
}

impl RepValidator {
    pub fn new(
        exercise: ExerciseKind,
        min_rep_interval: Duration,
        max_low_confidence_frames: u32,
    ) -> Self {
        Self {
            min_rep_interval,
            max_low_confidence_frames,
            record: None,
            last_counted_at: None,
            summary: SessionSummary::new(exercise),
        }
    }

    /// Begin a new record, replacing any unfinished one.
    pub fn start(&mut self, now: Duration) {
        self.record = Some(RepRecord::new(now));
    }

    /// Fold one confident frame into the current record.
    pub fn observe<I>(&mut self, flags: I, depth_achieved: bool)
    where
        I: IntoIterator<Item = IssueCode>,
    {
        if let Some(record) = self.record.as_mut() {
            record.frames += 1;
            record.issues.extend(flags);
            record.reached_target_depth |= depth_achieved;
        }
    }

    /// Note a frame of the current rep without confident primary landmarks.
    pub fn observe_low_confidence(&mut self) {
        if let Some(record) = self.record.as_mut() {
            record.frames += 1;
            record.low_confidence_frames += 1;
        }
    }

    /// Finish the current cycle and count it unless gated.
    pub fn complete(&mut self, now: Duration) -> CycleOutcome {
        let record = self.record.take().unwrap_or_else(|| RepRecord::new(now));

        if record.low_confidence_frames > self.max_low_confidence_frames {
            debug!(
                low_confidence_frames = record.low_confidence_frames,
                "Discarding rep with untrusted frames"
            );
            self.summary.discarded_reps += 1;
            return CycleOutcome::Discarded {
                reason: DiscardReason::LowConfidence,
            };
        }

        if let Some(last) = self.last_counted_at {
            if now.saturating_sub(last) < self.min_rep_interval {
                debug!(
                    since_last_ms = now.saturating_sub(last).as_millis() as u64,
                    "Discarding rep completed too soon"
                );
                self.summary.discarded_reps += 1;
                return CycleOutcome::Discarded {
                    reason: DiscardReason::TooSoon,
                };
            }
        }

        let verdict = record.verdict();
        self.last_counted_at = Some(now);
        match verdict {
            RepVerdict::Valid => self.summary.valid_reps += 1,
            RepVerdict::Invalid => {
                self.summary.invalid_reps += 1;
                for code in &record.issues {
                    *self.summary.issue_counts.entry(*code).or_insert(0) += 1;
                }
            }
        }

        info!(
            exercise = %self.summary.exercise,
            verdict = verdict.as_str(),
            depth = record.reached_target_depth,
            issues = ?record.issues,
            valid_reps = self.summary.valid_reps,
            invalid_reps = self.summary.invalid_reps,
            "Rep counted"
        );

        CycleOutcome::Counted { verdict, record }
    }

    /// Drop the in-flight record without a verdict.
    pub fn abort(&mut self) {
        self.record = None;
    }

    /// Zero every counter and forget the rep-gating timestamp.
    pub fn reset(&mut self) {
        self.record = None;
        self.last_counted_at = None;
        self.summary = SessionSummary::new(self.summary.exercise);
    }

    pub fn record(&self) -> Option<&RepRecord> {
        self.record.as_ref()
    }

    pub fn counters(&self) -> SessionCounters {
        SessionCounters {
            valid_reps: self.summary.valid_reps,
            invalid_reps: self.summary.invalid_reps,
        }
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }
}

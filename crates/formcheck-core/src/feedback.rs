//! Feedback stabilization.
//!
//! Each frame produces a fresh set of candidate cues. The stabilizer picks
//! the most urgent one and decides whether it may replace what is on
//! screen:
//!
//! - Safety-tier cues that outrank the current message preempt it at once.
//! - Rep verdict cues skip the dwell so every completed rep is acknowledged.
//! - Anything else must be wanted for `confirm_frames` consecutive frames
//!   and the current message must have been shown for `min_dwell`.

use formcheck_models::{Cue, CueTier, IssueCode, Severity};
use std::cmp::Ordering;
use std::time::Duration;
use tracing::trace;

/// The message to display for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedFeedback {
    pub cue: Cue,
    /// True when this message differs from the previous frame's.
    pub changed: bool,
}

impl DisplayedFeedback {
    pub fn text(&self) -> &'static str {
        self.cue.text
    }

    pub fn severity(&self) -> Severity {
        self.cue.severity
    }
}

/// What is currently on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackState {
    pub last: Cue,
    pub changed_at: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    cue: Cue,
    frames: u32,
}

/// Selects one displayed message per frame from candidate cues.
#[derive(Debug, Clone)]
pub struct FeedbackStabilizer {
    min_dwell: Duration,
    confirm_frames: u32,
    state: Option<FeedbackState>,
    pending: Option<Pending>,
}

impl FeedbackStabilizer {
    pub fn new(min_dwell: Duration, confirm_frames: u32) -> Self {
        Self {
            min_dwell,
            confirm_frames: confirm_frames.max(1),
            state: None,
            pending: None,
        }
    }

    /// Pick the message to show for this frame.
    ///
    /// The choice depends only on the set of candidates, never on their
    /// order. With no candidates the current message is kept.
    pub fn select(&mut self, candidates: &[Cue], now: Duration) -> DisplayedFeedback {
        let Some(desired) = most_urgent(candidates) else {
            return match self.state {
                Some(state) => unchanged(state.last),
                None => self.show(Cue::new(IssueCode::Ready), now),
            };
        };

        let Some(state) = self.state else {
            return self.show(desired, now);
        };

        if state.last == desired {
            self.pending = None;
            return unchanged(state.last);
        }

        let frames = match self.pending {
            Some(pending) if pending.cue == desired => pending.frames + 1,
            _ => 1,
        };
        self.pending = Some(Pending {
            cue: desired,
            frames,
        });

        let preempts = desired.code.tier() == CueTier::Safety
            && compare(&desired, &state.last) == Ordering::Less;
        let settled = now.saturating_sub(state.changed_at) >= self.min_dwell
            && frames >= self.confirm_frames;

        if preempts || desired.code.bypasses_dwell() || settled {
            self.show(desired, now)
        } else {
            trace!(
                current = %state.last.code,
                wanted = %desired.code,
                frames,
                "Holding current feedback"
            );
            unchanged(state.last)
        }
    }

    /// What is on screen, if anything has been shown since the last reset.
    pub fn state(&self) -> Option<&FeedbackState> {
        self.state.as_ref()
    }

    /// Forget the displayed message so the next selection counts as new.
    pub fn reset(&mut self) {
        self.state = None;
        self.pending = None;
    }

    fn show(&mut self, cue: Cue, now: Duration) -> DisplayedFeedback {
        self.state = Some(FeedbackState {
            last: cue,
            changed_at: now,
        });
        self.pending = None;
        DisplayedFeedback { cue, changed: true }
    }
}

fn unchanged(cue: Cue) -> DisplayedFeedback {
    DisplayedFeedback {
        cue,
        changed: false,
    }
}

fn compare(a: &Cue, b: &Cue) -> Ordering {
    a.rank()
        .cmp(&b.rank())
        .then_with(|| b.severity.cmp(&a.severity))
}

fn most_urgent(candidates: &[Cue]) -> Option<Cue> {
    candidates.iter().copied().min_by(compare)
}

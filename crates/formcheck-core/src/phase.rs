//! Four-phase rep cycle with hysteresis.
//!
//! ```text
//!          angle < lockout                 angle < bottom (held)
//!   UP ───────────────────▶ DESCENDING ──────────────────────▶ BOTTOM
//!   ▲ ◀─────────────────────────┘ angle > up (aborted)           │
//!   │                                                            │ angle > resume
//!   └──────────────────────── ASCENDING ◀────────────────────────┘
//!         angle > up (completed)
//! ```
//!
//! The gaps between the entry and exit thresholds keep a smoothed angle that
//! hovers near one cutoff from flipping phases back and forth.

use formcheck_models::RepPhase;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};

/// Primary-angle thresholds driving the cycle, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    /// Above this the joint counts as fully extended.
    pub up: f64,
    /// Dropping below this from UP starts a rep.
    pub lockout: f64,
    /// Must be held below this to reach BOTTOM.
    pub bottom: f64,
    /// Rising above this leaves BOTTOM.
    pub resume: f64,
    /// Consecutive frames below `bottom` required to enter BOTTOM.
    pub min_bottom_frames: u32,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            up: 155.0,
            lockout: 145.0,
            bottom: 100.0,
            resume: 115.0,
            min_bottom_frames: 2,
        }
    }
}

impl PhaseThresholds {
    /// Require `bottom < resume < lockout < up <= 180` and a positive hold.
    pub fn validate(&self) -> CoreResult<()> {
        let ordered = 0.0 < self.bottom
            && self.bottom < self.resume
            && self.resume < self.lockout
            && self.lockout < self.up
            && self.up <= 180.0;
        if !ordered {
            return Err(CoreError::invalid_thresholds(format!(
                "expected 0 < bottom < resume < lockout < up <= 180, got {}/{}/{}/{}",
                self.bottom, self.resume, self.lockout, self.up
            )));
        }
        if self.min_bottom_frames == 0 {
            return Err(CoreError::invalid_thresholds(
                "min_bottom_frames must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Why a phase change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// UP → DESCENDING: a rep began.
    Started,
    /// DESCENDING → BOTTOM.
    ReachedBottom,
    /// BOTTOM → ASCENDING.
    Rising,
    /// ASCENDING → UP: one full cycle.
    Completed,
    /// DESCENDING → UP without reaching the bottom.
    Aborted,
    /// Any active phase → UP after the subject was lost.
    Escaped,
}

/// A single phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: RepPhase,
    pub to: RepPhase,
    pub kind: TransitionKind,
}

/// Exercise-agnostic rep cycle state machine.
#[derive(Debug, Clone)]
pub struct RepCycleStateMachine {
    thresholds: PhaseThresholds,
    max_lost_frames: u32,
    phase: RepPhase,
    frames_below_bottom: u32,
    lost_frames: u32,
}

impl RepCycleStateMachine {
    /// Create a machine in UP. Thresholds are validated up front.
    pub fn new(thresholds: PhaseThresholds, max_lost_frames: u32) -> CoreResult<Self> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            max_lost_frames: max_lost_frames.max(1),
            phase: RepPhase::Up,
            frames_below_bottom: 0,
            lost_frames: 0,
        })
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    pub fn thresholds(&self) -> &PhaseThresholds {
        &self.thresholds
    }

    /// Consecutive frames without a trustworthy primary angle.
    pub fn lost_frames(&self) -> u32 {
        self.lost_frames
    }

    /// Advance with one confident smoothed primary angle.
    pub fn step(&mut self, angle: f64) -> Option<PhaseTransition> {
        self.lost_frames = 0;
        let t = self.thresholds;

        let next = match self.phase {
            RepPhase::Up if angle < t.lockout => {
                self.frames_below_bottom = 0;
                Some((RepPhase::Descending, TransitionKind::Started))
            }
            RepPhase::Descending => {
                if angle < t.bottom {
                    self.frames_below_bottom += 1;
                } else {
                    self.frames_below_bottom = 0;
                }

                if self.frames_below_bottom >= t.min_bottom_frames {
                    Some((RepPhase::Bottom, TransitionKind::ReachedBottom))
                } else if angle > t.up {
                    Some((RepPhase::Up, TransitionKind::Aborted))
                } else {
                    None
                }
            }
            RepPhase::Bottom if angle > t.resume => {
                Some((RepPhase::Ascending, TransitionKind::Rising))
            }
            RepPhase::Ascending if angle > t.up => {
                Some((RepPhase::Up, TransitionKind::Completed))
            }
            _ => None,
        };

        next.map(|(to, kind)| self.transition(to, kind, angle))
    }

    /// Record a frame with no trustworthy primary angle.
    ///
    /// After `max_lost_frames` consecutive such frames an active rep is
    /// abandoned and the machine returns to UP without completing a cycle.
    pub fn lost(&mut self) -> Option<PhaseTransition> {
        self.lost_frames = self.lost_frames.saturating_add(1);

        if self.phase.is_active() && self.lost_frames >= self.max_lost_frames {
            warn!(
                phase = %self.phase,
                lost_frames = self.lost_frames,
                "Subject lost mid-rep, returning to up without counting"
            );
            return Some(self.transition(RepPhase::Up, TransitionKind::Escaped, f64::NAN));
        }
        None
    }

    /// Return to UP and clear all counters.
    pub fn reset(&mut self) {
        self.phase = RepPhase::Up;
        self.frames_below_bottom = 0;
        self.lost_frames = 0;
    }

    fn transition(&mut self, to: RepPhase, kind: TransitionKind, angle: f64) -> PhaseTransition {
        let from = self.phase;
        self.phase = to;
        self.frames_below_bottom = 0;
        debug!(%from, %to, ?kind, angle, "Phase transition");
        PhaseTransition { from, to, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> RepCycleStateMachine {
        RepCycleStateMachine::new(PhaseThresholds::default(), 3).unwrap()
    }

    fn run(machine: &mut RepCycleStateMachine, angles: &[f64]) -> Vec<PhaseTransition> {
        angles.iter().filter_map(|a| machine.step(*a)).collect()
    }

    #[test]
    fn test_full_cycle_in_order() {
        let mut m = machine();
        let transitions = run(&mut m, &[170.0, 140.0, 90.0, 90.0, 90.0, 120.0, 160.0]);

        let phases: Vec<RepPhase> = transitions.iter().map(|t| t.to).collect();
        assert_eq!(
            phases,
            vec![
                RepPhase::Descending,
                RepPhase::Bottom,
                RepPhase::Ascending,
                RepPhase::Up
            ]
        );
        let completions = transitions
            .iter()
            .filter(|t| t.kind == TransitionKind::Completed)
            .count();
        assert_eq!(completions, 1);
        assert_eq!(m.phase(), RepPhase::Up);
    }

    #[test]
    fn test_shallow_dip_aborts_without_bottom() {
        let mut m = machine();
        let transitions = run(&mut m, &[170.0, 140.0, 170.0]);

        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[1].kind, TransitionKind::Aborted);
        assert!(transitions.iter().all(|t| t.to != RepPhase::Bottom));
        assert!(transitions.iter().all(|t| t.kind != TransitionKind::Completed));
        assert_eq!(m.phase(), RepPhase::Up);
    }

    #[test]
    fn test_single_frame_spike_does_not_reach_bottom() {
        let mut m = machine();
        run(&mut m, &[140.0, 95.0, 105.0, 95.0, 110.0]);
        assert_eq!(m.phase(), RepPhase::Descending);

        run(&mut m, &[95.0, 94.0]);
        assert_eq!(m.phase(), RepPhase::Bottom);
    }

    #[test]
    fn test_hysteresis_gap_holds_phase() {
        let mut m = machine();
        run(&mut m, &[140.0, 90.0, 90.0]);
        assert_eq!(m.phase(), RepPhase::Bottom);

        // Hovering between bottom and resume keeps BOTTOM.
        assert!(run(&mut m, &[101.0, 110.0, 99.0, 114.9]).is_empty());
        assert_eq!(m.phase(), RepPhase::Bottom);

        run(&mut m, &[116.0]);
        assert_eq!(m.phase(), RepPhase::Ascending);

        // Hovering between lockout and up keeps ASCENDING.
        assert!(run(&mut m, &[150.0, 154.0, 130.0]).is_empty());
        assert_eq!(m.phase(), RepPhase::Ascending);
    }

    #[test]
    fn test_lost_subject_escapes_to_up() {
        let mut m = machine();
        run(&mut m, &[140.0, 90.0, 90.0]);
        assert_eq!(m.phase(), RepPhase::Bottom);

        assert!(m.lost().is_none());
        assert!(m.lost().is_none());
        let escape = m.lost().unwrap();
        assert_eq!(escape.kind, TransitionKind::Escaped);
        assert_eq!(escape.from, RepPhase::Bottom);
        assert_eq!(m.phase(), RepPhase::Up);
    }

    #[test]
    fn test_confident_frame_resets_lost_counter() {
        let mut m = machine();
        run(&mut m, &[140.0]);
        m.lost();
        m.lost();
        m.step(130.0);
        assert_eq!(m.lost_frames(), 0);
        assert!(m.lost().is_none());
        assert_eq!(m.phase(), RepPhase::Descending);
    }

    #[test]
    fn test_lost_in_up_never_escapes() {
        let mut m = machine();
        for _ in 0..10 {
            assert!(m.lost().is_none());
        }
        assert_eq!(m.phase(), RepPhase::Up);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let thresholds = PhaseThresholds {
            resume: 90.0,
            ..Default::default()
        };
        assert!(matches!(
            RepCycleStateMachine::new(thresholds, 3),
            Err(CoreError::InvalidThresholds(_))
        ));

        let no_hold = PhaseThresholds {
            min_bottom_frames: 0,
            ..Default::default()
        };
        assert!(no_hold.validate().is_err());
    }

    #[test]
    fn test_reset_mid_rep() {
        let mut m = machine();
        run(&mut m, &[140.0, 90.0]);
        m.reset();
        assert_eq!(m.phase(), RepPhase::Up);
        // The half-counted bottom hold does not carry over.
        run(&mut m, &[140.0, 90.0]);
        assert_eq!(m.phase(), RepPhase::Descending);
    }
}

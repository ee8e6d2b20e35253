//! Per-frame exercise analysis.
//!
//! One [`ExerciseAnalyzer`] serves one session. Each frame runs:
//!
//! 1. side selection
//! 2. raw angles and smoothing
//! 3. form checks, debounced per issue
//! 4. the rep cycle state machine
//! 5. rep validation on completion
//! 6. feedback stabilization
//!
//! Frames without a trustworthy primary angle skip steps 2 to 5, keep the
//! last known readings, and count toward the subject-lost escape.

use formcheck_models::{
    Cue, ExerciseKind, FrameResult, IssueCode, Landmark, RepPhase, SessionSummary, Side,
};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::AnalyzerConfig;
use crate::debounce::IssueDebouncer;
use crate::error::CoreResult;
use crate::feedback::{DisplayedFeedback, FeedbackStabilizer};
use crate::framing::FramingCheck;
use crate::metrics;
use crate::phase::{PhaseTransition, RepCycleStateMachine, TransitionKind};
use crate::pose::PoseFrame;
use crate::profile::{CheckContext, ExerciseProfile};
use crate::side::SideSelector;
use crate::smoother::AngleSmoother;
use crate::validator::{CycleOutcome, RepValidator, RepVerdict, SessionCounters};

/// Reading reported before any confident sample.
const INITIAL_ANGLE: f64 = 180.0;

/// Stateful analyzer for one exercise stream.
#[derive(Debug)]
pub struct ExerciseAnalyzer {
    profile: ExerciseProfile,
    config: AnalyzerConfig,
    framing: FramingCheck,
    origin: Instant,

    smoother: AngleSmoother,
    machine: RepCycleStateMachine,
    validator: RepValidator,
    stabilizer: FeedbackStabilizer,
    side: SideSelector,
    debouncer: IssueDebouncer,

    trajectory: VecDeque<[f64; 2]>,
    status: Cue,
    hover_frames: u32,
    primary_angle: f64,
    secondary_angle: f64,
    depth_guide: (f64, f64),
}

impl ExerciseAnalyzer {
    /// Build an analyzer from a profile, validating thresholds and config.
    pub fn new(profile: ExerciseProfile, config: AnalyzerConfig) -> CoreResult<Self> {
        config.validate()?;
        let machine = RepCycleStateMachine::new(profile.thresholds, config.max_lost_frames)?;

        Ok(Self {
            framing: FramingCheck::new(config.framing_margin, profile.upright),
            origin: Instant::now(),
            smoother: AngleSmoother::new(config.smoothing_alpha),
            machine,
            validator: RepValidator::new(
                profile.kind,
                config.min_rep_interval(),
                config.max_low_confidence_frames,
            ),
            stabilizer: FeedbackStabilizer::new(
                config.feedback_min_dwell(),
                config.feedback_confirm_frames,
            ),
            side: SideSelector::new(config.side_switch_margin, config.side_sticky_frames),
            debouncer: IssueDebouncer::new(),
            trajectory: VecDeque::with_capacity(config.trajectory_len),
            status: Cue::with_text(IssueCode::Ready, profile.texts.ready),
            hover_frames: 0,
            primary_angle: INITIAL_ANGLE,
            secondary_angle: INITIAL_ANGLE,
            depth_guide: (0.0, 0.0),
            profile,
            config,
        })
    }

    /// Analyzer for a supported exercise with its default profile.
    pub fn for_kind(kind: ExerciseKind, config: AnalyzerConfig) -> CoreResult<Self> {
        Self::new(ExerciseProfile::for_kind(kind), config)
    }

    pub fn kind(&self) -> ExerciseKind {
        self.profile.kind
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn phase(&self) -> RepPhase {
        self.machine.phase()
    }

    pub fn counters(&self) -> SessionCounters {
        self.validator.counters()
    }

    pub fn summary(&self) -> &SessionSummary {
        self.validator.summary()
    }

    /// Process one frame, timed from analyzer creation.
    pub fn process(&mut self, landmarks: &[Landmark]) -> FrameResult {
        let now = self.origin.elapsed();
        self.process_at(landmarks, now)
    }

    /// Process one frame captured `now` after the session started.
    ///
    /// Timestamps must not go backwards between calls.
    pub fn process_at(&mut self, landmarks: &[Landmark], now: Duration) -> FrameResult {
        let started = Instant::now();
        let frame = PoseFrame::from_landmarks(landmarks);
        let result = self.analyze(&frame, now);
        metrics::record_frame(self.profile.kind.as_str(), started.elapsed().as_secs_f64());
        result
    }

    /// Return to a fresh state: zero counters, UP phase, no rep in flight,
    /// and no feedback memory. Safe at any point.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.validator.reset();
        self.stabilizer.reset();
        self.smoother.reset();
        self.side.reset();
        self.debouncer.clear();
        self.trajectory.clear();
        self.status = self.ready_cue();
        self.hover_frames = 0;
        self.primary_angle = INITIAL_ANGLE;
        self.secondary_angle = INITIAL_ANGLE;
        self.depth_guide = (0.0, 0.0);
        info!(exercise = %self.profile.kind, "Analyzer reset");
    }

    fn analyze(&mut self, frame: &PoseFrame, now: Duration) -> FrameResult {
        if frame.is_empty() {
            return self.untracked(now);
        }

        let side = self.side.select(frame, self.profile.side_joints);
        let threshold = self.config.visibility_threshold;

        let primary_spec = self.profile.primary;
        let raw_primary = primary_spec
            .measure(frame, side)
            .filter(|_| primary_spec.is_confident(frame, side, threshold));
        let Some(raw_primary) = raw_primary else {
            return self.untracked(now);
        };

        if self.status.code == IssueCode::SubjectLost {
            self.status = self.ready_cue();
        }

        // Angles
        let primary = self.smoother.update(primary_spec.name, raw_primary, true);
        let secondary_spec = self.profile.secondary;
        let secondary = match secondary_spec.measure(frame, side) {
            Some(raw) => self.smoother.update(
                secondary_spec.name,
                raw,
                secondary_spec.is_confident(frame, side, threshold),
            ),
            None => self
                .smoother
                .value(secondary_spec.name)
                .unwrap_or(self.secondary_angle),
        };
        self.primary_angle = primary;
        self.secondary_angle = secondary;

        if let Some(guide) = self.profile.depth_guide(frame, side) {
            self.depth_guide = guide;
        }
        if let Some((x, y)) = frame.point(side, self.profile.trail_joint) {
            if self.trajectory.len() >= self.config.trajectory_len {
                self.trajectory.pop_front();
            }
            self.trajectory.push_back([x, y]);
        }

        // Form checks against the phase this frame started in
        let before = self.machine.phase();
        let rep_active = before.is_active();
        let thresholds = *self.machine.thresholds();
        let ctx = CheckContext {
            frame,
            side,
            primary,
            secondary,
            phase: before,
            thresholds: &thresholds,
        };

        let mut raised: Vec<Cue> = Vec::new();
        for check in &self.profile.checks {
            // Unreliable joints leave the issue counter untouched this frame
            if !check.is_confident(frame, side, threshold) {
                continue;
            }
            let firing = (!check.active_only || rep_active) && (check.predicate)(&ctx);
            if self
                .debouncer
                .update(check.code, firing, rep_active, check.frames_required)
            {
                raised.push(Cue::with_text(check.code, check.text));
            }
        }
        let depth_now = self.profile.depth_achieved(&ctx);

        // Cycle
        let transition = self.machine.step(primary);
        let after = self.machine.phase();
        if let Some(t) = transition {
            self.hover_frames = 0;
            if t.kind == TransitionKind::Started {
                self.validator.start(now);
                self.debouncer.clear();
                raised.clear();
            }
        }

        let completed = matches!(transition, Some(t) if t.kind == TransitionKind::Completed);
        if after.is_active() || completed {
            let in_bottom = before == RepPhase::Bottom || after == RepPhase::Bottom;
            let flags = raised
                .iter()
                .map(|cue| cue.code)
                .filter(IssueCode::invalidates_rep);
            self.validator.observe(flags, depth_now && in_bottom);
        }

        if let Some(t) = transition {
            self.on_transition(t, now);
        }

        // Candidates
        let mut candidates = raised;
        let good_form = !candidates.iter().any(|cue| cue.code.invalidates_rep());
        if let Some(cue) = self.hover_cue(after, primary) {
            candidates.push(cue);
        }
        if !self.framing.is_full_body_in_frame(frame) {
            candidates.push(Cue::new(IssueCode::OutOfFrame));
        }
        candidates.push(self.status);

        let shown = self.stabilizer.select(&candidates, now);
        self.build_result(shown, good_form, true)
    }

    fn on_transition(&mut self, transition: PhaseTransition, now: Duration) {
        match transition.kind {
            TransitionKind::ReachedBottom => {
                let deep = self
                    .validator
                    .record()
                    .is_some_and(|record| record.reached_target_depth);
                if deep {
                    self.status =
                        Cue::with_text(IssueCode::GoodDepth, self.profile.texts.good_depth);
                }
            }
            TransitionKind::Completed => self.finish_rep(now),
            TransitionKind::Aborted | TransitionKind::Escaped => {
                debug!(kind = ?transition.kind, "Rep abandoned");
                self.validator.abort();
            }
            TransitionKind::Started | TransitionKind::Rising => {}
        }
    }

    fn finish_rep(&mut self, now: Duration) {
        let exercise = self.profile.kind.as_str();
        match self.validator.complete(now) {
            CycleOutcome::Counted { verdict, record } => {
                metrics::record_rep(exercise, verdict);
                self.status = match verdict {
                    RepVerdict::Valid => Cue::new(IssueCode::GoodRep),
                    RepVerdict::Invalid if !record.reached_target_depth => {
                        Cue::with_text(IssueCode::RepShallow, self.profile.texts.shallow_rep)
                    }
                    RepVerdict::Invalid => match record.top_issue() {
                        Some(code) => Cue::with_text(IssueCode::RepFaulty, self.issue_text(code)),
                        None => Cue::new(IssueCode::RepFaulty),
                    },
                };
            }
            CycleOutcome::Discarded { reason } => {
                metrics::record_discard(exercise, reason);
            }
        }
    }

    /// Coaching for lingering short of depth or short of lockout.
    fn hover_cue(&mut self, phase: RepPhase, primary: f64) -> Option<Cue> {
        let thresholds = self.machine.thresholds();
        let (lingering, limit, code, text) = match phase {
            RepPhase::Descending => (
                primary > thresholds.bottom,
                self.config.depth_hover_frames,
                IssueCode::InsufficientDepth,
                self.profile.texts.go_lower,
            ),
            RepPhase::Ascending => (
                primary < thresholds.up,
                self.config.lockout_hover_frames,
                IssueCode::IncompleteLockout,
                self.profile.texts.lockout,
            ),
            RepPhase::Up | RepPhase::Bottom => {
                self.hover_frames = 0;
                return None;
            }
        };

        if lingering {
            self.hover_frames += 1;
        } else {
            self.hover_frames = 0;
        }
        (self.hover_frames >= limit).then(|| Cue::with_text(code, text))
    }

    /// A frame without a trustworthy primary angle.
    fn untracked(&mut self, now: Duration) -> FrameResult {
        match self.machine.lost() {
            Some(_) => {
                metrics::record_escape(self.profile.kind.as_str());
                self.validator.abort();
                self.debouncer.clear();
                self.hover_frames = 0;
            }
            None if self.machine.phase().is_active() => self.validator.observe_low_confidence(),
            None => {}
        }

        if self.machine.lost_frames() >= self.config.lost_cue_frames {
            self.status = Cue::new(IssueCode::SubjectLost);
        }

        let shown = self.stabilizer.select(&[self.status], now);
        self.build_result(shown, true, false)
    }

    fn build_result(
        &self,
        shown: DisplayedFeedback,
        good_form: bool,
        subject_detected: bool,
    ) -> FrameResult {
        let counters = self.validator.counters();
        FrameResult {
            primary_angle: self.primary_angle,
            secondary_angle: self.secondary_angle,
            stage: self.machine.phase(),
            valid_reps: counters.valid_reps,
            invalid_reps: counters.invalid_reps,
            rep_count: counters.total(),
            feedback: shown.text().to_string(),
            feedback_level: shown.severity(),
            feedback_changed: shown.changed,
            good_form,
            subject_detected,
            target_depth_y: self.depth_guide.0,
            current_depth_y: self.depth_guide.1,
            trajectory: self.trajectory.iter().copied().collect(),
            side: self.current_side(),
        }
    }

    fn current_side(&self) -> Side {
        self.side.current()
    }

    fn ready_cue(&self) -> Cue {
        Cue::with_text(IssueCode::Ready, self.profile.texts.ready)
    }

    fn issue_text(&self, code: IssueCode) -> &'static str {
        self.profile
            .checks
            .iter()
            .find(|check| check.code == code)
            .map_or_else(|| code.message(), |check| check.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcheck_models::{Joint, Severity};

    /// Side-view squat pose with the shin vertical and the thigh tilted so
    /// the knee angle is `knee_deg`.
    fn squat_pose(knee_deg: f64, visibility: f64) -> Vec<Landmark> {
        let ankle = (0.5, 0.9);
        let knee = (0.5, 0.7);
        let thigh = 0.2;
        let theta = (90.0 - knee_deg).to_radians();
        let hip = (knee.0 + thigh * theta.cos(), knee.1 + thigh * theta.sin());
        let lean = 30f64.to_radians();
        let shoulder = (hip.0 - 0.25 * lean.sin(), hip.1 - 0.25 * lean.cos());
        let nose = (shoulder.0 - 0.02, shoulder.1 - 0.1);

        let mut landmarks = vec![Landmark::new(0, nose.0, nose.1, visibility)];
        for side in [Side::Left, Side::Right] {
            for (joint, (x, y)) in [
                (Joint::Shoulder, shoulder),
                (Joint::Hip, hip),
                (Joint::Knee, knee),
                (Joint::Ankle, ankle),
            ] {
                landmarks.push(Landmark::new(side.landmark(joint).index(), x, y, visibility));
            }
        }
        landmarks
    }

    fn analyzer() -> ExerciseAnalyzer {
        ExerciseAnalyzer::for_kind(ExerciseKind::Squat, AnalyzerConfig::default()).unwrap()
    }

    fn feed(analyzer: &mut ExerciseAnalyzer, t: &mut u64, angles: &[f64]) -> FrameResult {
        let mut last = None;
        for angle in angles {
            last = Some(analyzer.process_at(&squat_pose(*angle, 0.9), Duration::from_millis(*t)));
            *t += 50;
        }
        last.unwrap()
    }

    fn good_rep() -> Vec<f64> {
        let mut angles = vec![170.0; 3];
        angles.extend([150.0, 130.0, 110.0, 90.0, 80.0, 80.0, 80.0, 80.0, 80.0]);
        angles.extend([100.0, 130.0, 150.0, 170.0, 175.0, 175.0, 175.0, 175.0, 175.0, 175.0]);
        angles
    }

    #[test]
    fn test_initial_frame() {
        let mut a = analyzer();
        let result = a.process_at(&squat_pose(175.0, 0.9), Duration::ZERO);
        assert_eq!(result.stage, RepPhase::Up);
        assert_eq!(result.feedback, "Start Squats");
        assert_eq!(result.feedback_level, Severity::Success);
        assert!(result.feedback_changed);
        assert!(result.subject_detected);
        assert!((result.primary_angle - 175.0).abs() < 1e-6);
        assert_eq!(result.trajectory.len(), 1);
    }

    #[test]
    fn test_good_rep_counts_valid() {
        let mut a = analyzer();
        let mut t = 0;
        let result = feed(&mut a, &mut t, &good_rep());
        assert_eq!(result.valid_reps, 1);
        assert_eq!(result.invalid_reps, 0);
        assert_eq!(result.stage, RepPhase::Up);
        assert_eq!(result.feedback, "Good rep!");
    }

    #[test]
    fn test_empty_frames_keep_last_values() {
        let mut a = analyzer();
        let tracked = a.process_at(&squat_pose(170.0, 0.9), Duration::ZERO);
        let lost = a.process_at(&[], Duration::from_millis(50));
        assert!(!lost.subject_detected);
        assert_eq!(lost.primary_angle, tracked.primary_angle);
        assert_eq!(lost.secondary_angle, tracked.secondary_angle);
        assert_eq!(lost.target_depth_y, tracked.target_depth_y);
        assert_eq!(lost.trajectory, tracked.trajectory);
    }

    #[test]
    fn test_low_visibility_does_not_move_angles() {
        let mut a = analyzer();
        a.process_at(&squat_pose(170.0, 0.9), Duration::ZERO);
        let result = a.process_at(&squat_pose(60.0, 0.2), Duration::from_millis(50));
        assert!((result.primary_angle - 170.0).abs() < 1e-6);
        assert_eq!(result.stage, RepPhase::Up);
    }

    #[test]
    fn test_subject_lost_escapes_and_cues() {
        let mut a = analyzer();
        let mut t = 0;
        feed(&mut a, &mut t, &[170.0, 130.0, 110.0, 90.0, 80.0, 80.0, 80.0, 80.0]);
        assert_eq!(a.phase(), RepPhase::Bottom);

        let mut result = None;
        for _ in 0..a.config().max_lost_frames {
            result = Some(a.process_at(&[], Duration::from_millis(t)));
            t += 50;
        }
        let result = result.unwrap();
        assert_eq!(result.stage, RepPhase::Up);
        assert_eq!(result.rep_count, 0);
        assert_eq!(result.feedback, "Position yourself in frame");
        assert_eq!(a.summary().discarded_reps, 0);
    }

    #[test]
    fn test_trajectory_is_bounded() {
        let mut a = analyzer();
        let mut t = 0;
        let result = feed(&mut a, &mut t, &[170.0; 50]);
        assert_eq!(result.trajectory.len(), 30);
    }

    #[test]
    fn test_reset_mid_rep() {
        let mut a = analyzer();
        let mut t = 0;
        feed(&mut a, &mut t, &good_rep());
        feed(&mut a, &mut t, &[170.0, 130.0, 90.0, 80.0, 80.0]);
        assert!(a.phase().is_active());

        a.reset();
        assert_eq!(a.phase(), RepPhase::Up);
        assert_eq!(a.counters(), SessionCounters::default());

        let result = feed(&mut a, &mut t, &good_rep());
        assert_eq!(result.valid_reps, 1);
        assert_eq!(result.invalid_reps, 0);
    }

    #[test]
    fn test_unrepresentable_interval_is_rejected() {
        let config = AnalyzerConfig {
            min_rep_interval_secs: 1e300,
            ..Default::default()
        };
        let result = ExerciseAnalyzer::for_kind(ExerciseKind::Squat, config);
        assert!(matches!(result, Err(crate::error::CoreError::InvalidConfig(_))));
    }
}

//! Multi-rep analyzer scenarios at 20 frames per second.

use formcheck_core::{AnalyzerConfig, ExerciseAnalyzer};
use formcheck_models::{
    ExerciseKind, FrameResult, IssueCode, Joint, Landmark, RepPhase, Severity,
};
use std::time::Duration;

use super::poses;

const FRAME_MS: u64 = 50;

struct Clip {
    analyzer: ExerciseAnalyzer,
    t: u64,
}

impl Clip {
    fn new(kind: ExerciseKind) -> Self {
        let analyzer = ExerciseAnalyzer::for_kind(kind, AnalyzerConfig::default())
            .expect("default config is valid");
        Self { analyzer, t: 0 }
    }

    fn frame(&mut self, landmarks: &[Landmark]) -> FrameResult {
        let result = self
            .analyzer
            .process_at(landmarks, Duration::from_millis(self.t));
        self.t += FRAME_MS;
        result
    }

    fn squat(&mut self, knees: &[f64]) -> Vec<FrameResult> {
        knees
            .iter()
            .map(|knee| self.frame(&poses::squat(*knee, 0.9)))
            .collect()
    }

    fn pushup(&mut self, elbows: &[f64], hip_drop: f64) -> Vec<FrameResult> {
        elbows
            .iter()
            .map(|elbow| self.frame(&poses::pushup(*elbow, hip_drop)))
            .collect()
    }
}

#[test]
fn test_squat_session_one_good_one_shallow() {
    let mut clip = Clip::new(ExerciseKind::Squat);
    let clean = [
        170.0, 170.0, 150.0, 130.0, 110.0, 90.0, 80.0, 80.0, 80.0, 80.0, 100.0, 130.0, 150.0,
        170.0, 175.0, 175.0, 175.0, 175.0,
    ];
    let shallow = [
        160.0, 145.0, 130.0, 115.0, 100.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 110.0, 130.0,
        150.0, 170.0, 175.0, 175.0, 175.0, 175.0, 175.0, 175.0, 175.0,
    ];

    let first = clip.squat(&clean);
    let done = first.last().unwrap();
    assert_eq!(done.valid_reps, 1);
    assert_eq!(done.invalid_reps, 0);
    assert_eq!(done.feedback, "Good rep!");
    assert!(first.iter().any(|r| r.stage == RepPhase::Bottom));

    let second = clip.squat(&shallow);
    let done = second.last().unwrap();
    assert_eq!(done.valid_reps, 1);
    assert_eq!(done.invalid_reps, 1);
    assert_eq!(done.rep_count, 2);
    assert_eq!(done.stage, RepPhase::Up);
    assert_eq!(done.feedback, "Go deeper next rep");
    assert_eq!(done.feedback_level, Severity::Warning);

    let summary = clip.analyzer.summary();
    assert_eq!(summary.total_reps(), 2);
    assert_eq!(summary.discarded_reps, 0);
    assert_eq!(summary.most_common_issue(), None);
}

#[test]
fn test_rep_counts_only_rise_by_one() {
    let mut clip = Clip::new(ExerciseKind::Squat);
    let results = clip.squat(&poses::full_rep());
    for pair in results.windows(2) {
        let step = pair[1].rep_count - pair[0].rep_count;
        assert!(step <= 1);
    }
    assert_eq!(results.last().unwrap().rep_count, 1);
}

#[test]
fn test_too_fast_rep_is_discarded() {
    let mut clip = Clip::new(ExerciseKind::Squat);
    clip.squat(&poses::full_rep());
    let result = clip
        .squat(&[120.0, 80.0, 80.0, 80.0, 80.0, 170.0, 175.0, 175.0])
        .pop()
        .unwrap();

    assert_eq!(result.stage, RepPhase::Up);
    assert_eq!(result.rep_count, 1);
    assert_eq!(clip.analyzer.summary().discarded_reps, 1);

    // A paced rep afterwards counts again.
    let result = clip.squat(&poses::full_rep()).pop().unwrap();
    assert_eq!(result.valid_reps, 2);
}

#[test]
fn test_occluded_frame_mid_rep_discards_it() {
    let mut clip = Clip::new(ExerciseKind::Squat);
    let knees = poses::full_rep();
    for (i, knee) in knees.iter().enumerate() {
        let visibility = if i == 8 { 0.2 } else { 0.9 };
        let result = clip.frame(&poses::squat(*knee, visibility));
        if i == 8 {
            assert!(!result.subject_detected);
        }
    }

    assert_eq!(clip.analyzer.phase(), RepPhase::Up);
    assert_eq!(clip.analyzer.counters().total(), 0);
    assert_eq!(clip.analyzer.summary().discarded_reps, 1);
}

#[test]
fn test_reset_then_identical_clip_matches_fresh_run() {
    let mut fresh = Clip::new(ExerciseKind::Squat);
    let expected = fresh.squat(&poses::full_rep());

    let mut reused = Clip::new(ExerciseKind::Squat);
    reused.squat(&[170.0, 130.0, 90.0, 80.0, 80.0]);
    reused.analyzer.reset();
    reused.t = 0;
    let actual = reused.squat(&poses::full_rep());

    for (a, b) in actual.iter().zip(&expected) {
        assert_eq!(a.stage, b.stage);
        assert_eq!(a.rep_count, b.rep_count);
        assert_eq!(a.feedback, b.feedback);
        assert!((a.primary_angle - b.primary_angle).abs() < 1e-9);
    }
}

#[test]
fn test_pushup_clean_rep() {
    let mut clip = Clip::new(ExerciseKind::Pushup);
    let results = clip.pushup(&poses::full_rep(), 0.0);
    let done = results.last().unwrap();

    assert_eq!(done.valid_reps, 1);
    assert_eq!(done.invalid_reps, 0);
    assert!(results.iter().all(|r| r.good_form));
    assert!(results
        .iter()
        .any(|r| r.feedback == "Good depth! Push up!"));
    // The shoulder is the tracked point and the wrist is the depth target.
    assert!((done.current_depth_y - 0.5).abs() < 1e-9);
}

#[test]
fn test_pushup_sagging_rep_is_invalid() {
    let mut clip = Clip::new(ExerciseKind::Pushup);
    let results = clip.pushup(&poses::full_rep(), 0.09);
    let done = results.last().unwrap();

    assert_eq!(done.valid_reps, 0);
    assert_eq!(done.invalid_reps, 1);
    assert!(results.iter().any(|r| !r.good_form));
    assert!(results.iter().any(|r| r.feedback == "Keep body straight!"));
    assert!(done.secondary_angle < 150.0);

    let summary = clip.analyzer.summary();
    assert_eq!(summary.issue_counts.get(&IssueCode::BodySag), Some(&1));
    assert_eq!(summary.most_common_issue(), Some(IssueCode::BodySag));
}

#[test]
fn test_pushup_sag_outside_rep_is_ignored() {
    let mut clip = Clip::new(ExerciseKind::Pushup);
    let results = clip.pushup(&[175.0; 20], 0.09);
    assert!(results.iter().all(|r| r.good_form));
    assert!(results.iter().all(|r| r.feedback == "Start Push-ups"));
}

#[test]
fn test_extreme_lean_counts_against_a_visible_shoulder() {
    let mut clip = Clip::new(ExerciseKind::Squat);
    for knee in poses::full_rep() {
        clip.frame(&poses::squat_leaning(knee, 75.0, 0.95));
    }

    let summary = clip.analyzer.summary();
    assert_eq!(summary.invalid_reps, 1);
    assert_eq!(summary.issue_counts.get(&IssueCode::BackRounding), Some(&1));
}

#[test]
fn test_unreliable_shoulder_does_not_flag_rep() {
    let mut clip = Clip::new(ExerciseKind::Squat);
    let results: Vec<FrameResult> = poses::full_rep()
        .into_iter()
        .map(|knee| {
            let pose = poses::dim(poses::squat_leaning(knee, 75.0, 0.95), &[Joint::Shoulder], 0.1);
            clip.frame(&pose)
        })
        .collect();
    let done = results.last().unwrap();

    assert_eq!(done.valid_reps, 1);
    assert_eq!(done.invalid_reps, 0);
    assert!(results.iter().all(|r| r.good_form));
    assert!(results.iter().all(|r| r.feedback != "Keep your back straight!"));
    assert!(clip.analyzer.summary().issue_counts.is_empty());
}

#[test]
fn test_pushup_sag_on_unreliable_hips_is_not_flagged() {
    let mut clip = Clip::new(ExerciseKind::Pushup);
    let results: Vec<FrameResult> = poses::full_rep()
        .into_iter()
        .map(|elbow| {
            let pose = poses::dim(poses::pushup(elbow, 0.09), &[Joint::Hip, Joint::Ankle], 0.2);
            clip.frame(&pose)
        })
        .collect();
    let done = results.last().unwrap();

    assert_eq!(done.valid_reps, 1);
    assert_eq!(done.invalid_reps, 0);
    assert!(results.iter().all(|r| r.good_form));
    assert!(results.iter().all(|r| r.feedback != "Keep body straight!"));
    assert!(clip.analyzer.summary().issue_counts.is_empty());
}

//! Session sequencing over the wire message types.

use formcheck_core::{analyzer_for, AnalyzerConfig, Session};
use formcheck_models::{ClientMessage, RepPhase, ServerMessage, SessionId};

use super::poses;

fn session(exercise: &str) -> Session {
    let analyzer = analyzer_for(exercise, AnalyzerConfig::default()).expect("valid config");
    Session::with_id(SessionId::from_string("integration"), analyzer)
}

fn squat_frame(seq: u64, knee: f64) -> ClientMessage {
    ClientMessage::Frame {
        seq,
        timestamp_ms: Some(seq * 50),
        landmarks: poses::squat(knee, 0.9),
    }
}

#[test]
fn test_session_counts_rep_from_wire_messages() {
    let mut s = session("squat");
    let mut last = None;
    for (seq, knee) in poses::full_rep().into_iter().enumerate() {
        last = Some(s.handle(squat_frame(seq as u64, knee)));
    }

    match last {
        Some(ServerMessage::Analysis { result, .. }) => {
            assert_eq!(result.valid_reps, 1);
            assert_eq!(result.stage, RepPhase::Up);
        }
        other => panic!("unexpected reply: {:?}", other),
    }
    assert_eq!(s.summary().valid_reps, 1);
}

#[test]
fn test_late_frame_after_reset_cannot_touch_new_state() {
    let mut s = session("squat");
    let rep = poses::full_rep();
    for (seq, knee) in rep.iter().enumerate() {
        s.handle(squat_frame(seq as u64, *knee));
    }
    let sent = rep.len() as u64;

    let baseline = match s.handle(ClientMessage::Reset) {
        ServerMessage::ResetAck { baseline, .. } => baseline,
        other => panic!("unexpected reply: {:?}", other),
    };
    assert_eq!(baseline, sent);

    // A deep frame captured before the reset arrives late.
    let late = s.handle(squat_frame(sent - 1, 80.0));
    assert_eq!(late.type_str(), "stale");
    assert_eq!(s.analyzer().phase(), RepPhase::Up);
    assert_eq!(s.summary().total_reps(), 0);

    match s.handle(squat_frame(sent, 175.0)) {
        ServerMessage::Analysis { result, .. } => {
            assert_eq!(result.rep_count, 0);
            assert_eq!(result.feedback, "Start Squats");
            assert!(result.feedback_changed);
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[test]
fn test_unknown_exercise_falls_back_to_squat() {
    let s = session("deadlift");
    assert_eq!(s.summary().exercise.as_str(), "squat");
}

//! Synthetic side-view poses with exact joint angles.

use formcheck_models::{Joint, Landmark, PoseLandmark, Side};

fn both_sides(points: &[(Joint, (f64, f64))], visibility: f64) -> Vec<Landmark> {
    let mut landmarks = Vec::with_capacity(points.len() * 2);
    for side in [Side::Left, Side::Right] {
        for (joint, (x, y)) in points {
            landmarks.push(Landmark::new(
                side.landmark(*joint).index(),
                *x,
                *y,
                visibility,
            ));
        }
    }
    landmarks
}

/// Squat with a vertical shin, the thigh rotated so the knee angle is
/// `knee_deg`, and the torso leaning 30 degrees forward.
pub fn squat(knee_deg: f64, visibility: f64) -> Vec<Landmark> {
    squat_leaning(knee_deg, 30.0, visibility)
}

/// Squat with the torso leaning `lean_deg` forward from vertical.
pub fn squat_leaning(knee_deg: f64, lean_deg: f64, visibility: f64) -> Vec<Landmark> {
    let ankle = (0.5, 0.9);
    let knee = (0.5, 0.7);
    let theta = (90.0 - knee_deg).to_radians();
    let hip = (knee.0 + 0.2 * theta.cos(), knee.1 + 0.2 * theta.sin());
    let lean = lean_deg.to_radians();
    let shoulder = (hip.0 - 0.25 * lean.sin(), hip.1 - 0.25 * lean.cos());
    let nose = (shoulder.0 - 0.02, shoulder.1 - 0.1);

    let mut landmarks = vec![Landmark::new(
        PoseLandmark::Nose.index(),
        nose.0,
        nose.1,
        visibility,
    )];
    landmarks.extend(both_sides(
        &[
            (Joint::Shoulder, shoulder),
            (Joint::Hip, hip),
            (Joint::Knee, knee),
            (Joint::Ankle, ankle),
        ],
        visibility,
    ));
    landmarks
}

/// Horizontal plank with the elbow bent to `elbow_deg`. `hip_drop` lowers
/// the hip below the shoulder-ankle line.
pub fn pushup(elbow_deg: f64, hip_drop: f64) -> Vec<Landmark> {
    let shoulder = (0.3, 0.5);
    let elbow = (0.3, 0.65);
    let bend = elbow_deg.to_radians();
    let wrist = (elbow.0 + 0.15 * bend.sin(), elbow.1 - 0.15 * bend.cos());
    let hip = (0.55, 0.5 + hip_drop);
    let knee = (0.7, 0.5 + hip_drop / 2.0);
    let ankle = (0.85, 0.5);
    let ear = (0.25, 0.48);
    let nose = (0.22, 0.49);

    let mut landmarks = vec![Landmark::new(PoseLandmark::Nose.index(), nose.0, nose.1, 0.9)];
    landmarks.extend(both_sides(
        &[
            (Joint::Ear, ear),
            (Joint::Shoulder, shoulder),
            (Joint::Elbow, elbow),
            (Joint::Wrist, wrist),
            (Joint::Hip, hip),
            (Joint::Knee, knee),
            (Joint::Ankle, ankle),
        ],
        0.9,
    ));
    landmarks
}

/// Lower the visibility of `joints` on both sides.
pub fn dim(mut landmarks: Vec<Landmark>, joints: &[Joint], visibility: f64) -> Vec<Landmark> {
    for landmark in &mut landmarks {
        let hit = joints.iter().any(|joint| {
            [Side::Left, Side::Right]
                .iter()
                .any(|side| side.landmark(*joint).index() == landmark.id)
        });
        if hit {
            landmark.visibility = visibility;
        }
    }
    landmarks
}

/// One controlled rep: settle at the top, sink, hold, stand back up.
pub fn full_rep() -> Vec<f64> {
    let mut angles = vec![170.0; 3];
    angles.extend([150.0, 130.0, 110.0, 90.0, 80.0, 80.0, 80.0, 80.0, 80.0]);
    angles.extend([100.0, 130.0, 150.0, 170.0, 175.0, 175.0, 175.0, 175.0, 175.0, 175.0]);
    angles
}

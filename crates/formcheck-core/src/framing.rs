//! Full-body framing check.
//!
//! Only feeds the "step back" status message; rep counting never depends on
//! it.

use formcheck_models::PoseLandmark;

use crate::pose::PoseFrame;

/// Landmarks that must be inside the frame: head, shoulders, hips, knees, ankles.
pub const FRAMING_LANDMARKS: [PoseLandmark; 9] = [
    PoseLandmark::Nose,
    PoseLandmark::LeftShoulder,
    PoseLandmark::RightShoulder,
    PoseLandmark::LeftHip,
    PoseLandmark::RightHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::RightKnee,
    PoseLandmark::LeftAnkle,
    PoseLandmark::RightAnkle,
];

/// Minimum extent of the key landmarks along at least one axis.
pub const MIN_BODY_SPAN: f64 = 0.15;

/// Checks that the whole body is visible with some room to spare.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingCheck {
    pub margin: f64,
    /// Also require the head to sit well above the lower ankle.
    pub require_vertical_span: bool,
}

impl FramingCheck {
    pub fn new(margin: f64, require_vertical_span: bool) -> Self {
        Self {
            margin,
            require_vertical_span,
        }
    }

    /// True when every key landmark is present, inside the margin, and the
    /// body spans a plausible area.
    pub fn is_full_body_in_frame(&self, frame: &PoseFrame) -> bool {
        let lo = self.margin;
        let hi = 1.0 - self.margin;

        let mut xs = Vec::with_capacity(FRAMING_LANDMARKS.len());
        let mut ys = Vec::with_capacity(FRAMING_LANDMARKS.len());
        for landmark in FRAMING_LANDMARKS {
            let Some(lm) = frame.get(landmark) else {
                return false;
            };
            if !(lo..=hi).contains(&lm.x) || !(lo..=hi).contains(&lm.y) {
                return false;
            }
            xs.push(lm.x);
            ys.push(lm.y);
        }

        if span(&xs) < MIN_BODY_SPAN && span(&ys) < MIN_BODY_SPAN {
            return false;
        }

        if self.require_vertical_span {
            let head_y = frame.get(PoseLandmark::Nose).map_or(0.0, |lm| lm.y);
            let ankle_y = [PoseLandmark::LeftAnkle, PoseLandmark::RightAnkle]
                .iter()
                .filter_map(|a| frame.get(*a))
                .map(|lm| lm.y)
                .fold(f64::NEG_INFINITY, f64::max);
            if ankle_y - head_y < MIN_BODY_SPAN {
                return false;
            }
        }

        true
    }
}

fn span(values: &[f64]) -> f64 {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max - min
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcheck_models::Landmark;

    fn standing() -> Vec<Landmark> {
        vec![
            Landmark::new(0, 0.50, 0.10, 0.9),
            Landmark::new(11, 0.45, 0.25, 0.9),
            Landmark::new(12, 0.55, 0.25, 0.9),
            Landmark::new(23, 0.46, 0.50, 0.9),
            Landmark::new(24, 0.54, 0.50, 0.9),
            Landmark::new(25, 0.46, 0.70, 0.9),
            Landmark::new(26, 0.54, 0.70, 0.9),
            Landmark::new(27, 0.46, 0.90, 0.9),
            Landmark::new(28, 0.54, 0.90, 0.9),
        ]
    }

    #[test]
    fn test_standing_body_is_framed() {
        let frame = PoseFrame::from_landmarks(&standing());
        assert!(FramingCheck::new(0.03, true).is_full_body_in_frame(&frame));
    }

    #[test]
    fn test_cut_off_feet() {
        let mut landmarks = standing();
        landmarks[7].y = 0.99;
        let frame = PoseFrame::from_landmarks(&landmarks);
        assert!(!FramingCheck::new(0.03, false).is_full_body_in_frame(&frame));
    }

    #[test]
    fn test_missing_landmark() {
        let mut landmarks = standing();
        landmarks.pop();
        let frame = PoseFrame::from_landmarks(&landmarks);
        assert!(!FramingCheck::new(0.03, false).is_full_body_in_frame(&frame));
    }

    #[test]
    fn test_tiny_body_is_rejected() {
        let landmarks: Vec<Landmark> = standing()
            .into_iter()
            .map(|lm| Landmark::new(lm.id, 0.5 + (lm.x - 0.5) * 0.1, 0.5 + (lm.y - 0.5) * 0.1, 0.9))
            .collect();
        let frame = PoseFrame::from_landmarks(&landmarks);
        assert!(!FramingCheck::new(0.03, false).is_full_body_in_frame(&frame));
    }

    #[test]
    fn test_lying_body_needs_vertical_span_only_when_required() {
        // Push-up position: wide horizontally, flat vertically.
        let landmarks: Vec<Landmark> = standing()
            .into_iter()
            .map(|lm| Landmark::new(lm.id, 0.1 + lm.y * 0.8, 0.5 + (lm.x - 0.5) * 0.5, 0.9))
            .collect();
        let frame = PoseFrame::from_landmarks(&landmarks);
        assert!(FramingCheck::new(0.03, false).is_full_body_in_frame(&frame));
        assert!(!FramingCheck::new(0.03, true).is_full_body_in_frame(&frame));
    }
}

//! Confidence-gated exponential smoothing of joint angles.

use std::collections::HashMap;

/// One tracked angle's smoothing state.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedAngle {
    pub name: String,
    pub value: f64,
    pub initialized: bool,
}

impl SmoothedAngle {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: 0.0,
            initialized: false,
        }
    }
}

/// Exponential moving average per named angle.
///
/// The first confident sample snaps the value so there is no warm-up lag.
/// Non-confident samples leave the value untouched and return the last
/// known reading, which keeps the display stable through brief occlusion.
#[derive(Debug, Clone)]
pub struct AngleSmoother {
    alpha: f64,
    angles: HashMap<String, SmoothedAngle>,
}

impl AngleSmoother {
    /// Create a smoother with the given weight for the newest sample.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(f64::EPSILON, 1.0),
            angles: HashMap::new(),
        }
    }

    /// Feed one raw sample and return the smoothed value.
    ///
    /// Before any confident sample has been seen the raw value is returned
    /// as-is without being stored.
    pub fn update(&mut self, name: &str, raw: f64, confident: bool) -> f64 {
        let alpha = self.alpha;
        let entry = self
            .angles
            .entry(name.to_string())
            .or_insert_with(|| SmoothedAngle::new(name));

        if !confident {
            return if entry.initialized { entry.value } else { raw };
        }

        if entry.initialized {
            entry.value = alpha * raw + (1.0 - alpha) * entry.value;
        } else {
            entry.value = raw;
            entry.initialized = true;
        }
        entry.value
    }

    /// Last smoothed value, if any confident sample has been seen.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.angles
            .get(name)
            .filter(|angle| angle.initialized)
            .map(|angle| angle.value)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Forget every tracked angle.
    pub fn reset(&mut self) {
        self.angles.clear();
    }
}

impl Default for AngleSmoother {
    fn default() -> Self {
        Self::new(0.4)
    }
}

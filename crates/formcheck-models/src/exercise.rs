//! Exercise kinds supported by the analyzers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Exercise being analyzed in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Bodyweight squat, primary angle at the knee.
    #[default]
    Squat,

    /// Push-up, primary angle at the elbow.
    Pushup,
}

impl ExerciseKind {
    /// All supported exercises.
    pub const ALL: &'static [ExerciseKind] = &[ExerciseKind::Squat, ExerciseKind::Pushup];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::Pushup => "pushup",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = ExerciseKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "squat" | "squats" => Ok(ExerciseKind::Squat),
            "pushup" | "pushups" | "push_up" | "push-up" | "push-ups" => Ok(ExerciseKind::Pushup),
            _ => Err(ExerciseKindParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown exercise: {0}")]
pub struct ExerciseKindParseError(pub String);

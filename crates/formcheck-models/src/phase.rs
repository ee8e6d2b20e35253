//! Repetition cycle phases.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current position in the four-phase repetition cycle.
///
/// The cycle runs `Up -> Descending -> Bottom -> Ascending -> Up`; returning
/// to `Up` from `Ascending` completes one repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    /// Standing / arms extended. Initial phase.
    #[default]
    Up,
    /// Lowering toward the bottom position.
    Descending,
    /// Held at depth.
    Bottom,
    /// Rising back toward the top.
    Ascending,
}

impl RepPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepPhase::Up => "up",
            RepPhase::Descending => "descending",
            RepPhase::Bottom => "bottom",
            RepPhase::Ascending => "ascending",
        }
    }

    /// True while a repetition is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, RepPhase::Up)
    }
}

impl fmt::Display for RepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

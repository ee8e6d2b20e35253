//! Exercise profiles and the analyzer registry.

pub mod pushup;
pub mod squat;

use formcheck_models::ExerciseKind;
use tracing::warn;

use crate::analyzer::ExerciseAnalyzer;
use crate::config::AnalyzerConfig;
use crate::error::CoreResult;

/// Parse an exercise name strictly.
pub fn parse_exercise(name: &str) -> CoreResult<ExerciseKind> {
    Ok(name.parse::<ExerciseKind>()?)
}

/// Resolve an exercise name, falling back to squats for unknown names.
pub fn resolve_exercise(name: &str) -> ExerciseKind {
    match parse_exercise(name) {
        Ok(kind) => kind,
        Err(e) => {
            warn!(error = %e, fallback = %ExerciseKind::Squat, "Unknown exercise requested");
            ExerciseKind::Squat
        }
    }
}

/// Build the analyzer for an exercise name.
///
/// Unknown names get a squat analyzer. Fails only on invalid configuration.
pub fn analyzer_for(name: &str, config: AnalyzerConfig) -> CoreResult<ExerciseAnalyzer> {
    ExerciseAnalyzer::for_kind(resolve_exercise(name), config)
}

//! Frame-count debouncing of instantaneous form checks.

use formcheck_models::IssueCode;
use std::collections::HashMap;

/// Per-issue frame counters.
///
/// A firing check adds one. A quiet check decays by two while a rep is in
/// progress and by one otherwise, so a fault has to persist before it is
/// raised and clears quickly once corrected.
#[derive(Debug, Clone, Default)]
pub struct IssueDebouncer {
    counters: HashMap<IssueCode, u32>,
}

impl IssueDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's raw check result. Returns true once the issue has
    /// persisted for `frames_required`.
    pub fn update(
        &mut self,
        code: IssueCode,
        firing: bool,
        rep_active: bool,
        frames_required: u32,
    ) -> bool {
        let counter = self.counters.entry(code).or_insert(0);
        if firing {
            *counter = counter.saturating_add(1);
        } else {
            *counter = counter.saturating_sub(if rep_active { 2 } else { 1 });
        }
        *counter >= frames_required.max(1)
    }

    pub fn count(&self, code: IssueCode) -> u32 {
        self.counters.get(&code).copied().unwrap_or(0)
    }

    /// Zero every counter.
    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

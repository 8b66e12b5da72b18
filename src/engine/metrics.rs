//! Lookup run metrics.
//!
//! Collected by `ShorthandMatcher::run_with_metrics` and surfaced through
//! [`crate::Engine::lookup_verbose`] and the CLI report. The plain lookup path
//! discards them.

use std::time::Duration;

use crate::MatchCandidate;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Time spent matching active patterns.
    pub matching: Duration,
    /// Time spent deduplicating, resolving and ranking hits.
    pub resolve: Duration,
    /// Chassis patterns in the table.
    pub patterns_total: usize,
    /// Patterns that survived bucket gating and were matched against the input.
    pub patterns_tested: usize,
    /// Patterns that hit, before per-rule deduplication.
    pub hits: usize,
}

/// Matcher output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub candidates: Vec<MatchCandidate>,
    pub metrics: RunMetrics,
}

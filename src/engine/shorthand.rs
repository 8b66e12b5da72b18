//! Chassis/model shorthand matcher.
//!
//! This module is the operational core of vehicle lookup:
//!
//! ```text
//! (0) trigger scan      -> bucket mask of the normalized input
//! (1) select patterns   -> chassis patterns whose buckets the input has
//! (2) match             -> match_pattern(.., Shorthand) per pattern, scored
//! (3) dedup             -> best hit per rule            (dedup.rs)
//! (4) resolve + rank    -> MatchCandidate list          (resolve.rs)
//! ```
//!
//! A matcher borrows one rule table snapshot for its whole run, so a
//! concurrent reload can never mix patterns from two tables into one result.

use std::time::Instant;

use tracing::{debug, trace};

use super::compiled_rules::PatternId;
use super::dedup::{RawHit, best_per_rule};
use super::matcher::{MatchMode, match_pattern};
use super::metrics::{RunMetrics, RunResult};
use super::normalize::NormalizedText;
use super::resolve::{rank, resolve_hit};
use super::trigger::TriggerInfo;
use crate::MatchCandidate;
use crate::options::Options;
use crate::rules::RuleTable;

/// Runs one lookup against one rule table snapshot.
///
/// Usage: `ShorthandMatcher::new(&table, &options, &normalized).run()`.
#[derive(Debug)]
pub struct ShorthandMatcher<'a> {
    table: &'a RuleTable,
    options: &'a Options,
    input: &'a NormalizedText,
    trigger: TriggerInfo,
    active: Vec<PatternId>,
}

impl<'a> ShorthandMatcher<'a> {
    pub(crate) fn new(table: &'a RuleTable, options: &'a Options, input: &'a NormalizedText) -> Self {
        let trigger = TriggerInfo::scan(input);
        let active = table.compiled().active_chassis(trigger.buckets);

        trace!(
            buckets = ?trigger.buckets,
            active = active.len(),
            total = table.compiled().chassis.len(),
            "selected chassis patterns"
        );

        ShorthandMatcher { table, options, input, trigger, active }
    }

    pub fn trigger(&self) -> TriggerInfo {
        self.trigger
    }

    fn collect_hits(&self) -> Vec<RawHit> {
        let compiled = self.table.compiled();
        let mode = MatchMode::Shorthand { max_gap: self.options.matcher.max_gap };
        let mut hits = Vec::new();

        for &id in &self.active {
            let pattern = &compiled.chassis[id];
            let Some(hit) = match_pattern(pattern, &self.input.tokens, mode) else {
                continue;
            };
            let specificity = pattern.tokens.len();
            let confidence = self.options.scoring.confidence(specificity, pattern.chars, hit.gaps);
            debug!(
                pattern = %pattern.source,
                rule = %self.table.chassis_rules()[pattern.rule].label(),
                specificity,
                confidence,
                gaps = hit.gaps,
                "shorthand hit"
            );
            hits.push(RawHit { pattern: id, rule: pattern.rule, specificity, confidence, hit });
        }

        hits
    }

    /// Match, deduplicate, resolve and rank, recording timings.
    pub fn run_with_metrics(self) -> RunResult {
        let total_start = Instant::now();

        let hits = self.collect_hits();
        let matching = total_start.elapsed();
        let hit_count = hits.len();

        let resolve_start = Instant::now();
        let mut candidates: Vec<MatchCandidate> = best_per_rule(hits)
            .into_iter()
            .map(|raw| resolve_hit(self.table, self.input, raw))
            .collect();
        rank(&mut candidates);
        let resolve = resolve_start.elapsed();

        let metrics = RunMetrics {
            total: total_start.elapsed(),
            matching,
            resolve,
            patterns_total: self.table.compiled().chassis.len(),
            patterns_tested: self.active.len(),
            hits: hit_count,
        };

        RunResult { candidates, metrics }
    }

    /// Convenience wrapper that discards timing details.
    pub fn run(self) -> Vec<MatchCandidate> {
        self.run_with_metrics().candidates
    }
}

//! Per-rule deduplication of shorthand hits.
//!
//! A rule usually lists several spellings of the same designation
//! ("e90 330d", "e91 330d", "330d"), and more than one of them can hit the same
//! input. Only one candidate per rule may reach the caller, so hits are
//! collapsed here before ranking.
//!
//! ## What counts as "the best hit"
//!
//! - Higher specificity (more pattern tokens matched) wins.
//! - Then higher confidence (longer pattern, fewer gaps).
//! - Then the pattern declared first in the rule.
//!
//! The output is ordered by rule index so that ranking, which sorts stably,
//! falls back to rule table declaration order.

use std::collections::BTreeMap;

use super::compiled_rules::PatternId;
use super::matcher::PatternHit;

/// A pattern hit scored but not yet resolved into a public candidate.
#[derive(Debug, Clone)]
pub(crate) struct RawHit {
    pub pattern: PatternId,
    pub rule: usize,
    pub specificity: usize,
    pub confidence: u8,
    pub hit: PatternHit,
}

impl RawHit {
    fn beats(&self, other: &RawHit) -> bool {
        (self.specificity, self.confidence) > (other.specificity, other.confidence)
            || ((self.specificity, self.confidence) == (other.specificity, other.confidence)
                && self.pattern < other.pattern)
    }
}

pub(crate) fn best_per_rule(hits: Vec<RawHit>) -> Vec<RawHit> {
    let mut best: BTreeMap<usize, RawHit> = BTreeMap::new();
    for hit in hits {
        match best.get(&hit.rule) {
            Some(current) if !hit.beats(current) => {}
            _ => {
                best.insert(hit.rule, hit);
            }
        }
    }
    best.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pattern: PatternId, rule: usize, specificity: usize, confidence: u8) -> RawHit {
        RawHit { pattern, rule, specificity, confidence, hit: PatternHit { consumed: vec![0], gaps: 0, exact: true } }
    }

    #[test]
    fn keeps_most_specific_hit_per_rule() {
        let out = best_per_rule(vec![raw(0, 0, 1, 53), raw(1, 0, 2, 94), raw(2, 1, 1, 51)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].pattern, 1);
        assert_eq!(out[1].pattern, 2);
    }

    #[test]
    fn equal_hits_keep_first_declared_pattern() {
        let out = best_per_rule(vec![raw(4, 0, 1, 51), raw(3, 0, 1, 51)]);
        assert_eq!(out[0].pattern, 3);
    }

    #[test]
    fn output_follows_rule_order() {
        let out = best_per_rule(vec![raw(5, 2, 1, 51), raw(0, 0, 1, 51), raw(3, 1, 1, 51)]);
        let rules: Vec<usize> = out.iter().map(|h| h.rule).collect();
        assert_eq!(rules, vec![0, 1, 2]);
    }
}

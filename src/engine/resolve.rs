//! Candidate resolution and ranking.
//!
//! Matching produces [`RawHit`]s: pattern ids and token indices. Resolution
//! turns a hit into the user-facing [`MatchCandidate`] by copying the rule out
//! of the (possibly soon replaced) table and slicing the matched text, then
//! ranking imposes the final order:
//!
//! ```text
//! confidence desc ─▶ rule.priority desc ─▶ specificity desc ─▶ declaration order
//! ```
//!
//! The last key is implicit: hits arrive ordered by rule index and the sort is
//! stable.

use super::dedup::RawHit;
use super::normalize::NormalizedText;
use crate::MatchCandidate;
use crate::rules::RuleTable;

pub(crate) fn resolve_hit(table: &RuleTable, input: &NormalizedText, raw: RawHit) -> MatchCandidate {
    let pattern = &table.compiled().chassis[raw.pattern];
    let first = &input.tokens[raw.hit.first()];
    let last = &input.tokens[raw.hit.last()];

    MatchCandidate {
        rule: table.chassis_rules()[raw.rule].clone(),
        pattern: pattern.source.clone(),
        matched_span: input.span_text(raw.hit.first(), raw.hit.last()).to_string(),
        matched_tokens: raw.hit.consumed.iter().map(|&idx| input.tokens[idx].text.clone()).collect(),
        span: first.start..last.end,
        specificity: raw.specificity,
        confidence: raw.confidence,
    }
}

pub(crate) fn rank(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(|a, b| {
        b.confidence
            .cmp(&a.confidence)
            .then(b.rule.priority.cmp(&a.rule.priority))
            .then(b.specificity.cmp(&a.specificity))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ChassisRule;

    fn candidate(label: &str, confidence: u8, priority: i32, specificity: usize) -> MatchCandidate {
        MatchCandidate {
            rule: ChassisRule {
                brand: label.into(),
                model: "M".into(),
                generation: None,
                variant: None,
                fuel: None,
                patterns: vec!["x".into()],
                priority,
            },
            pattern: "x".into(),
            matched_span: "x".into(),
            matched_tokens: vec!["x".into()],
            span: 0..1,
            specificity,
            confidence,
        }
    }

    fn brands(candidates: &[MatchCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.rule.brand.as_str()).collect()
    }

    #[test]
    fn confidence_dominates() {
        let mut c = vec![candidate("a", 51, 9, 1), candidate("b", 94, 0, 2)];
        rank(&mut c);
        assert_eq!(brands(&c), vec!["b", "a"]);
    }

    #[test]
    fn priority_breaks_confidence_ties() {
        let mut c = vec![candidate("a", 60, 1, 1), candidate("b", 60, 5, 1)];
        rank(&mut c);
        assert_eq!(brands(&c), vec!["b", "a"]);
    }

    #[test]
    fn specificity_then_declaration_order() {
        let mut c = vec![candidate("a", 60, 1, 1), candidate("b", 60, 1, 2), candidate("c", 60, 1, 1)];
        rank(&mut c);
        assert_eq!(brands(&c), vec!["b", "a", "c"]);
    }
}

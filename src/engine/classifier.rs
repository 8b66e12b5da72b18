//! Fallback category classifier.
//!
//! A deterministic rule cascade, not a statistical model: category rules are
//! tried in rule table order and the first one with any matching pattern wins.
//! Earlier categories therefore take ambiguous input, which is the intended
//! tie-break (vehicles before real estate before phones, and so on).
//!
//! Within the winning category an exact hit anywhere yields the exact
//! confidence tier, otherwise the fuzzy tier. No hit at all yields the table's
//! catch-all category with confidence 0.

use tracing::debug;

use super::matcher::{MatchMode, match_pattern};
use super::normalize::NormalizedText;
use crate::ClassificationResult;
use crate::options::Options;
use crate::rules::RuleTable;

pub(crate) fn classify(table: &RuleTable, options: &Options, input: &NormalizedText) -> ClassificationResult {
    if input.is_empty() {
        return catch_all(table);
    }
    let mode = MatchMode::Fuzzy(&options.fuzzy);

    for (rule, patterns) in table.category_rules().iter().zip(&table.compiled().categories) {
        let mut fuzzy_hit: Option<&str> = None;
        let mut exact_hit: Option<&str> = None;

        for pattern in patterns {
            let Some(hit) = match_pattern(pattern, &input.tokens, mode) else {
                continue;
            };
            if hit.exact {
                exact_hit = Some(pattern.source.as_str());
                break;
            }
            fuzzy_hit.get_or_insert(pattern.source.as_str());
        }

        let (matched, confidence) = match (exact_hit, fuzzy_hit) {
            (Some(p), _) => (p, options.fuzzy.exact_confidence),
            (None, Some(p)) => (p, options.fuzzy.fuzzy_confidence),
            (None, None) => continue,
        };

        debug!(category = %rule.category, pattern = %matched, confidence, "category matched");
        return ClassificationResult {
            category: rule.category.clone(),
            confidence,
            matched_pattern: Some(matched.to_string()),
        };
    }

    catch_all(table)
}

fn catch_all(table: &RuleTable) -> ClassificationResult {
    ClassificationResult { category: table.catch_all().to_string(), confidence: 0, matched_pattern: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "version": "test",
        "categories": ["Vehicles", "Real Estate", "Mobile Devices", "Other"],
        "catch_all": "Other",
        "rules": [
            { "kind": "category", "category": "Vehicles", "patterns": ["automobil", "auto", "kombi"] },
            { "kind": "category", "category": "Real Estate", "patterns": ["stan", "kuca", "poslovni prostor"] },
            { "kind": "category", "category": "Mobile Devices", "patterns": ["iphone", "samsung", "mobitel"] }
        ]
    }"#;

    fn classify_text(input: &str) -> ClassificationResult {
        let table = RuleTable::from_json_str(TABLE).unwrap();
        classify(&table, &Options::default(), &NormalizedText::new(input))
    }

    #[test]
    fn exact_keyword_gets_exact_tier() {
        let out = classify_text("stan u centru grada");
        assert_eq!(out.category, "Real Estate");
        assert_eq!(out.confidence, 90);
        assert_eq!(out.matched_pattern.as_deref(), Some("stan"));
    }

    #[test]
    fn typo_gets_fuzzy_tier() {
        let out = classify_text("iphon 13 pro max");
        assert_eq!(out.category, "Mobile Devices");
        assert_eq!(out.confidence, 60);

        let out = classify_text("poslovni prostr u centru");
        assert_eq!(out.category, "Real Estate");
        assert_eq!(out.confidence, 60);
    }

    #[test]
    fn four_letter_keywords_need_exact_match() {
        assert_eq!(classify_text("stann u centru").category, "Other");
        assert_eq!(classify_text("uto i sri").category, "Other");
    }

    #[test]
    fn exact_hit_later_in_category_upgrades_tier() {
        let out = classify_text("automobill i kombi");
        assert_eq!(out.category, "Vehicles");
        assert_eq!(out.confidence, 90);
        assert_eq!(out.matched_pattern.as_deref(), Some("kombi"));
    }

    #[test]
    fn earlier_category_wins_ambiguity() {
        let out = classify_text("mijenjam stan za auto");
        assert_eq!(out.category, "Vehicles");
    }

    #[test]
    fn nothing_matches_falls_to_catch_all() {
        let out = classify_text("nesto sasvim deseto");
        assert_eq!(out, ClassificationResult { category: "Other".into(), confidence: 0, matched_pattern: None });

        let out = classify_text("!!!");
        assert_eq!(out.category, "Other");
        assert_eq!(out.confidence, 0);
    }

    #[test]
    fn diacritics_do_not_block_exact_matches() {
        let out = classify_text("Kuća na prodaju");
        assert_eq!(out.category, "Real Estate");
        assert_eq!(out.confidence, 90);
    }
}

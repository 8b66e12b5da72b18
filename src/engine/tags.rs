//! Search tag derivation for a confirmed vehicle match.
//!
//! ```text
//! "golf 7 2.0 tdi 2018" + (Volkswagen Golf, Mk7, 2.0 TDI, Diesel; consumed golf/7/tdi)
//!   ─▶ { "volkswagen", "golf", "mk7", "2.0 tdi", "diesel", "2.0", "2018" }
//! ```
//!
//! Entity fields are folded with the same normalization as input text, so a
//! tag never carries case or diacritics. Leftover input tokens are kept only
//! when they contain a digit: those are trim, engine or year hints, while
//! leftover words are mostly sales chatter ("prodajem", "hitno").

use std::collections::BTreeSet;

use super::normalize::NormalizedText;
use crate::MatchCandidate;

pub(crate) fn generate(original_input: &str, candidate: &MatchCandidate) -> BTreeSet<String> {
    let rule = &candidate.rule;
    let mut tags = BTreeSet::new();

    insert_field(&mut tags, &rule.brand);
    insert_field(&mut tags, &rule.model);
    if let Some(generation) = &rule.generation {
        // "E90/E91/E92/E93" lists sibling chassis codes; tag each one.
        for part in generation.split('/') {
            insert_field(&mut tags, part);
        }
    }
    for field in [&rule.variant, &rule.fuel].into_iter().flatten() {
        insert_field(&mut tags, field);
    }

    let input = NormalizedText::new(original_input);
    let mut consumed: Vec<&str> = candidate.matched_tokens.iter().map(String::as_str).collect();
    for token in &input.tokens {
        // Each matched token accounts for one occurrence only.
        if let Some(pos) = consumed.iter().position(|c| *c == token.text) {
            consumed.swap_remove(pos);
            continue;
        }
        if token.has_digit() {
            tags.insert(token.text.clone());
        }
    }

    tags
}

fn insert_field(tags: &mut BTreeSet<String>, field: &str) {
    let folded = NormalizedText::new(field).text;
    if !folded.is_empty() {
        tags.insert(folded);
    }
}

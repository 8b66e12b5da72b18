use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::engine::normalize::NormalizedText;
use crate::engine::{self, BucketMask, RunMetrics, ShorthandMatcher};
use crate::error::{InputError, RuleTableError};
use crate::options::Options;
use crate::pipeline::{self, Identification, RemoteClassifier};
use crate::rules::RuleTable;
use crate::{ClassificationResult, MatchCandidate};

static DEFAULT_ENGINE: Lazy<Engine> =
    Lazy::new(|| Engine::with_default_rules().expect("bundled rule table must pass validation"));

/// Identification engine bound to one rule table and one set of options.
///
/// Every call takes a snapshot of the current table when it starts, so
/// [`Engine::reload`] never affects a call already in flight. The engine is
/// `Send + Sync` and meant to be shared.
#[derive(Debug)]
pub struct Engine {
    table: RwLock<Arc<RuleTable>>,
    options: Options,
}

/// Result of [`lookup_verbose`] and [`Engine::lookup_verbose`].
///
/// This is meant for debugging rule tables and inspecting performance; the
/// plain [`lookup`] path does not collect it.
#[derive(Debug, Clone)]
pub struct LookupReport {
    /// Input as given.
    pub text: String,
    /// Input after folding and tokenization.
    pub normalized: String,
    /// Ranked candidates, same as [`lookup`].
    pub candidates: Vec<MatchCandidate>,
    /// Coarse buckets detected in the input.
    pub buckets: BucketMask,
    pub metrics: RunMetrics,
    /// Version of the rule table snapshot that served the call.
    pub table_version: String,
}

impl LookupReport {
    pub fn elapsed(&self) -> Duration {
        self.metrics.total
    }
}

impl Engine {
    pub fn new(table: RuleTable, options: Options) -> Self {
        Engine { table: RwLock::new(Arc::new(table)), options }
    }

    /// Engine over the bundled rule table with default options.
    pub fn with_default_rules() -> Result<Self, RuleTableError> {
        Ok(Engine::new(RuleTable::bundled()?, Options::default()))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The rule table new calls will see.
    pub fn snapshot(&self) -> Arc<RuleTable> {
        Arc::clone(&self.table.read())
    }

    /// Swap in a freshly validated table and return the previous one.
    ///
    /// Calls already running keep the snapshot they started with.
    pub fn reload(&self, table: RuleTable) -> Arc<RuleTable> {
        let version = table.version().to_string();
        let previous = std::mem::replace(&mut *self.table.write(), Arc::new(table));
        info!(from = %previous.version(), to = %version, "rule table reloaded");
        previous
    }

    /// Vehicle candidates for `input`, most confident first.
    ///
    /// An empty list means nothing in the rule table matched; it is not an
    /// error.
    pub fn lookup(&self, input: &str) -> Result<Vec<MatchCandidate>, InputError> {
        let normalized = self.normalize(input)?;
        let table = self.snapshot();
        Ok(ShorthandMatcher::new(&table, &self.options, &normalized).run())
    }

    /// Like [`Engine::lookup`], with timings and gating details.
    pub fn lookup_verbose(&self, input: &str) -> Result<LookupReport, InputError> {
        let normalized = self.normalize(input)?;
        let table = self.snapshot();
        let matcher = ShorthandMatcher::new(&table, &self.options, &normalized);
        let buckets = matcher.trigger().buckets;
        let run = matcher.run_with_metrics();

        Ok(LookupReport {
            text: input.to_string(),
            normalized: normalized.text,
            candidates: run.candidates,
            buckets,
            metrics: run.metrics,
            table_version: table.version().to_string(),
        })
    }

    /// Category for `input`. Falls back to the catch-all category, with
    /// confidence 0, when no category rule matches.
    pub fn classify(&self, input: &str) -> Result<ClassificationResult, InputError> {
        let normalized = self.normalize(input)?;
        let table = self.snapshot();
        Ok(engine::classify(&table, &self.options, &normalized))
    }

    /// Search tags for a confirmed vehicle match. See [`generate_tags`].
    pub fn generate_tags(&self, original_input: &str, candidate: &MatchCandidate) -> BTreeSet<String> {
        engine::generate_tags(original_input, candidate)
    }

    /// Vehicle lookup, then `remote`, then the fallback classifier.
    pub fn identify(
        &self,
        input: &str,
        remote: Option<&dyn RemoteClassifier>,
    ) -> Result<Identification, InputError> {
        let normalized = self.normalize(input)?;
        let table = self.snapshot();
        Ok(pipeline::identify(&table, &self.options, input, &normalized, remote))
    }

    fn normalize(&self, input: &str) -> Result<NormalizedText, InputError> {
        if input.trim().is_empty() {
            return Err(InputError::Empty);
        }
        let len = input.chars().count();
        let max = self.options.limits.max_input_chars;
        if len > max {
            return Err(InputError::TooLong { len, max });
        }
        let normalized = NormalizedText::new(input);
        debug!(input, normalized = %normalized.text, tokens = normalized.tokens.len(), "normalized input");
        Ok(normalized)
    }
}

/// Vehicle candidates for `input` using the bundled rule table.
///
/// # Example
/// ```
/// let out = shorthand::lookup("E90-330D").unwrap();
/// assert_eq!(out[0].rule.model, "3 Series");
/// assert!(shorthand::lookup("xyz123randomgarbage").unwrap().is_empty());
/// ```
pub fn lookup(input: &str) -> Result<Vec<MatchCandidate>, InputError> {
    DEFAULT_ENGINE.lookup(input)
}

/// [`lookup`] with timings and gating details.
pub fn lookup_verbose(input: &str) -> Result<LookupReport, InputError> {
    DEFAULT_ENGINE.lookup_verbose(input)
}

/// Category for `input` using the bundled rule table.
///
/// # Example
/// ```
/// let out = shorthand::classify("iphon 13 pro max").unwrap();
/// assert_eq!(out.category, "Mobile Devices");
/// assert_eq!(out.confidence, 60);
/// ```
pub fn classify(input: &str) -> Result<ClassificationResult, InputError> {
    DEFAULT_ENGINE.classify(input)
}

/// Search tags for `candidate`: its entity fields plus every number-bearing
/// token of `original_input` the match did not consume. Lowercase,
/// deduplicated and deterministic.
pub fn generate_tags(original_input: &str, candidate: &MatchCandidate) -> BTreeSet<String> {
    engine::generate_tags(original_input, candidate)
}

/// Identify `input` using the bundled rule table. See [`Engine::identify`].
pub fn identify(input: &str, remote: Option<&dyn RemoteClassifier>) -> Result<Identification, InputError> {
    DEFAULT_ENGINE.identify(input, remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SMALL_TABLE: &str = r#"{
        "version": "small",
        "categories": ["Animals", "Other"],
        "catch_all": "Other",
        "rules": [
            { "kind": "chassis", "brand": "Opel", "model": "Astra", "generation": "H", "patterns": ["astra h"] },
            { "kind": "category", "category": "Animals", "patterns": ["macka"] }
        ]
    }"#;

    #[test]
    fn empty_and_blank_input_is_invalid() {
        assert_eq!(lookup(""), Err(InputError::Empty));
        assert_eq!(classify(""), Err(InputError::Empty));
        assert_eq!(classify("   \t"), Err(InputError::Empty));
        assert!(identify("", None).is_err());
    }

    #[test]
    fn overlong_input_is_invalid() {
        let input = "a".repeat(201);
        assert_eq!(lookup(&input), Err(InputError::TooLong { len: 201, max: 200 }));
        assert!(classify(&"š".repeat(200)).is_ok());
    }

    #[test]
    fn punctuation_only_input_is_understood_but_unmatched() {
        assert_eq!(lookup("!!! ---"), Ok(vec![]));
        let out = classify("!!! ---").unwrap();
        assert_eq!(out.category, "Other");
        assert_eq!(out.confidence, 0);
    }

    #[test]
    fn verbose_lookup_reports_gating() {
        let report = lookup_verbose("stan u centru grada").unwrap();
        assert!(report.candidates.is_empty());
        assert_eq!(report.buckets, BucketMask::HAS_LETTERS);
        assert!(report.metrics.patterns_tested < report.metrics.patterns_total);

        let report = lookup_verbose("E90 330D").unwrap();
        assert_eq!(report.normalized, "e90 330d");
        assert_eq!(report.candidates, lookup("e90 330d").unwrap());
        assert!(report.elapsed() >= report.metrics.matching);
    }

    #[test]
    fn reload_swaps_table_for_new_calls_only() {
        let engine = Engine::with_default_rules().unwrap();
        let before = engine.snapshot();
        assert!(!engine.lookup("e90 330d").unwrap().is_empty());

        let previous = engine.reload(RuleTable::from_json_str(SMALL_TABLE).unwrap());
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.version(), "2026.10");

        assert!(engine.lookup("e90 330d").unwrap().is_empty());
        assert_eq!(engine.lookup("astra h").unwrap()[0].rule.brand, "Opel");
        assert_eq!(engine.classify("macka").unwrap().category, "Animals");
        assert_eq!(engine.classify("stan").unwrap().category, "Other");
    }

    #[test]
    fn concurrent_calls_see_one_table_each() {
        let input = "e90 330d astra h";
        let engine = Engine::with_default_rules().unwrap();
        let full = engine.lookup(input).unwrap();
        let small = Engine::new(RuleTable::from_json_str(SMALL_TABLE).unwrap(), Options::default())
            .lookup(input)
            .unwrap();
        assert_ne!(full, small);
        assert_eq!(small.len(), 1);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let report = engine.lookup_verbose(input).unwrap();
                        match report.table_version.as_str() {
                            "2026.10" => assert_eq!(report.candidates, full),
                            "small" => assert_eq!(report.candidates, small),
                            other => panic!("unexpected table version {other}"),
                        }
                        let out = engine.lookup(input).unwrap();
                        assert!(out == full || out == small, "mixed result: {out:?}");
                    }
                });
            }
            scope.spawn(|| {
                for round in 0..50 {
                    let table = if round % 2 == 0 {
                        RuleTable::from_json_str(SMALL_TABLE).unwrap()
                    } else {
                        RuleTable::bundled().unwrap()
                    };
                    engine.reload(table);
                }
            });
        });
    }

    #[test]
    fn custom_options_apply() {
        let mut options = Options::default();
        options.limits.max_input_chars = 10;
        options.fuzzy.exact_confidence = 99;
        let engine = Engine::new(RuleTable::from_json_str(SMALL_TABLE).unwrap(), options);
        assert!(matches!(engine.lookup("astra h 2008 karavan"), Err(InputError::TooLong { max: 10, .. })));
        assert_eq!(engine.classify("macka").unwrap().confidence, 99);
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    proptest! {
        #[test]
        fn lookup_and_classify_are_deterministic(input in "[a-z0-9 .-]{1,40}") {
            prop_assume!(!input.trim().is_empty());
            prop_assert_eq!(lookup(&input), lookup(&input));
            prop_assert_eq!(classify(&input), classify(&input));
        }

        #[test]
        fn case_does_not_matter(input in "[a-zA-Z0-9 ]{1,40}") {
            prop_assume!(!input.trim().is_empty());
            prop_assert_eq!(lookup(&input.to_uppercase()), lookup(&input.to_lowercase()));
            prop_assert_eq!(classify(&input.to_uppercase()), classify(&input.to_lowercase()));
        }

        #[test]
        fn classify_always_returns_a_known_category(input in "\\PC{1,120}") {
            prop_assume!(!input.trim().is_empty());
            let table = DEFAULT_ENGINE.snapshot();
            let out = classify(&input).unwrap();
            prop_assert!(table.is_category(&out.category));
            prop_assert!(out.confidence <= 100);
        }

        #[test]
        fn one_substitution_is_tolerated_on_long_keywords(pos in 0usize..6, letter in proptest::char::range('a', 'z')) {
            let mut chars: Vec<char> = "iphone".chars().collect();
            prop_assume!(chars[pos] != letter);
            chars[pos] = letter;
            let typo: String = chars.into_iter().collect();
            let out = classify(&typo).unwrap();
            prop_assert_eq!(out.category, "Mobile Devices");
            prop_assert_eq!(out.confidence, 60);
        }
    }
}

//! Identification pipeline.
//!
//! The order a listing form consults its sources in:
//!
//! 1. Vehicle shorthand lookup, accepted when the top candidate clears
//!    `thresholds.vehicle`.
//! 2. A remote classifier supplied by the caller, accepted when it answers
//!    with a known category at or above `thresholds.remote`.
//! 3. The fallback category classifier, which always answers.
//!
//! The remote step is the only one that can fail. Its errors are logged and
//! the pipeline moves on; retry and timeout policy belong to the remote
//! implementation.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::normalize::NormalizedText;
use crate::engine::{ShorthandMatcher, classify, generate_tags};
use crate::error::RemoteError;
use crate::options::Options;
use crate::rules::RuleTable;
use crate::{ClassificationResult, MatchCandidate};

/// A free-text classification service outside this crate.
///
/// Any `Fn(&str) -> Result<ClassificationResult, RemoteError>` closure
/// implements it.
pub trait RemoteClassifier {
    fn classify(&self, input: &str) -> Result<ClassificationResult, RemoteError>;
}

impl<F> RemoteClassifier for F
where
    F: Fn(&str) -> Result<ClassificationResult, RemoteError>,
{
    fn classify(&self, input: &str) -> Result<ClassificationResult, RemoteError> {
        self(input)
    }
}

/// Which source produced a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Remote,
    Fallback,
}

/// Final answer for one listing text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identification {
    Vehicle { candidate: MatchCandidate, tags: BTreeSet<String> },
    Category { result: ClassificationResult, source: ClassificationSource },
}

pub(crate) fn identify(
    table: &RuleTable,
    options: &Options,
    input: &str,
    normalized: &NormalizedText,
    remote: Option<&dyn RemoteClassifier>,
) -> Identification {
    let candidates = ShorthandMatcher::new(table, options, normalized).run();
    if let Some(top) = candidates.into_iter().next() {
        if top.confidence >= options.thresholds.vehicle {
            let tags = generate_tags(input, &top);
            debug!(rule = %top.rule.label(), confidence = top.confidence, "identified as vehicle");
            return Identification::Vehicle { candidate: top, tags };
        }
        debug!(
            rule = %top.rule.label(),
            confidence = top.confidence,
            threshold = options.thresholds.vehicle,
            "vehicle candidate below threshold"
        );
    }

    if let Some(remote) = remote {
        match remote.classify(input) {
            Ok(result) if !table.is_category(&result.category) => {
                warn!(category = %result.category, "remote classifier returned an unknown category");
            }
            Ok(result) if result.confidence < options.thresholds.remote => {
                debug!(
                    category = %result.category,
                    confidence = result.confidence,
                    threshold = options.thresholds.remote,
                    "remote classification below threshold"
                );
            }
            Ok(result) => return Identification::Category { result, source: ClassificationSource::Remote },
            Err(err) => warn!(error = %err, "remote classifier failed; using fallback"),
        }
    }

    let result = classify(table, options, normalized);
    Identification::Category { result, source: ClassificationSource::Fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, remote: Option<&dyn RemoteClassifier>) -> Identification {
        let table = RuleTable::bundled().unwrap();
        let options = Options::default();
        identify(&table, &options, input, &NormalizedText::new(input), remote)
    }

    fn remote_says(category: &'static str, confidence: u8) -> impl Fn(&str) -> Result<ClassificationResult, RemoteError> {
        move |_: &str| Ok(ClassificationResult { category: category.into(), confidence, matched_pattern: None })
    }

    #[test]
    fn confident_vehicle_skips_classification() {
        let remote = |_: &str| -> Result<ClassificationResult, RemoteError> { panic!("remote must not be called") };
        match run("prodajem e90 330d automatik", Some(&remote)) {
            Identification::Vehicle { candidate, tags } => {
                assert_eq!(candidate.rule.variant.as_deref(), Some("330d"));
                assert!(tags.contains("bmw"));
            }
            other => panic!("expected vehicle, got {other:?}"),
        }
    }

    #[test]
    fn weak_vehicle_goes_to_remote() {
        // "e90" alone scores in the low fifties.
        let remote = remote_says("Vehicles", 95);
        let out = run("e90 felge", Some(&remote));
        assert_eq!(
            out,
            Identification::Category {
                result: ClassificationResult { category: "Vehicles".into(), confidence: 95, matched_pattern: None },
                source: ClassificationSource::Remote,
            }
        );
    }

    #[test]
    fn remote_failure_falls_back() {
        let remote = |_: &str| -> Result<ClassificationResult, RemoteError> { Err(RemoteError::Timeout) };
        match run("stan u centru grada", Some(&remote)) {
            Identification::Category { result, source } => {
                assert_eq!(source, ClassificationSource::Fallback);
                assert_eq!(result.category, "Real Estate");
            }
            other => panic!("expected category, got {other:?}"),
        }
    }

    #[test]
    fn weak_or_unknown_remote_answers_are_ignored() {
        for remote in [remote_says("Real Estate", 40), remote_says("Spaceships", 99)] {
            match run("iphon 13 pro max", Some(&remote)) {
                Identification::Category { result, source } => {
                    assert_eq!(source, ClassificationSource::Fallback);
                    assert_eq!(result.category, "Mobile Devices");
                }
                other => panic!("expected category, got {other:?}"),
            }
        }
    }

    #[test]
    fn without_remote_uses_fallback() {
        match run("nesto sasvim deseto", None) {
            Identification::Category { result, source } => {
                assert_eq!(source, ClassificationSource::Fallback);
                assert_eq!(result.category, "Other");
                assert_eq!(result.confidence, 0);
            }
            other => panic!("expected category, got {other:?}"),
        }
    }
}

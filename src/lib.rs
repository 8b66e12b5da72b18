//! Free-text listing identification.
//!
//! Three pure operations over a static rule table:
//!
//! - [`lookup`]: recognize vehicle chassis/model shorthand ("e90 330d") and
//!   return ranked candidates;
//! - [`classify`]: route any text into one marketplace category with a
//!   typo-tolerant keyword cascade;
//! - [`generate_tags`]: derive search tags from a confirmed vehicle match.
//!
//! [`identify`] chains them the way a listing form uses them, optionally
//! consulting a caller-supplied [`RemoteClassifier`] in between.
//!
//! ```
//! let top = &shorthand::lookup("prodajem e90 330d automatik").unwrap()[0];
//! assert_eq!(top.rule.brand, "BMW");
//! assert_eq!(top.rule.variant.as_deref(), Some("330d"));
//!
//! let category = shorthand::classify("stan u centru grada").unwrap();
//! assert_eq!(category.category, "Real Estate");
//! ```

use std::ops::Range;

use serde::Serialize;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod options;
mod pipeline;
mod rules;

pub use api::{Engine, LookupReport, classify, generate_tags, identify, lookup, lookup_verbose};
pub use engine::{BucketMask, RunMetrics};
pub use error::{InputError, OptionsError, RemoteError, RuleTableError};
pub use options::{FuzzyOptions, InputLimits, MatcherOptions, Options, Scoring, Thresholds};
pub use pipeline::{ClassificationSource, Identification, RemoteClassifier};
pub use rules::{CategoryRule, ChassisRule, RuleDocument, RuleRecord, RuleTable};

/// One way the input can be read as a known vehicle.
///
/// Candidates are results, never stored: `rule` is a copy of the matched rule
/// so a candidate stays valid after the rule table is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidate {
    pub rule: ChassisRule,
    /// The rule pattern that produced this candidate.
    pub pattern: String,
    /// Normalized input text from the first to the last consumed token.
    pub matched_span: String,
    /// Normalized input tokens consumed by the pattern.
    pub matched_tokens: Vec<String>,
    /// Byte range of `matched_span` within the normalized input.
    pub span: Range<usize>,
    /// Number of pattern tokens matched.
    pub specificity: usize,
    /// 0..=100.
    pub confidence: u8,
}

/// Outcome of the fallback classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub category: String,
    /// 0..=100; 0 only for the catch-all category.
    pub confidence: u8,
    /// Category pattern that decided the result, if any.
    pub matched_pattern: Option<String>,
}

//! Matching engine.
//!
//! Everything here operates on one immutable [`crate::RuleTable`] snapshot and
//! one [`normalize::NormalizedText`]; nothing holds state between calls.
//!
//! ## How the parts work together
//!
//! ```text
//! rule table ──┐
//!              │  CompiledRules::new            (compiled_rules.rs)
//!              └──────────────┬───────────────
//!                             │
//! input ── NormalizedText ────┤                 (normalize.rs)
//!                             │
//!            ┌────────────────┴─────────────────┐
//!            v                                  v
//!   TriggerInfo::scan (trigger.rs)     classify (classifier.rs)
//!   active chassis patterns              category cascade,
//!            │                           match_pattern(.., Fuzzy)
//!            v                                  │
//!   ShorthandMatcher (shorthand.rs)             v
//!     match_pattern(.., Shorthand)     ClassificationResult
//!     best_per_rule (dedup.rs)
//!     resolve_hit + rank (resolve.rs)
//!            │
//!            v
//!   Vec<MatchCandidate> ── generate (tags.rs) ──▶ tag set
//! ```
//!
//! Both rule kinds go through the single generic matcher in `matcher.rs`;
//! only the match mode differs.
//!
//! ## Responsibilities by module
//!
//! - `normalize.rs`: diacritic folding, lowercasing and tokenization shared by
//!   input text, rule patterns and tags.
//! - `compiled_rules.rs`: pre-tokenized patterns and the bucket index.
//! - `trigger.rs`: coarse input buckets used to skip impossible patterns.
//! - `matcher.rs`: `match_pattern` in shorthand and fuzzy mode.
//! - `shorthand.rs`: the vehicle lookup run.
//! - `dedup.rs`, `resolve.rs`: one candidate per rule, then ranking.
//! - `classifier.rs`: the fallback category cascade.
//! - `tags.rs`: search tags for a confirmed match.
//! - `metrics.rs`: timing data for verbose lookups.
//!
//! Set `RUST_LOG=shorthand=trace` to see pattern selection and every hit.

#[path = "engine/classifier.rs"]
mod classifier;
#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/normalize.rs"]
pub(crate) mod normalize;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/shorthand.rs"]
mod shorthand;
#[path = "engine/tags.rs"]
mod tags;
#[path = "engine/trigger.rs"]
mod trigger;

pub(crate) use classifier::classify;
pub use compiled_rules::BucketMask;
pub(crate) use compiled_rules::CompiledRules;
pub use metrics::RunMetrics;
pub(crate) use shorthand::ShorthandMatcher;
pub(crate) use tags::generate as generate_tags;

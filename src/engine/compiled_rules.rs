//! Pattern compilation and indexing.
//!
//! This module holds the *static* side of the engine: everything derived from
//! the rule table once, at load time, so that a lookup only has to walk
//! pre-tokenized patterns.
//!
//! Matching is split into two phases:
//!
//! 1. **Compile/index** (this module): normalize every pattern into tokens,
//!    record which coarse buckets an input must have for the pattern to be
//!    able to match, and index chassis patterns by bucket.
//! 2. **Run** (see `shorthand.rs` and `classifier.rs`): scan the input for its
//!    buckets (`trigger.rs`), select the plausible patterns, then match.
//!
//! ## Invariants
//!
//! - `PatternId` is an index into `CompiledRules::chassis`.
//! - `CompiledPattern::rule` is an index into the owning table's chassis or
//!   category rule list; patterns are stored in declaration order.
//! - Category patterns are never bucket-gated: a fuzzy match can bridge a
//!   letter/digit substitution, so no bucket is safe to require.

use tracing::warn;

use super::normalize::pattern_tokens;
use crate::rules::{CategoryRule, ChassisRule};

/// Pattern identifier (index into `CompiledRules::chassis`).
pub(crate) type PatternId = usize;

bitflags::bitflags! {
    /// Coarse buckets for fast input classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BucketMask: u8 {
        const HAS_DIGITS  = 1 << 0;
        const HAS_LETTERS = 1 << 1;
        /// At least one token fuses letters and digits, e.g. `e90` or `330d`.
        const HAS_MIXED   = 1 << 2;
    }
}

pub const BUCKET_COUNT: usize = 3;
pub const BUCKET_HAS_DIGITS: usize = 0;
pub const BUCKET_HAS_LETTERS: usize = 1;
pub const BUCKET_HAS_MIXED: usize = 2;

/// A rule pattern reduced to normalized tokens.
#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    /// Index of the owning rule.
    pub rule: usize,
    /// Pattern as written in the rule table.
    pub source: String,
    pub tokens: Vec<String>,
    /// Character count of all tokens, separators excluded.
    pub chars: usize,
    /// Buckets an input needs before this pattern can match.
    pub buckets: BucketMask,
}

impl CompiledPattern {
    fn new(rule: usize, source: &str) -> Self {
        let tokens = pattern_tokens(source);
        let chars = tokens.iter().map(|t| t.chars().count()).sum();
        let mut buckets = BucketMask::empty();
        for token in &tokens {
            let digits = token.bytes().any(|b| b.is_ascii_digit());
            let letters = token.chars().any(char::is_alphabetic);
            if digits {
                buckets |= BucketMask::HAS_DIGITS;
            }
            if letters {
                buckets |= BucketMask::HAS_LETTERS;
            }
            if digits && letters {
                buckets |= BucketMask::HAS_MIXED;
            }
        }
        CompiledPattern { rule, source: source.to_string(), tokens, chars, buckets }
    }

    /// A lone number shorter than two characters ("5" in "5 godina") never
    /// counts as a vehicle designation.
    pub fn is_bare_short_number(&self) -> bool {
        matches!(self.tokens.as_slice(), [only] if only.chars().count() < 2 && only.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Most selective bucket, used as the index slot.
    fn primary_bucket(&self) -> Option<usize> {
        if self.buckets.contains(BucketMask::HAS_MIXED) {
            Some(BUCKET_HAS_MIXED)
        } else if self.buckets.contains(BucketMask::HAS_DIGITS) {
            Some(BUCKET_HAS_DIGITS)
        } else if self.buckets.contains(BucketMask::HAS_LETTERS) {
            Some(BUCKET_HAS_LETTERS)
        } else {
            None
        }
    }
}

#[derive(Default, Debug)]
pub(crate) struct RuleIndex {
    pub by_bucket: [Vec<PatternId>; BUCKET_COUNT],
}

/// Pre-compiled patterns with bucket indexes.
#[derive(Debug, Default)]
pub(crate) struct CompiledRules {
    pub chassis: Vec<CompiledPattern>,
    /// One entry per category rule, in cascade order.
    pub categories: Vec<Vec<CompiledPattern>>,
    pub index: RuleIndex,
}

impl CompiledRules {
    /// Compile validated rules.
    ///
    /// Patterns that can never match on their own are kept out of the index
    /// (and logged) rather than rejected; they remain visible in
    /// `CompiledRules::chassis` for debugging.
    pub fn new(chassis: &[ChassisRule], categories: &[CategoryRule]) -> Self {
        let mut compiled = CompiledRules::default();

        for (rule_idx, rule) in chassis.iter().enumerate() {
            for source in &rule.patterns {
                let pattern = CompiledPattern::new(rule_idx, source);
                let id = compiled.chassis.len();

                if pattern.is_bare_short_number() {
                    warn!(rule = %rule.label(), pattern = %source, "single-digit pattern can never match alone; skipped");
                } else if let Some(slot) = pattern.primary_bucket() {
                    compiled.index.by_bucket[slot].push(id);
                }
                compiled.chassis.push(pattern);
            }
        }

        compiled.categories = categories
            .iter()
            .enumerate()
            .map(|(rule_idx, rule)| rule.patterns.iter().map(|p| CompiledPattern::new(rule_idx, p)).collect())
            .collect();

        compiled
    }

    /// Chassis patterns whose bucket requirements are satisfied by `input`,
    /// in declaration order.
    pub fn active_chassis(&self, input: BucketMask) -> Vec<PatternId> {
        let mut active: Vec<PatternId> = Vec::new();
        if input.contains(BucketMask::HAS_MIXED) {
            active.extend(&self.index.by_bucket[BUCKET_HAS_MIXED]);
        }
        if input.contains(BucketMask::HAS_DIGITS) {
            active.extend(&self.index.by_bucket[BUCKET_HAS_DIGITS]);
        }
        if input.contains(BucketMask::HAS_LETTERS) {
            active.extend(&self.index.by_bucket[BUCKET_HAS_LETTERS]);
        }
        active.retain(|&id| input.contains(self.chassis[id].buckets));
        active.sort_unstable();
        active
    }
}

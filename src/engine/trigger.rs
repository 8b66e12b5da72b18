//! Trigger scanning (input pre-classification).
//!
//! Inspects normalized input and produces the coarse [`BucketMask`] that
//! decides which chassis patterns are worth matching at all. Most listing
//! titles are plain words ("stan u centru grada"), and for those every
//! pattern carrying a fused designation such as `e90` is skipped outright.
//!
//! The scan is a heuristic gate: it may let through patterns that later fail
//! to match, but it must never reject a pattern that could match. Because
//! buckets are computed per token after normalization, fused and separated
//! spellings ("e90330d" vs "e90 330d") land in the same buckets.

use super::compiled_rules::BucketMask;
use super::normalize::NormalizedText;

/// Input characteristics detected from normalized text.
#[derive(Debug, Clone, Copy)]
pub struct TriggerInfo {
    pub buckets: BucketMask,
}

impl TriggerInfo {
    pub(crate) fn scan(input: &NormalizedText) -> Self {
        let mut buckets = BucketMask::empty();

        for token in &input.tokens {
            let digits = token.has_digit();
            let letters = token.has_letter();
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

        TriggerInfo { buckets }
    }
}

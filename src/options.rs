//! Tunable engine options.
//!
//! Every confidence number the engine produces comes from here. The defaults
//! are calibrated by hand against the bundled rule table and are not derived
//! from any corpus, so deployments are expected to override them from a JSON
//! document rather than patch code:
//!
//! ```json
//! { "scoring": { "gap_penalty": 5 }, "thresholds": { "vehicle": 85 } }
//! ```
//!
//! Missing sections and fields fall back to [`Options::default`].

use std::path::Path;

use serde::Deserialize;

use crate::error::OptionsError;

/// Options that affect matching, scoring and the identification pipeline.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Options {
    pub limits: InputLimits,
    pub matcher: MatcherOptions,
    pub scoring: Scoring,
    pub fuzzy: FuzzyOptions,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputLimits {
    /// Longest accepted input, in characters.
    pub max_input_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self { max_input_chars: 200 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatcherOptions {
    /// Unrelated input tokens allowed between two consecutive pattern tokens.
    pub max_gap: usize,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self { max_gap: 2 }
    }
}

/// Confidence model for shorthand hits.
///
/// ```text
/// raw        = single_token_base
///            + (specificity - 1) * per_extra_token
///            + min(pattern_chars * per_char_bonus, char_bonus_cap)
/// confidence = min(raw, 100) - gaps * gap_penalty
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Scoring {
    pub single_token_base: u32,
    pub per_extra_token: u32,
    pub per_char_bonus: u32,
    pub char_bonus_cap: u32,
    pub gap_penalty: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self { single_token_base: 45, per_extra_token: 35, per_char_bonus: 2, char_bonus_cap: 15, gap_penalty: 3 }
    }
}

impl Scoring {
    /// Confidence for a hit of `specificity` pattern tokens spanning
    /// `pattern_chars` characters with `gaps` skipped input tokens.
    pub fn confidence(&self, specificity: usize, pattern_chars: usize, gaps: usize) -> u8 {
        let extra = (specificity.saturating_sub(1) as u32).saturating_mul(self.per_extra_token);
        let bonus = (pattern_chars as u32).saturating_mul(self.per_char_bonus).min(self.char_bonus_cap);
        let raw = self.single_token_base.saturating_add(extra).saturating_add(bonus).min(100);
        let penalty = (gaps as u32).saturating_mul(self.gap_penalty);
        raw.saturating_sub(penalty) as u8
    }
}

/// Edit budget and confidence tiers for the fallback classifier.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FuzzyOptions {
    /// Patterns up to this many characters must match exactly.
    pub exact_max_len: usize,
    /// Patterns up to this many characters tolerate one edit; longer ones two.
    pub one_edit_max_len: usize,
    pub exact_confidence: u8,
    pub fuzzy_confidence: u8,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self { exact_max_len: 4, one_edit_max_len: 7, exact_confidence: 90, fuzzy_confidence: 60 }
    }
}

impl FuzzyOptions {
    /// Maximum Levenshtein distance tolerated for a pattern token of `len` characters.
    pub fn budget(&self, len: usize) -> usize {
        if len <= self.exact_max_len {
            0
        } else if len <= self.one_edit_max_len {
            1
        } else {
            2
        }
    }
}

/// Acceptance thresholds used by [`crate::Engine::identify`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum top-candidate confidence to accept a vehicle match.
    pub vehicle: u8,
    /// Minimum confidence to accept a remote classification.
    pub remote: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { vehicle: 80, remote: 70 }
    }
}

impl Options {
    /// Parse options from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Read and parse options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| OptionsError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<(), OptionsError> {
        if self.limits.max_input_chars == 0 {
            return Err(OptionsError::Invalid { field: "limits.max_input_chars", reason: "must be positive".into() });
        }
        if self.fuzzy.one_edit_max_len < self.fuzzy.exact_max_len {
            return Err(OptionsError::Invalid {
                field: "fuzzy.one_edit_max_len",
                reason: format!("must be at least fuzzy.exact_max_len ({})", self.fuzzy.exact_max_len),
            });
        }
        for (field, value) in [
            ("fuzzy.exact_confidence", self.fuzzy.exact_confidence),
            ("fuzzy.fuzzy_confidence", self.fuzzy.fuzzy_confidence),
            ("thresholds.vehicle", self.thresholds.vehicle),
            ("thresholds.remote", self.thresholds.remote),
        ] {
            if value > 100 {
                return Err(OptionsError::Invalid { field, reason: format!("{value} is above 100") });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_hit_documented_bands() {
        let scoring = Scoring::default();
        // "e90": one token, three characters.
        assert_eq!(scoring.confidence(1, 3, 0), 51);
        // "e90 330d": two tokens, seven characters.
        assert_eq!(scoring.confidence(2, 7, 0), 94);
        // Three tokens saturate at 100 before the gap penalty applies.
        assert_eq!(scoring.confidence(3, 9, 1), 97);
    }

    #[test]
    fn fuzzy_budget_grows_with_length() {
        let fuzzy = FuzzyOptions::default();
        assert_eq!(fuzzy.budget(3), 0);
        // Four-letter keywords ("audi", "stan") sit one edit from everyday words.
        assert_eq!(fuzzy.budget(4), 0);
        assert_eq!(fuzzy.budget(5), 1);
        assert_eq!(fuzzy.budget(7), 1);
        assert_eq!(fuzzy.budget(8), 2);
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let options = Options::from_json_str(r#"{ "thresholds": { "vehicle": 85 } }"#).unwrap();
        assert_eq!(options.thresholds.vehicle, 85);
        assert_eq!(options.thresholds.remote, 70);
        assert_eq!(options.scoring, Scoring::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = Options::from_json_str(r#"{ "fuzzy": { "exact_confidence": 120 } }"#).unwrap_err();
        assert!(matches!(err, OptionsError::Invalid { field: "fuzzy.exact_confidence", .. }));

        let err = Options::from_json_str(r#"{ "limits": { "max_input_chars": 0 } }"#).unwrap_err();
        assert!(matches!(err, OptionsError::Invalid { field: "limits.max_input_chars", .. }));
    }
}

//! Generic pattern matcher shared by both rule kinds.
//!
//! Chassis and category rules are evaluated by the same function,
//! [`match_pattern`], which differs only in its [`MatchMode`]:
//!
//! - **Shorthand**: exact tokens, in order, on token boundaries. One input
//!   token may absorb several consecutive pattern tokens when it equals their
//!   concatenation, and up to `max_gap` unrelated tokens may sit between
//!   pattern tokens. A numeric pattern token is never reached across a token
//!   holding digits of another number, and a lone digit (`golf 5`) allows no
//!   gap in front of it at all.
//!
//!   ```text
//!   pattern: [golf] [7] [tdi]          pattern: [e90] [330d]
//!   input:   golf 7 2.0 tdi 2018       input:   prodajem e90330d
//!            ^    ^ gap ^                                ^ absorbs both
//!   ```
//!
//! - **Fuzzy**: consecutive input tokens, each within a Levenshtein budget of
//!   the corresponding pattern token.
//!
//! When a pattern matches in several places the hit with the fewest gaps (or
//! the exact one, in fuzzy mode) wins, then the earliest. Results are
//! therefore a pure function of the pattern and the tokens.

use super::compiled_rules::CompiledPattern;
use super::normalize::Token;
use crate::options::FuzzyOptions;

#[derive(Debug, Clone, Copy)]
pub(crate) enum MatchMode<'o> {
    Shorthand { max_gap: usize },
    Fuzzy(&'o FuzzyOptions),
}

/// Where and how a pattern matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatternHit {
    /// Input token indices consumed by the pattern, ascending.
    pub consumed: Vec<usize>,
    /// Input tokens skipped between consumed tokens.
    pub gaps: usize,
    /// Every token matched without edits.
    pub exact: bool,
}

impl PatternHit {
    pub fn first(&self) -> usize {
        self.consumed[0]
    }

    pub fn last(&self) -> usize {
        self.consumed[self.consumed.len() - 1]
    }
}

pub(crate) fn match_pattern(pattern: &CompiledPattern, tokens: &[Token], mode: MatchMode<'_>) -> Option<PatternHit> {
    if pattern.tokens.is_empty() || tokens.is_empty() {
        return None;
    }
    match mode {
        MatchMode::Shorthand { max_gap } => match_shorthand(&pattern.tokens, tokens, max_gap),
        MatchMode::Fuzzy(options) => match_fuzzy(&pattern.tokens, tokens, options),
    }
}

/// Number of leading pattern tokens whose concatenation equals `token`.
fn absorbed(token: &str, pattern: &[String]) -> Option<usize> {
    let mut rest = token;
    for (idx, part) in pattern.iter().enumerate() {
        rest = rest.strip_prefix(part.as_str())?;
        if rest.is_empty() {
            return Some(idx + 1);
        }
    }
    None
}

/// A partially matched shorthand pattern.
///
/// ```text
/// pattern: [golf] [7] [tdi]
///                      ^ next = 2
/// input:   golf 7 2.0 tdi
///                 ^ position = 2 (first index the next token may come from)
/// ```
struct Partial {
    next: usize,
    position: usize,
    consumed: Vec<usize>,
    gaps: usize,
}

fn match_shorthand(pattern: &[String], tokens: &[Token], max_gap: usize) -> Option<PatternHit> {
    let mut stack: Vec<Partial> = Vec::new();
    for (idx, token) in tokens.iter().enumerate().rev() {
        if let Some(k) = absorbed(&token.text, pattern) {
            stack.push(Partial { next: k, position: idx + 1, consumed: vec![idx], gaps: 0 });
        }
    }

    let mut best: Option<PatternHit> = None;
    while let Some(m) = stack.pop() {
        if m.next >= pattern.len() {
            let better = best
                .as_ref()
                .map(|b| (m.gaps, m.consumed[0]) < (b.gaps, b.consumed[0]))
                .unwrap_or(true);
            if better {
                best = Some(PatternHit { consumed: m.consumed, gaps: m.gaps, exact: true });
            }
            continue;
        }

        let window_end = (m.position + max_gap).min(tokens.len().saturating_sub(1));
        for idx in (m.position..=window_end).rev() {
            if !gap_allowed(&pattern[m.next], &tokens[m.position..idx]) {
                continue;
            }
            if let Some(k) = absorbed(&tokens[idx].text, &pattern[m.next..]) {
                let mut consumed = m.consumed.clone();
                consumed.push(idx);
                stack.push(Partial {
                    next: m.next + k,
                    position: idx + 1,
                    consumed,
                    gaps: m.gaps + (idx - m.position),
                });
            }
        }
    }

    best
}

/// Whether pattern token `next` may be reached after skipping `skipped`.
///
/// ```text
/// pattern: [golf] [5]         input: golf 2015 5 vrata   rejected
/// pattern: [golf] [7] [tdi]   input: golf 7 2.0 tdi      accepted
/// ```
fn gap_allowed(next: &str, skipped: &[Token]) -> bool {
    if skipped.is_empty() || !next.bytes().any(|b| b.is_ascii_digit()) {
        return true;
    }
    let bare_digit = next.len() < 2 && next.bytes().all(|b| b.is_ascii_digit());
    !bare_digit && !skipped.iter().any(Token::has_digit)
}

fn match_fuzzy(pattern: &[String], tokens: &[Token], options: &FuzzyOptions) -> Option<PatternHit> {
    if pattern.len() > tokens.len() {
        return None;
    }

    let mut best: Option<PatternHit> = None;
    for start in 0..=tokens.len() - pattern.len() {
        let mut exact = true;
        let matched = pattern.iter().zip(&tokens[start..]).all(|(want, got)| {
            let distance = bounded_distance(want, &got.text, options.budget(want.chars().count()));
            exact &= distance == Some(0);
            distance.is_some()
        });
        if !matched {
            continue;
        }
        if exact {
            return Some(PatternHit { consumed: (start..start + pattern.len()).collect(), gaps: 0, exact: true });
        }
        if best.is_none() {
            best = Some(PatternHit { consumed: (start..start + pattern.len()).collect(), gaps: 0, exact: false });
        }
    }
    best
}

/// Levenshtein distance between `want` and `got` if it is within `budget`.
fn bounded_distance(want: &str, got: &str, budget: usize) -> Option<usize> {
    if want == got {
        return Some(0);
    }
    if budget == 0 || want.chars().count().abs_diff(got.chars().count()) > budget {
        return None;
    }
    let distance = strsim::levenshtein(want, got);
    (distance <= budget).then_some(distance)
}

//! Text normalization and tokenization.
//!
//! Both matchers and the tag generator see user input only through
//! [`NormalizedText`], so every notion of "the same text" in the engine is
//! defined here:
//!
//! ```text
//! "Prodajem E90-330D, 2.0 šasija"
//!    │ fold: NFD, drop combining marks, map đ/ß/ł/…, lowercase
//!    ▼
//! "prodajem e90-330d, 2.0 sasija"
//!    │ tokenize: decimal numbers | runs of letters/digits
//!    ▼
//! [prodajem] [e90] [330d] [2.0] [sasija]   text = "prodajem e90 330d 2.0 sasija"
//! ```
//!
//! Decimal separators between two digits stay inside the token (normalized to
//! `.`) so displacement hints such as `2.0` survive; every other non
//! alphanumeric character is a token boundary.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// One token of normalized text. `start`/`end` are byte offsets into
/// [`NormalizedText::text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn has_digit(&self) -> bool {
        self.text.bytes().any(|b| b.is_ascii_digit())
    }

    pub fn has_letter(&self) -> bool {
        self.text.chars().any(char::is_alphabetic)
    }
}

/// Folded, tokenized input. Tokens are joined by single spaces in `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NormalizedText {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl NormalizedText {
    pub fn new(input: &str) -> Self {
        let folded = fold(input);
        let mut out = NormalizedText::default();

        for m in regex!(r"[0-9]+(?:[.,][0-9]+)+|[\p{L}\p{N}]+").find_iter(&folded) {
            if !out.text.is_empty() {
                out.text.push(' ');
            }
            let start = out.text.len();
            let text = m.as_str().replace(',', ".");
            out.text.push_str(&text);
            out.tokens.push(Token { text, start, end: out.text.len() });
        }

        out
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Slice of `text` covering tokens `first..=last`.
    pub fn span_text(&self, first: usize, last: usize) -> &str {
        &self.text[self.tokens[first].start..self.tokens[last].end]
    }
}

/// Strip diacritics and lowercase.
///
/// Letters that have no canonical decomposition are mapped explicitly; `đ`
/// follows the regional transliteration (`dj`), not a bare `d`.
pub(crate) fn fold(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'đ' | 'Đ' => out.push_str("dj"),
            'ß' => out.push_str("ss"),
            'æ' | 'Æ' => out.push_str("ae"),
            'œ' | 'Œ' => out.push_str("oe"),
            'ø' | 'Ø' => out.push('o'),
            'ł' | 'Ł' => out.push('l'),
            'ı' => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Normalize a rule pattern into its token strings.
pub(crate) fn pattern_tokens(pattern: &str) -> Vec<String> {
    NormalizedText::new(pattern).tokens.into_iter().map(|t| t.text).collect()
}

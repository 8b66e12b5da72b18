use std::path::PathBuf;

use thiserror::Error;

/// Input rejected before any matching happens.
///
/// This is distinct from "no match": an empty candidate list or the catch-all
/// category mean the input was understood but nothing in the rule table fits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid input: text is empty")]
    Empty,

    #[error("invalid input: text is {len} characters long, the limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Rule table failed to load or validate.
///
/// Every variant is fatal: a process must not serve lookups from a table that
/// produced one of these.
#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("failed to read rule table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rule table declares no categories")]
    NoCategories,

    #[error("category \"{0}\" is declared more than once")]
    DuplicateCategory(String),

    #[error("catch-all category \"{0}\" is not in the category enumeration")]
    UnknownCatchAll(String),

    #[error("rule #{rule}: field `{field}` must not be empty")]
    EmptyField { rule: usize, field: &'static str },

    #[error("rule #{rule} ({label}) has no patterns")]
    NoPatterns { rule: usize, label: String },

    #[error("rule #{rule} ({label}): pattern \"{pattern}\" contains no letters or digits")]
    BlankPattern { rule: usize, label: String, pattern: String },

    #[error("rule #{rule}: category \"{category}\" is not in the category enumeration")]
    UnknownCategory { rule: usize, category: String },

    #[error("category \"{0}\" is not supported by the caller")]
    UnsupportedCategory(String),

    #[error("pattern \"{pattern}\" appears in rules #{first} and #{second} with equal priority {priority}")]
    DuplicatePattern { pattern: String, first: usize, second: usize, priority: i32 },
}

/// Engine options failed to load or validate.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid option `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure reported by a caller-supplied remote classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("remote classifier unavailable: {0}")]
    Unavailable(String),

    #[error("remote classifier timed out")]
    Timeout,

    #[error("remote classifier returned an unusable response: {0}")]
    InvalidResponse(String),
}

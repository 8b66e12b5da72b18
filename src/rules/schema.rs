//! Serialized shape of the rule table document.
//!
//! The document is one JSON object holding the category enumeration and a
//! flat list of records tagged by `kind`. Record order is significant: it is
//! the chassis tie-break order and the category cascade order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleDocument {
    pub version: String,
    pub categories: Vec<String>,
    pub catch_all: String,
    pub rules: Vec<RuleRecord>,
}

/// One record of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleRecord {
    Chassis(ChassisRule),
    Category(CategoryRule),
}

/// A recognizable vehicle shorthand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ChassisRule {
    pub brand: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<String>,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub priority: i32,
}

impl ChassisRule {
    /// Human label used in logs and errors, e.g. `BMW 3 Series E90/E91 330d`.
    pub fn label(&self) -> String {
        let mut label = format!("{} {}", self.brand, self.model);
        for part in [&self.generation, &self.variant].into_iter().flatten() {
            label.push(' ');
            label.push_str(part);
        }
        label
    }
}

/// A fallback category with its fuzzy keyword patterns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryRule {
    pub category: String,
    pub patterns: Vec<String>,
}

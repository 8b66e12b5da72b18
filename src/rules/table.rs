//! Rule table loading and validation.
//!
//! A [`RuleTable`] only exists in validated form: every constructor runs the
//! same checks and compiles the patterns, so holding one means the table is
//! safe to serve. Validation failures are configuration errors; callers are
//! expected to refuse to start rather than fall back to a partial table.
//!
//! Checks, in document order:
//!
//! - the category enumeration is non-empty, has no duplicates and contains the
//!   catch-all label;
//! - every chassis rule has a brand, a model and at least one pattern, and no
//!   pattern normalizes to nothing;
//! - no separator-insensitive chassis pattern appears in two rules with the
//!   same priority;
//! - every category rule names a declared category and has patterns.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{info, warn};

use super::schema::{CategoryRule, ChassisRule, RuleDocument, RuleRecord};
use crate::engine::CompiledRules;
use crate::engine::normalize::pattern_tokens;
use crate::error::RuleTableError;

const BUNDLED: &str = include_str!("../../data/rule_table.json");

/// Immutable, validated rule table with its compiled patterns.
#[derive(Debug)]
pub struct RuleTable {
    version: String,
    categories: Vec<String>,
    catch_all: String,
    chassis: Vec<ChassisRule>,
    category_rules: Vec<CategoryRule>,
    compiled: CompiledRules,
}

impl RuleTable {
    /// The table shipped with the crate.
    pub fn bundled() -> Result<Self, RuleTableError> {
        Self::from_json_str(BUNDLED)
    }

    pub fn from_json_str(json: &str) -> Result<Self, RuleTableError> {
        let document: RuleDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleTableError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| RuleTableError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&content)
    }

    pub fn from_document(document: RuleDocument) -> Result<Self, RuleTableError> {
        let RuleDocument { version, categories, catch_all, rules } = document;
        validate_categories(&categories, &catch_all)?;

        let mut chassis = Vec::new();
        let mut category_rules = Vec::new();
        // (literal, priority) -> record index of the first rule declaring it
        let mut literals: HashMap<(String, i32), usize> = HashMap::new();

        for (idx, record) in rules.into_iter().enumerate() {
            match record {
                RuleRecord::Chassis(rule) => {
                    validate_chassis(idx, &rule, &mut literals)?;
                    chassis.push(rule);
                }
                RuleRecord::Category(rule) => {
                    validate_category(idx, &rule, &categories)?;
                    category_rules.push(rule);
                }
            }
        }

        let compiled = CompiledRules::new(&chassis, &category_rules);
        info!(
            version = %version,
            chassis_rules = chassis.len(),
            chassis_patterns = compiled.chassis.len(),
            category_rules = category_rules.len(),
            "rule table loaded"
        );

        Ok(RuleTable { version, categories, catch_all, chassis, category_rules, compiled })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The category enumeration, in declaration order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn catch_all(&self) -> &str {
        &self.catch_all
    }

    pub fn is_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn chassis_rules(&self) -> &[ChassisRule] {
        &self.chassis
    }

    /// Category rules in cascade order.
    pub fn category_rules(&self) -> &[CategoryRule] {
        &self.category_rules
    }

    /// Check the table against a caller-owned category enumeration.
    ///
    /// The table's own enumeration must be a subset of `allowed`, so that every
    /// category the engine can return is one the caller knows how to store.
    pub fn ensure_categories(&self, allowed: &[&str]) -> Result<(), RuleTableError> {
        for category in &self.categories {
            if !allowed.contains(&category.as_str()) {
                return Err(RuleTableError::UnsupportedCategory(category.clone()));
            }
        }
        Ok(())
    }

    pub(crate) fn compiled(&self) -> &CompiledRules {
        &self.compiled
    }
}

fn validate_categories(categories: &[String], catch_all: &str) -> Result<(), RuleTableError> {
    if categories.is_empty() {
        return Err(RuleTableError::NoCategories);
    }
    let mut seen = HashSet::new();
    for category in categories {
        if !seen.insert(category.as_str()) {
            return Err(RuleTableError::DuplicateCategory(category.clone()));
        }
    }
    if !seen.contains(catch_all) {
        return Err(RuleTableError::UnknownCatchAll(catch_all.to_string()));
    }
    Ok(())
}

fn validate_chassis(
    idx: usize,
    rule: &ChassisRule,
    literals: &mut HashMap<(String, i32), usize>,
) -> Result<(), RuleTableError> {
    if rule.brand.trim().is_empty() {
        return Err(RuleTableError::EmptyField { rule: idx, field: "brand" });
    }
    if rule.model.trim().is_empty() {
        return Err(RuleTableError::EmptyField { rule: idx, field: "model" });
    }
    if rule.patterns.is_empty() {
        return Err(RuleTableError::NoPatterns { rule: idx, label: rule.label() });
    }

    let mut own = HashSet::new();
    for pattern in &rule.patterns {
        let tokens = pattern_tokens(pattern);
        if tokens.is_empty() {
            return Err(RuleTableError::BlankPattern { rule: idx, label: rule.label(), pattern: pattern.clone() });
        }
        let literal = tokens.concat();
        if !own.insert(literal.clone()) {
            warn!(rule = %rule.label(), pattern = %pattern, "pattern repeated within one rule");
            continue;
        }
        match literals.get(&(literal.clone(), rule.priority)) {
            Some(&first) => {
                return Err(RuleTableError::DuplicatePattern {
                    pattern: pattern.clone(),
                    first,
                    second: idx,
                    priority: rule.priority,
                });
            }
            None => {
                literals.insert((literal, rule.priority), idx);
            }
        }
    }
    Ok(())
}

fn validate_category(idx: usize, rule: &CategoryRule, categories: &[String]) -> Result<(), RuleTableError> {
    if !categories.contains(&rule.category) {
        return Err(RuleTableError::UnknownCategory { rule: idx, category: rule.category.clone() });
    }
    if rule.patterns.is_empty() {
        return Err(RuleTableError::NoPatterns { rule: idx, label: rule.category.clone() });
    }
    for pattern in &rule.patterns {
        if pattern_tokens(pattern).is_empty() {
            return Err(RuleTableError::BlankPattern {
                rule: idx,
                label: rule.category.clone(),
                pattern: pattern.clone(),
            });
        }
    }
    Ok(())
}

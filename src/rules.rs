//! The rule table: versioned, human-editable data driving both matchers.

mod schema;
mod table;


pub use schema::{CategoryRule, ChassisRule, RuleDocument, RuleRecord};
pub use table::RuleTable;

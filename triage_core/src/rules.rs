//! The built-in diagnosis rule table.
//!
//! The table is global immutable configuration: loaded once, read-only, and
//! its order is the documented tie-break for equal classification scores.

use crate::types::{Condition, ConditionRule};
use once_cell::sync::Lazy;

/// The fixed symptom vocabulary a report may draw from
pub const SYMPTOM_VOCABULARY: [&str; 11] = [
    "fever",
    "headache",
    "chills",
    "loss of appetite",
    "fatigue",
    "body aches",
    "nausea",
    "vomiting",
    "abdominal pain",
    "joint pain",
    "rash",
];

/// Cached rule table - built once and reused across all classifications
static RULE_TABLE: Lazy<Vec<ConditionRule>> = Lazy::new(build_rule_table);

/// Get a reference to the cached rule table
///
/// Iteration order is fixed; ties between equal scores resolve to the
/// earliest rule.
pub fn rule_table() -> &'static [ConditionRule] {
    &RULE_TABLE
}

fn build_rule_table() -> Vec<ConditionRule> {
    vec![
        ConditionRule {
            condition: Condition::Flu,
            required_symptoms: &["fatigue", "body aches"],
        },
        ConditionRule {
            condition: Condition::FoodPoisoning,
            required_symptoms: &["nausea", "vomiting", "abdominal pain"],
        },
        ConditionRule {
            condition: Condition::Malaria,
            required_symptoms: &["fever", "headache", "chills"],
        },
        ConditionRule {
            condition: Condition::Dengue,
            required_symptoms: &["fever", "joint pain", "rash"],
        },
        ConditionRule {
            condition: Condition::Typhoid,
            required_symptoms: &["fever", "headache", "loss of appetite"],
        },
    ]
}

/// Validate the rule table for consistency and completeness
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate_rules(rules: &[ConditionRule]) -> Vec<String> {
    let mut errors = Vec::new();

    for condition in Condition::ALL {
        let count = rules.iter().filter(|r| r.condition == condition).count();
        if count == 0 {
            errors.push(format!("No rule for condition {condition}"));
        }
        if count > 1 {
            errors.push(format!("Duplicate rules for condition {condition}"));
        }
    }

    for rule in rules {
        if rule.required_symptoms.is_empty() {
            errors.push(format!("Rule for {} has no symptoms", rule.condition));
        }
        for symptom in rule.required_symptoms {
            if !SYMPTOM_VOCABULARY.contains(symptom) {
                errors.push(format!(
                    "Rule for {} uses symptom '{}' outside the vocabulary",
                    rule.condition, symptom
                ));
            }
            if symptom.chars().any(|c| c.is_uppercase()) {
                errors.push(format!(
                    "Rule for {} has non-lowercase symptom '{}'",
                    rule.condition, symptom
                ));
            }
        }
    }

    errors
}

//! Symptom classifier.
//!
//! Scores a symptom report against every rule in the table and picks the
//! condition with the strictly highest match count. A best score below the
//! decision threshold yields `Unknown` so a single coincidental symptom
//! never produces a diagnosis.

use crate::rules::rule_table;
use crate::types::{Diagnosis, SymptomReport};

/// Minimum match count required for a diagnosis
pub const MIN_MATCH_SCORE: usize = 2;

/// Classify a symptom report against the built-in rule table
///
/// Pure function of the report and the static table: same input always
/// yields the same output. Ties between equal scores resolve to the rule
/// listed first in the table (strictly-greater comparison keeps the
/// earliest maximum).
pub fn classify(report: &SymptomReport) -> Diagnosis {
    let mut best: Option<(Diagnosis, usize)> = None;

    for rule in rule_table() {
        let score = rule
            .required_symptoms
            .iter()
            .filter(|s| report.is_present(s))
            .count();

        tracing::debug!(condition = %rule.condition, score, "scored rule");

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((Diagnosis::Condition(rule.condition), score));
        }
    }

    match best {
        Some((diagnosis, score)) if score >= MIN_MATCH_SCORE => {
            tracing::debug!(%diagnosis, score, "classified report");
            diagnosis
        }
        _ => Diagnosis::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Condition;

    #[test]
    fn test_empty_report_is_unknown() {
        assert_eq!(classify(&SymptomReport::new()), Diagnosis::Unknown);
    }

    #[test]
    fn test_single_symptom_below_threshold() {
        let report = SymptomReport::from_present(["fever"]);
        assert_eq!(classify(&report), Diagnosis::Unknown);
    }

    #[test]
    fn test_full_malaria_triple() {
        let report = SymptomReport::from_present(["fever", "headache", "chills"]);
        assert_eq!(
            classify(&report),
            Diagnosis::Condition(Condition::Malaria)
        );
    }

    #[test]
    fn test_tie_resolves_to_earlier_rule() {
        // fever + headache scores 2 for both Malaria and Typhoid;
        // Malaria comes first in the table and must win.
        let report = SymptomReport::from_present(["fever", "headache"]);
        assert_eq!(
            classify(&report),
            Diagnosis::Condition(Condition::Malaria)
        );
    }

    #[test]
    fn test_food_poisoning_pair() {
        let report = SymptomReport::from_present(["nausea", "vomiting"]);
        assert_eq!(
            classify(&report),
            Diagnosis::Condition(Condition::FoodPoisoning)
        );
    }

    #[test]
    fn test_case_insensitive_input() {
        let report = SymptomReport::from_present(["Fatigue", "Body Aches"]);
        assert_eq!(classify(&report), Diagnosis::Condition(Condition::Flu));
    }

    #[test]
    fn test_explicit_false_flags_do_not_score() {
        let mut report = SymptomReport::new();
        report.set("fever", false);
        report.set("headache", false);
        report.set("chills", true);

        assert_eq!(classify(&report), Diagnosis::Unknown);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let report = SymptomReport::from_present(["fever", "joint pain", "rash"]);
        let first = classify(&report);
        for _ in 0..10 {
            assert_eq!(classify(&report), first);
        }
        assert_eq!(first, Diagnosis::Condition(Condition::Dengue));
    }
}

//! Core domain types for the triage and bed-booking system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Symptom reports and condition labels
//! - Diagnosis rules
//! - Hospital resource pools and their bed counters
//! - Reservations binding a requester to a bed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Classification Types
// ============================================================================

/// A diagnosable condition
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Flu,
    FoodPoisoning,
    Malaria,
    Dengue,
    Typhoid,
}

impl Condition {
    /// All conditions, in rule-table order
    pub const ALL: [Condition; 5] = [
        Condition::Flu,
        Condition::FoodPoisoning,
        Condition::Malaria,
        Condition::Dengue,
        Condition::Typhoid,
    ];
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Condition::Flu => "Flu",
            Condition::FoodPoisoning => "Food Poisoning",
            Condition::Malaria => "Malaria",
            Condition::Dengue => "Dengue",
            Condition::Typhoid => "Typhoid",
        };
        f.write_str(label)
    }
}

/// Outcome of classifying a symptom report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnosis {
    /// A condition matched with sufficient confidence
    Condition(Condition),
    /// No condition scored at or above the decision threshold
    Unknown,
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::Condition(c) => c.fmt(f),
            Diagnosis::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Symptoms required for one condition
///
/// The order of rules in the table is the documented tie-break: when two
/// conditions score equally, the earlier rule wins.
#[derive(Clone, Debug)]
pub struct ConditionRule {
    pub condition: Condition,
    pub required_symptoms: &'static [&'static str],
}

/// A set of reported symptoms, keyed by normalized (lowercase) identifier
///
/// Symptoms absent from the report read as not present; partial reports are
/// never an error. Ephemeral, created per classification request.
#[derive(Clone, Debug, Default)]
pub struct SymptomReport {
    present: HashMap<String, bool>,
}

impl SymptomReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a symptom flag, normalizing the key
    pub fn set(&mut self, symptom: &str, present: bool) {
        self.present.insert(symptom.trim().to_lowercase(), present);
    }

    /// Whether a symptom was reported present (case-insensitive)
    pub fn is_present(&self, symptom: &str) -> bool {
        self.present
            .get(&symptom.trim().to_lowercase())
            .copied()
            .unwrap_or(false)
    }

    /// Build a report from symptoms reported present
    pub fn from_present<I, S>(symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = Self::new();
        for s in symptoms {
            report.set(s.as_ref(), true);
        }
        report
    }
}

// ============================================================================
// Capacity Types
// ============================================================================

/// A hospital's bed stock for one condition
///
/// `available_beds` is never negative and only changes through the booking
/// operations (or an administrative reset). `initial_beds` is the seed value,
/// kept so reset can restore it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourcePool {
    pub name: String,
    pub condition: Condition,
    pub available_beds: u32,
    pub initial_beds: u32,
}

/// A confirmed booking binding a requester to one bed of a pool
///
/// Every live reservation corresponds to exactly one decremented bed; its
/// deletion restores that bed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    pub id: Uuid,
    pub requester: String,
    pub pool: String,
    pub booked_at: DateTime<Utc>,
}

/// Seed record for store initialization
#[derive(Clone, Debug)]
pub struct PoolSeed {
    pub name: &'static str,
    pub condition: Condition,
    pub beds: u32,
}

/// Outcome of a single booking attempt
#[derive(Clone, Debug)]
pub enum BookOutcome {
    /// A bed was decremented and a reservation committed
    Confirmed(Reservation),
    /// The pool had no beds left at commit time; nothing was mutated.
    /// The caller is expected to retry with a different candidate.
    Conflict,
}

impl BookOutcome {
    /// Get the reservation for a confirmed booking (None on conflict)
    pub fn reservation(&self) -> Option<&Reservation> {
        match self {
            BookOutcome::Confirmed(r) => Some(r),
            BookOutcome::Conflict => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keys_are_case_insensitive() {
        let mut report = SymptomReport::new();
        report.set("  Fever ", true);

        assert!(report.is_present("fever"));
        assert!(report.is_present("FEVER"));
        assert!(!report.is_present("headache"));
    }

    #[test]
    fn test_absent_symptom_reads_false() {
        let report = SymptomReport::new();
        assert!(!report.is_present("rash"));
    }

    #[test]
    fn test_explicit_false_flag() {
        let mut report = SymptomReport::new();
        report.set("fever", false);
        assert!(!report.is_present("fever"));
    }

    #[test]
    fn test_condition_display_labels() {
        assert_eq!(Condition::FoodPoisoning.to_string(), "Food Poisoning");
        assert_eq!(Diagnosis::Unknown.to_string(), "Unknown");
        assert_eq!(
            Diagnosis::Condition(Condition::Malaria).to_string(),
            "Malaria"
        );
    }
}

//! Default hospital directory used to seed an empty store.
//!
//! Ten hospitals, two per condition, each starting with the configured
//! number of beds.

use crate::types::{Condition, PoolSeed};

/// Build the default hospital seed set with `beds` per hospital
pub fn default_directory(beds: u32) -> Vec<PoolSeed> {
    let assignments: [(&'static str, Condition); 10] = [
        ("Hospital A", Condition::Flu),
        ("Hospital B", Condition::Flu),
        ("Hospital C", Condition::FoodPoisoning),
        ("Hospital D", Condition::FoodPoisoning),
        ("Hospital E", Condition::Malaria),
        ("Hospital F", Condition::Malaria),
        ("Hospital G", Condition::Dengue),
        ("Hospital H", Condition::Dengue),
        ("Hospital I", Condition::Typhoid),
        ("Hospital J", Condition::Typhoid),
    ];

    assignments
        .into_iter()
        .map(|(name, condition)| PoolSeed {
            name,
            condition,
            beds,
        })
        .collect()
}

/// Validate a seed set for consistency and completeness
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate_seeds(seeds: &[PoolSeed]) -> Vec<String> {
    let mut errors = Vec::new();

    let mut names = std::collections::HashSet::new();
    for seed in seeds {
        if seed.name.is_empty() {
            errors.push("Seed has empty hospital name".to_string());
        }
        if !names.insert(seed.name) {
            errors.push(format!("Duplicate hospital name '{}'", seed.name));
        }
        if seed.beds == 0 {
            errors.push(format!("Hospital '{}' seeded with zero beds", seed.name));
        }
    }

    for condition in Condition::ALL {
        if !seeds.iter().any(|s| s.condition == condition) {
            errors.push(format!("No hospital seeded for condition {condition}"));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directory_shape() {
        let seeds = default_directory(5);
        assert_eq!(seeds.len(), 10);
        assert!(seeds.iter().all(|s| s.beds == 5));
    }

    #[test]
    fn test_two_hospitals_per_condition() {
        let seeds = default_directory(5);
        for condition in Condition::ALL {
            let count = seeds.iter().filter(|s| s.condition == condition).count();
            assert_eq!(count, 2, "Expected 2 hospitals for {condition}");
        }
    }

    #[test]
    fn test_default_directory_validates() {
        let errors = validate_seeds(&default_directory(5));
        assert!(
            errors.is_empty(),
            "Default directory has validation errors: {:?}",
            errors
        );
    }
}

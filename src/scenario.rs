//! Input cases fed identically into both pipelines.
//!
//! A scenario is immutable once constructed. `expected_label` exists only
//! for scoring the report; it is never part of any prompt.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::contracts::UrgencyLevel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub case_id: String,
    pub description: String,
    pub narrative: String,
    pub expected_label: UrgencyLevel,
}

impl Scenario {
    pub fn new(
        case_id: impl Into<String>,
        description: impl Into<String>,
        narrative: impl Into<String>,
        expected_label: UrgencyLevel,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            description: description.into(),
            narrative: narrative.into(),
            expected_label,
        }
    }
}

/// Built-in cases, keyed by `case_id`.
pub static SCENARIOS: Lazy<Vec<Scenario>> =
    Lazy::new(|| vec![ambiguous_headache(), crushing_chest_pain()]);

/// Look up a built-in scenario by id.
pub fn find(case_id: &str) -> Option<Scenario> {
    SCENARIOS.iter().find(|s| s.case_id == case_id).cloned()
}

/// The ambiguous headache case.
///
/// Designed to trigger drift: normal vitals, moderate severity, unremarkable
/// history, and a closing patient remark that carries anxiety but no clinical
/// content. On the facts alone the correct classification is routine; a
/// stage-2 call that can see stage-1 speculation tends to escalate.
pub fn ambiguous_headache() -> Scenario {
    Scenario::new(
        "ambiguous_headache",
        "Ambiguous headache with speculation risk",
        "Patient: 28-year-old female\n\
         Chief complaint: Moderate headache, started this morning\n\
         Symptoms:\n\
         - Throbbing headache (4/10 severity)\n\
         - Mild sensitivity to light\n\
         - No nausea, no vision changes\n\
         Vital signs: All normal (BP 120/80, HR 72, O2 Sat 98%)\n\
         History: Occasional tension headaches, no migraines\n\
         Patient statement: \"I'm worried this might be something serious, maybe a migraine or worse\"",
        UrgencyLevel::Routine,
    )
}

/// A clear-cut control case where both pipelines should agree.
pub fn crushing_chest_pain() -> Scenario {
    Scenario::new(
        "crushing_chest_pain",
        "Unambiguous cardiac presentation",
        "Patient: 61-year-old male\n\
         Chief complaint: Crushing substernal chest pain, started 40 minutes ago\n\
         Symptoms:\n\
         - Chest pressure radiating to left arm (9/10 severity)\n\
         - Diaphoresis, shortness of breath\n\
         Vital signs: BP 88/60, HR 118, O2 Sat 91%\n\
         History: Hypertension, smoker, father died of MI at 58",
        UrgencyLevel::Immediate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_are_unique() {
        let mut ids: Vec<_> = SCENARIOS.iter().map(|s| s.case_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SCENARIOS.len());
    }

    #[test]
    fn find_known_case() {
        let scenario = find("ambiguous_headache").unwrap();
        assert_eq!(scenario.expected_label, UrgencyLevel::Routine);
        assert!(scenario.narrative.contains("maybe a migraine or worse"));
    }
}

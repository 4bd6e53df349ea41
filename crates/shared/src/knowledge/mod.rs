//! Static medical tables. The contents are illustrative and carry no clinical authority.

mod diseases;
mod medications;
mod treatments;
mod vocabulary;

pub use diseases::{DISEASES, DiseaseRecord, find_disease};
pub use medications::{MEDICATIONS, MedicationRecord, find_medication, medication_mentions};
pub use treatments::{
    BASIC_TESTS, DISEASE_TREATMENT_PLANS, DISEASE_TREATMENTS, DEFAULT_DISEASE_TREATMENTS,
    DiseaseTreatmentPlan, GENERAL_SELF_CARE_TIPS, LIFESTYLE_TREATMENTS, PlannedMedication,
    SYMPTOM_SELF_CARE_TIPS, SYMPTOM_TESTS, SYMPTOM_TREATMENTS, TestRecord, TreatmentItem,
    find_treatment_plan,
};
pub(crate) use treatments::{GLUCOSE_TEST, MINOR_TREATMENT, OLDER_ADULT_TREATMENT};
pub use vocabulary::{
    EMERGENCY_SYMPTOMS, MODERATE_SYMPTOMS, SYMPTOM_CATEGORIES, SYMPTOM_SYNONYMS, SYMPTOM_TERMS,
};

/// Lowercases, folds curly quotes, and collapses whitespace so table lookups are stable.
pub fn normalize_term(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['\u{2019}', '\u{2018}'], "'")
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

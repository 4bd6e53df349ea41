use crate::models::{Severity, Urgency};

use super::normalize_term;

#[derive(Debug, Clone, Copy)]
pub struct DiseaseRecord {
    pub key: &'static str,
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
    pub description: &'static str,
    pub severity: Severity,
    pub urgency: Urgency,
    pub typical_recovery: &'static str,
    pub common_in: &'static [&'static str],
}

/// Table order is the tie-break order when two diseases score the same.
pub const DISEASES: &[DiseaseRecord] = &[
    DiseaseRecord {
        key: "common_cold",
        name: "Common Cold",
        symptoms: &[
            "runny nose",
            "sneezing",
            "cough",
            "sore throat",
            "mild fever",
            "congestion",
        ],
        description: "Viral infection of the upper respiratory tract",
        severity: Severity::Mild,
        urgency: Urgency::Low,
        typical_recovery: "7-10 days",
        common_in: &["all ages", "seasonal"],
    },
    DiseaseRecord {
        key: "influenza",
        name: "Influenza",
        symptoms: &[
            "high fever",
            "body aches",
            "fatigue",
            "dry cough",
            "headache",
            "chills",
            "sweating",
        ],
        description: "Viral infection affecting respiratory system",
        severity: Severity::Moderate,
        urgency: Urgency::Medium,
        typical_recovery: "1-2 weeks",
        common_in: &["all ages", "winter season"],
    },
    DiseaseRecord {
        key: "migraine",
        name: "Migraine",
        symptoms: &[
            "severe headache",
            "nausea",
            "sensitivity to light",
            "sensitivity to sound",
            "aura",
        ],
        description: "Neurological condition causing severe headaches",
        severity: Severity::Moderate,
        urgency: Urgency::Medium,
        typical_recovery: "4-72 hours",
        common_in: &["adults", "more common in women"],
    },
    DiseaseRecord {
        key: "gastroenteritis",
        name: "Gastroenteritis",
        symptoms: &[
            "diarrhea",
            "vomiting",
            "stomach pain",
            "nausea",
            "fever",
            "loss of appetite",
        ],
        description: "Inflammation of stomach and intestines (stomach flu)",
        severity: Severity::Moderate,
        urgency: Urgency::Medium,
        typical_recovery: "2-5 days",
        common_in: &["all ages"],
    },
    DiseaseRecord {
        key: "sinusitis",
        name: "Sinusitis",
        symptoms: &[
            "facial pain",
            "nasal congestion",
            "headache",
            "cough",
            "post-nasal drip",
            "fatigue",
        ],
        description: "Inflammation of the sinuses",
        severity: Severity::Mild,
        urgency: Urgency::Low,
        typical_recovery: "2-4 weeks",
        common_in: &["adults"],
    },
    DiseaseRecord {
        key: "bronchitis",
        name: "Bronchitis",
        symptoms: &[
            "cough",
            "mucus production",
            "fatigue",
            "shortness of breath",
            "chest discomfort",
            "wheezing",
        ],
        description: "Inflammation of the bronchial tubes",
        severity: Severity::Moderate,
        urgency: Urgency::Medium,
        typical_recovery: "3-4 weeks",
        common_in: &["smokers", "elderly"],
    },
    DiseaseRecord {
        key: "strep_throat",
        name: "Strep Throat",
        symptoms: &[
            "sore throat",
            "fever",
            "swollen tonsils",
            "difficulty swallowing",
            "white patches",
        ],
        description: "Bacterial infection of the throat",
        severity: Severity::Moderate,
        urgency: Urgency::Medium,
        typical_recovery: "3-7 days with antibiotics",
        common_in: &["children", "young adults"],
    },
    DiseaseRecord {
        key: "urinary_tract_infection",
        name: "Urinary Tract Infection",
        symptoms: &[
            "burning sensation",
            "frequent urination",
            "cloudy urine",
            "pelvic pain",
            "fever",
        ],
        description: "Infection in any part of urinary system",
        severity: Severity::Moderate,
        urgency: Urgency::Medium,
        typical_recovery: "3-7 days with antibiotics",
        common_in: &["women"],
    },
    DiseaseRecord {
        key: "anxiety_disorder",
        name: "Anxiety Disorder",
        symptoms: &[
            "anxiety",
            "restlessness",
            "panic attacks",
            "insomnia",
            "muscle tension",
        ],
        description: "Mental health condition with excessive anxiety",
        severity: Severity::Moderate,
        urgency: Urgency::Medium,
        typical_recovery: "Varies with treatment",
        common_in: &["all ages"],
    },
    DiseaseRecord {
        key: "covid_19",
        name: "COVID-19",
        symptoms: &[
            "fever",
            "cough",
            "shortness of breath",
            "fatigue",
            "loss of taste or smell",
        ],
        description: "Viral respiratory illness caused by SARS-CoV-2",
        severity: Severity::Variable,
        urgency: Urgency::High,
        typical_recovery: "1-3 weeks",
        common_in: &["all ages"],
    },
    DiseaseRecord {
        key: "appendicitis",
        name: "Appendicitis",
        symptoms: &["abdominal pain", "nausea", "vomiting", "fever"],
        description: "Inflammation of the appendix requiring prompt surgical evaluation",
        severity: Severity::Severe,
        urgency: Urgency::High,
        typical_recovery: "2-4 weeks after surgery",
        common_in: &["ages 10-30"],
    },
];

/// Resolves either the table key (`common_cold`) or the display name (`Common Cold`).
pub fn find_disease(name: &str) -> Option<&'static DiseaseRecord> {
    let wanted = normalize_term(name);
    DISEASES.iter().find(|disease| {
        normalize_term(disease.key) == wanted || normalize_term(disease.name) == wanted
    })
}

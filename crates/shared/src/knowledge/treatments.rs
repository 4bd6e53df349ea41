use crate::models::Priority;

use super::normalize_term;

#[derive(Debug, Clone, Copy)]
pub struct TreatmentItem {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: &'static str,
    pub priority: Priority,
    pub duration: Option<&'static str>,
}

const fn item(
    name: &'static str,
    description: &'static str,
    kind: &'static str,
    priority: Priority,
) -> TreatmentItem {
    TreatmentItem {
        name,
        description,
        kind,
        priority,
        duration: None,
    }
}

/// Keyed by disease table key.
pub const DISEASE_TREATMENTS: &[(&str, &[TreatmentItem])] = &[
    (
        "common_cold",
        &[
            item(
                "Nasal Saline Spray",
                "For congestion relief without medication",
                "self_care",
                Priority::Medium,
            ),
            item(
                "Steam Inhalation",
                "Warm steam to loosen mucus",
                "self_care",
                Priority::Low,
            ),
            item(
                "Throat Lozenges",
                "For sore throat relief",
                "medication",
                Priority::Medium,
            ),
        ],
    ),
    (
        "influenza",
        &[
            item(
                "Antiviral Medication",
                "If prescribed within 48 hours of symptoms",
                "medication",
                Priority::High,
            ),
            item(
                "Fever Management",
                "Regular monitoring and medication as needed",
                "monitoring",
                Priority::High,
            ),
            item(
                "Isolation",
                "Rest at home to prevent spread",
                "prevention",
                Priority::High,
            ),
        ],
    ),
    (
        "migraine",
        &[
            item(
                "Dark, Quiet Environment",
                "Reduce sensory stimulation",
                "environment",
                Priority::High,
            ),
            item(
                "Hydration with Electrolytes",
                "Prevent dehydration headache",
                "nutrition",
                Priority::Medium,
            ),
            item(
                "Trigger Avoidance",
                "Identify and avoid personal triggers",
                "prevention",
                Priority::Medium,
            ),
        ],
    ),
    (
        "gastroenteritis",
        &[
            item(
                "Oral Rehydration Solution",
                "Restore electrolyte balance",
                "nutrition",
                Priority::High,
            ),
            item(
                "BRAT Diet",
                "Bananas, Rice, Applesauce, Toast - easy to digest",
                "diet",
                Priority::High,
            ),
            item(
                "Probiotics",
                "Restore gut flora after symptoms subside",
                "supplement",
                Priority::Low,
            ),
        ],
    ),
];

pub const DEFAULT_DISEASE_TREATMENTS: &[TreatmentItem] = &[
    item(
        "Symptom Management",
        "Address specific symptoms as they arise",
        "general",
        Priority::Medium,
    ),
    item(
        "Medical Follow-up",
        "Consult healthcare provider for proper diagnosis",
        "medical",
        Priority::High,
    ),
];

pub const SYMPTOM_TREATMENTS: &[(&str, TreatmentItem)] = &[
    (
        "fever",
        item(
            "Fever Reducers",
            "Acetaminophen or ibuprofen as directed",
            "medication",
            Priority::Medium,
        ),
    ),
    (
        "headache",
        item(
            "Headache Relief",
            "Rest in quiet environment, consider OTC pain relief",
            "medication",
            Priority::Medium,
        ),
    ),
    (
        "cough",
        item(
            "Cough Management",
            "Honey (adults), cough drops, humidifier",
            "self_care",
            Priority::Low,
        ),
    ),
    (
        "sore throat",
        item(
            "Throat Soothers",
            "Warm salt water gargle, throat lozenges",
            "self_care",
            Priority::Medium,
        ),
    ),
    (
        "nausea",
        item(
            "Nausea Control",
            "Ginger tea, small bland meals, avoid strong smells",
            "diet",
            Priority::Medium,
        ),
    ),
    (
        "fatigue",
        item(
            "Energy Conservation",
            "Pace activities, prioritize rest",
            "lifestyle",
            Priority::Medium,
        ),
    ),
];

pub const LIFESTYLE_TREATMENTS: &[TreatmentItem] = &[
    TreatmentItem {
        name: "Adequate Rest",
        description: "7-9 hours of quality sleep to support immune function",
        kind: "lifestyle",
        priority: Priority::High,
        duration: Some("Daily"),
    },
    TreatmentItem {
        name: "Proper Hydration",
        description: "8-10 glasses of water daily, more if feverish",
        kind: "nutrition",
        priority: Priority::High,
        duration: Some("Daily"),
    },
    TreatmentItem {
        name: "Balanced Nutrition",
        description: "Focus on fruits, vegetables, and lean proteins",
        kind: "nutrition",
        priority: Priority::Medium,
        duration: Some("Daily"),
    },
];

pub(crate) const OLDER_ADULT_TREATMENT: TreatmentItem = TreatmentItem {
    name: "Gentle Movement",
    description: "Light walking or stretching as tolerated",
    kind: "exercise",
    priority: Priority::Medium,
    duration: Some("Daily, as able"),
};

pub(crate) const MINOR_TREATMENT: TreatmentItem = TreatmentItem {
    name: "Parental Monitoring",
    description: "Close observation by caregiver",
    kind: "care",
    priority: Priority::High,
    duration: Some("Until recovered"),
};

#[derive(Debug, Clone, Copy)]
pub struct TestRecord {
    pub name: &'static str,
    pub purpose: &'static str,
    pub priority: Priority,
}

pub const BASIC_TESTS: &[TestRecord] = &[
    TestRecord {
        name: "Complete Blood Count (CBC)",
        purpose: "General health screening",
        priority: Priority::Medium,
    },
    TestRecord {
        name: "Vital Signs Check",
        purpose: "Blood pressure, heart rate, temperature",
        priority: Priority::Low,
    },
];

/// Each entry fires when any of its trigger symptoms is present.
pub const SYMPTOM_TESTS: &[(&[&str], &[TestRecord])] = &[
    (
        &["fever", "infection"],
        &[TestRecord {
            name: "Inflammatory Markers (CRP, ESR)",
            purpose: "Check for inflammation",
            priority: Priority::Medium,
        }],
    ),
    (
        &["cough", "shortness of breath", "chest pain"],
        &[
            TestRecord {
                name: "Chest X-ray",
                purpose: "Check lung health",
                priority: Priority::Medium,
            },
            TestRecord {
                name: "Pulse Oximetry",
                purpose: "Measure oxygen levels",
                priority: Priority::Low,
            },
        ],
    ),
    (
        &["abdominal pain", "nausea", "vomiting", "diarrhea"],
        &[
            TestRecord {
                name: "Basic Metabolic Panel",
                purpose: "Check organ function and electrolytes",
                priority: Priority::Medium,
            },
            TestRecord {
                name: "Stool Test (if indicated)",
                purpose: "Check for infections",
                priority: Priority::Low,
            },
        ],
    ),
    (
        &["headache", "dizziness", "neurological symptoms"],
        &[TestRecord {
            name: "Neurological Examination",
            purpose: "Comprehensive neurological assessment",
            priority: Priority::Medium,
        }],
    ),
];

pub(crate) const GLUCOSE_TEST: TestRecord = TestRecord {
    name: "Blood Glucose Test",
    purpose: "Check for diabetes",
    priority: Priority::Low,
};

pub const GENERAL_SELF_CARE_TIPS: &[&str] = &[
    "Stay hydrated with water and herbal teas",
    "Get plenty of rest - your body heals during sleep",
    "Eat nutritious, easily digestible foods",
    "Practice gentle breathing exercises for relaxation",
    "Maintain a comfortable room temperature",
];

pub const SYMPTOM_SELF_CARE_TIPS: &[(&str, &[&str])] = &[
    (
        "fever",
        &[
            "Use lukewarm sponge baths to reduce fever",
            "Dress in light, breathable clothing",
        ],
    ),
    (
        "cough",
        &[
            "Use a humidifier in your room",
            "Prop yourself up with pillows at night",
        ],
    ),
    (
        "headache",
        &[
            "Apply cold compress to forehead",
            "Reduce screen time and bright lights",
        ],
    ),
    (
        "nausea",
        &["Sip ginger tea or ginger ale", "Eat small, frequent meals"],
    ),
    (
        "fatigue",
        &[
            "Pace your activities throughout the day",
            "Take short, frequent rests",
        ],
    ),
];

#[derive(Debug, Clone, Copy)]
pub struct PlannedMedication {
    pub name: &'static str,
    pub purpose: &'static str,
    pub dosage: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct DiseaseTreatmentPlan {
    pub key: &'static str,
    pub name: &'static str,
    pub treatments: &'static [&'static str],
    pub medications: &'static [PlannedMedication],
    pub duration: &'static str,
    pub follow_up: &'static str,
}

pub const DISEASE_TREATMENT_PLANS: &[DiseaseTreatmentPlan] = &[
    DiseaseTreatmentPlan {
        key: "common_cold",
        name: "Common Cold",
        treatments: &[
            "Rest and hydration",
            "Over-the-counter cold medication",
            "Nasal decongestants",
            "Throat lozenges",
            "Steam inhalation",
        ],
        medications: &[
            PlannedMedication {
                name: "Acetaminophen",
                purpose: "Fever/pain relief",
                dosage: "500mg every 6 hours",
            },
            PlannedMedication {
                name: "Ibuprofen",
                purpose: "Anti-inflammatory",
                dosage: "400mg every 8 hours",
            },
            PlannedMedication {
                name: "Pseudoephedrine",
                purpose: "Decongestant",
                dosage: "60mg every 6 hours",
            },
        ],
        duration: "7-10 days",
        follow_up: "If symptoms persist beyond 10 days",
    },
    DiseaseTreatmentPlan {
        key: "influenza",
        name: "Influenza (Flu)",
        treatments: &[
            "Antiviral medication (if early)",
            "Rest and fluids",
            "Fever reducers",
            "Symptom management",
            "Isolation to prevent spread",
        ],
        medications: &[
            PlannedMedication {
                name: "Oseltamivir",
                purpose: "Antiviral",
                dosage: "75mg twice daily for 5 days",
            },
            PlannedMedication {
                name: "Acetaminophen",
                purpose: "Fever/pain",
                dosage: "650mg every 6 hours",
            },
        ],
        duration: "1-2 weeks",
        follow_up: "If breathing difficulties develop",
    },
    DiseaseTreatmentPlan {
        key: "migraine",
        name: "Migraine",
        treatments: &[
            "Rest in dark, quiet room",
            "Cold compress on forehead",
            "Medication for acute attack",
            "Preventive medication if frequent",
            "Identify and avoid triggers",
        ],
        medications: &[
            PlannedMedication {
                name: "Sumatriptan",
                purpose: "Acute treatment",
                dosage: "50-100mg at onset",
            },
            PlannedMedication {
                name: "Naproxen",
                purpose: "Pain relief",
                dosage: "500mg initial, then 250mg every 8 hours",
            },
        ],
        duration: "Varies",
        follow_up: "If migraines become more frequent",
    },
    DiseaseTreatmentPlan {
        key: "gastroenteritis",
        name: "Gastroenteritis",
        treatments: &[
            "Oral rehydration solution",
            "BRAT diet (bananas, rice, applesauce, toast)",
            "Avoid dairy and fatty foods",
            "Rest",
            "Gradual return to normal diet",
        ],
        medications: &[
            PlannedMedication {
                name: "Loperamide",
                purpose: "Anti-diarrheal",
                dosage: "4mg initial, then 2mg after each loose stool",
            },
            PlannedMedication {
                name: "Ondansetron",
                purpose: "Anti-nausea",
                dosage: "4-8mg every 8 hours as needed",
            },
        ],
        duration: "2-5 days",
        follow_up: "If symptoms worsen or blood in stool",
    },
];

/// Accepts the plan key, the plan name, or the disease display name (`Influenza`).
pub fn find_treatment_plan(diagnosis: &str) -> Option<&'static DiseaseTreatmentPlan> {
    let wanted = normalize_term(diagnosis);
    if wanted.is_empty() {
        return None;
    }
    DISEASE_TREATMENT_PLANS.iter().find(|plan| {
        normalize_term(plan.key) == wanted
            || normalize_term(plan.name) == wanted
            || normalize_term(plan.name).starts_with(&format!("{wanted} ("))
    })
}

#[cfg(test)]
mod tests {
    use super::{DISEASE_TREATMENTS, find_treatment_plan};
    use crate::knowledge::find_disease;

    #[test]
    fn plan_lookup_accepts_display_names() {
        assert_eq!(
            find_treatment_plan("Influenza").map(|plan| plan.key),
            Some("influenza")
        );
        assert_eq!(
            find_treatment_plan("common_cold").map(|plan| plan.name),
            Some("Common Cold")
        );
        assert!(find_treatment_plan("Bronchitis").is_none());
        assert!(find_treatment_plan("  ").is_none());
    }

    #[test]
    fn disease_treatments_reference_known_diseases() {
        for (key, _) in DISEASE_TREATMENTS {
            assert!(find_disease(key).is_some(), "unknown disease key {key}");
        }
    }
}

use crate::triage::MatchMode;

use super::normalize_term;

#[derive(Debug, Clone, Copy)]
pub struct MedicationRecord {
    pub name: &'static str,
    pub category: &'static str,
    pub drug_class: &'static str,
    pub otc: bool,
    pub max_daily: Option<&'static str>,
    pub side_effects: &'static [&'static str],
    pub precautions: &'static [&'static str],
}

pub(crate) const DEFAULT_SIDE_EFFECTS: &[&str] = &["Consult medication guide for side effects"];
pub(crate) const DEFAULT_PRECAUTIONS: &[&str] = &["Follow healthcare provider's instructions"];

pub const MEDICATIONS: &[MedicationRecord] = &[
    MedicationRecord {
        name: "Acetaminophen",
        category: "analgesics",
        drug_class: "Pain reliever",
        otc: true,
        max_daily: Some("4000mg"),
        side_effects: &["Nausea", "Rash", "Liver damage (with overdose)"],
        precautions: &[
            "Do not exceed 4000mg daily",
            "Avoid with alcohol",
            "Check other medications for acetaminophen",
        ],
    },
    MedicationRecord {
        name: "Ibuprofen",
        category: "analgesics",
        drug_class: "NSAID",
        otc: true,
        max_daily: Some("3200mg"),
        side_effects: &[
            "Upset stomach",
            "Heartburn",
            "Dizziness",
            "Kidney issues (prolonged use)",
        ],
        precautions: &[
            "Take with food",
            "Avoid if pregnant",
            "Caution with kidney disease",
        ],
    },
    MedicationRecord {
        name: "Naproxen",
        category: "analgesics",
        drug_class: "NSAID",
        otc: true,
        max_daily: Some("1375mg"),
        side_effects: DEFAULT_SIDE_EFFECTS,
        precautions: DEFAULT_PRECAUTIONS,
    },
    MedicationRecord {
        name: "Cetirizine",
        category: "antihistamines",
        drug_class: "Antihistamine",
        otc: true,
        max_daily: Some("10mg"),
        side_effects: &["Drowsiness", "Dry mouth", "Headache", "Fatigue"],
        precautions: DEFAULT_PRECAUTIONS,
    },
    MedicationRecord {
        name: "Loratadine",
        category: "antihistamines",
        drug_class: "Antihistamine",
        otc: true,
        max_daily: Some("10mg"),
        side_effects: DEFAULT_SIDE_EFFECTS,
        precautions: DEFAULT_PRECAUTIONS,
    },
    MedicationRecord {
        name: "Fexofenadine",
        category: "antihistamines",
        drug_class: "Antihistamine",
        otc: true,
        max_daily: Some("180mg"),
        side_effects: DEFAULT_SIDE_EFFECTS,
        precautions: DEFAULT_PRECAUTIONS,
    },
    MedicationRecord {
        name: "Amoxicillin",
        category: "antibiotics",
        drug_class: "Antibiotic",
        otc: false,
        max_daily: None,
        side_effects: &["Diarrhea", "Nausea", "Rash", "Yeast infection"],
        precautions: &[
            "Complete full course",
            "Take as prescribed",
            "Report allergic reactions immediately",
        ],
    },
    MedicationRecord {
        name: "Azithromycin",
        category: "antibiotics",
        drug_class: "Antibiotic",
        otc: false,
        max_daily: None,
        side_effects: DEFAULT_SIDE_EFFECTS,
        precautions: DEFAULT_PRECAUTIONS,
    },
    MedicationRecord {
        name: "Doxycycline",
        category: "antibiotics",
        drug_class: "Antibiotic",
        otc: false,
        max_daily: None,
        side_effects: DEFAULT_SIDE_EFFECTS,
        precautions: DEFAULT_PRECAUTIONS,
    },
];

/// Brand and regional names resolved to the catalogue's generic name.
const MEDICATION_ALIASES: &[(&str, &str)] = &[
    ("tylenol", "acetaminophen"),
    ("paracetamol", "acetaminophen"),
    ("advil", "ibuprofen"),
    ("motrin", "ibuprofen"),
    ("aleve", "naproxen"),
    ("zyrtec", "cetirizine"),
    ("claritin", "loratadine"),
    ("allegra", "fexofenadine"),
];

/// Commonly mentioned drugs the catalogue does not describe.
const UNCATALOGUED_MEDICATIONS: &[&str] = &[
    "aspirin",
    "penicillin",
    "omeprazole",
    "atorvastatin",
    "metformin",
    "lisinopril",
    "levothyroxine",
    "albuterol",
    "prednisone",
    "tramadol",
    "codeine",
    "nexium",
    "prilosec",
    "zoloft",
    "prozac",
    "lexapro",
    "xanax",
    "ambien",
    "vicodin",
    "hydrocodone",
    "oxycodone",
    "morphine",
    "insulin",
    "warfarin",
];

pub fn find_medication(name: &str) -> Option<&'static MedicationRecord> {
    let wanted = normalize_term(name);
    let generic = MEDICATION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .map(|(_, generic)| (*generic).to_string())
        .unwrap_or(wanted);
    MEDICATIONS
        .iter()
        .find(|medication| medication.name.eq_ignore_ascii_case(&generic))
}

/// Drug names mentioned in `text`, brand names resolved to generics, in first-mention order.
pub fn medication_mentions(text: &str, mode: MatchMode) -> Vec<String> {
    let normalized = normalize_term(text);
    let candidates = MEDICATIONS
        .iter()
        .map(|medication| (medication.name.to_ascii_lowercase(), None))
        .chain(
            MEDICATION_ALIASES
                .iter()
                .map(|(alias, generic)| ((*alias).to_string(), Some(*generic))),
        )
        .chain(
            UNCATALOGUED_MEDICATIONS
                .iter()
                .map(|name| ((*name).to_string(), None)),
        );

    let mut mentions: Vec<(usize, String)> = Vec::new();
    for (term, generic) in candidates {
        let Some(position) = mode.find(&normalized, &term) else {
            continue;
        };
        let resolved = generic.map(ToString::to_string).unwrap_or(term);
        match mentions.iter_mut().find(|(_, name)| *name == resolved) {
            Some(existing) => existing.0 = existing.0.min(position),
            None => mentions.push((position, resolved)),
        }
    }

    mentions.sort_by_key(|(position, _)| *position);
    mentions.into_iter().map(|(_, name)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::{find_medication, medication_mentions};
    use crate::triage::MatchMode;

    #[test]
    fn acetaminophen_lists_side_effects_and_precautions() {
        let record = find_medication("Acetaminophen").expect("acetaminophen is catalogued");
        assert!(record.side_effects.contains(&"Liver damage (with overdose)"));
        assert!(record.precautions.contains(&"Avoid with alcohol"));
    }

    #[test]
    fn brand_names_resolve_to_generic_records() {
        assert_eq!(find_medication("Tylenol").map(|m| m.name), Some("Acetaminophen"));
        assert_eq!(find_medication("advil").map(|m| m.name), Some("Ibuprofen"));
        assert!(find_medication("unobtainium").is_none());
    }

    #[test]
    fn mentions_follow_text_order_and_collapse_aliases() {
        let mentions = medication_mentions(
            "Can I take Advil with tylenol, or is ibuprofen plus aspirin bad?",
            MatchMode::WordBoundary,
        );
        assert_eq!(mentions, vec!["ibuprofen", "acetaminophen", "aspirin"]);
    }
}

use serde::{Deserialize, Serialize};

use crate::knowledge::{
    BASIC_TESTS, DEFAULT_DISEASE_TREATMENTS, DISEASE_TREATMENTS, GENERAL_SELF_CARE_TIPS,
    GLUCOSE_TEST, LIFESTYLE_TREATMENTS, MINOR_TREATMENT, OLDER_ADULT_TREATMENT,
    SYMPTOM_SELF_CARE_TIPS, SYMPTOM_TESTS, SYMPTOM_TREATMENTS, TestRecord, TreatmentItem,
};
use crate::models::{PatientProfile, Priority, Urgency};

use super::{MatchResult, SymptomAnalysis};

const MAX_TESTS: usize = 6;
const MAX_TREATMENTS: usize = 8;
const MAX_SELF_CARE_TIPS: usize = 8;
const GLUCOSE_TEST_MIN_AGE: u32 = 40;
const OLDER_ADULT_MIN_AGE: u32 = 60;
const MINOR_MAX_AGE: u32 = 18;
const VISIBLE_SYMPTOMS: &[&str] = &["rash", "swelling"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedTest {
    pub name: String,
    pub purpose: String,
    pub priority: Priority,
}

impl From<&TestRecord> for SuggestedTest {
    fn from(record: &TestRecord) -> Self {
        Self {
            name: record.name.to_string(),
            purpose: record.purpose.to_string(),
            priority: record.priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentSuggestion {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl From<&TreatmentItem> for TreatmentSuggestion {
    fn from(item: &TreatmentItem) -> Self {
        Self {
            name: item.name.to_string(),
            description: item.description.to_string(),
            kind: item.kind.to_string(),
            priority: item.priority,
            duration: item.duration.map(ToString::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpAdvice {
    pub timeline: String,
    pub action: String,
    pub monitoring: String,
    pub preparation: String,
    pub message: String,
    pub specific_instructions: Vec<String>,
}

/// What a patient should log between visits, how, and when to look back over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomTracking {
    pub what_to_track: Vec<String>,
    pub tracking_methods: Vec<String>,
    pub when_to_review: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub tests: Vec<SuggestedTest>,
    pub treatments: Vec<TreatmentSuggestion>,
    pub self_care: Vec<String>,
    pub follow_up: FollowUpAdvice,
    pub symptom_tracking: SymptomTracking,
}

pub fn build_recommendations(
    analysis: &SymptomAnalysis,
    patient: &PatientProfile,
) -> Recommendations {
    Recommendations {
        tests: suggest_tests(&analysis.symptoms, patient.age),
        treatments: suggest_treatments(analysis.top_match(), &analysis.symptoms, patient.age),
        self_care: self_care_tips(&analysis.symptoms),
        follow_up: follow_up_advice(analysis.urgency, patient.display_name()),
        symptom_tracking: symptom_tracking(&analysis.symptoms),
    }
}

/// Basic tests, then symptom-triggered tests, then the age screen; deduplicated by name and
/// stably ordered high before medium before low.
pub fn suggest_tests(symptoms: &[String], age: Option<u32>) -> Vec<SuggestedTest> {
    let mut records: Vec<&TestRecord> = BASIC_TESTS.iter().collect();

    for (triggers, tests) in SYMPTOM_TESTS {
        if symptoms
            .iter()
            .any(|symptom| triggers.contains(&symptom.as_str()))
        {
            records.extend(tests.iter());
        }
    }

    if age.is_some_and(|age| age > GLUCOSE_TEST_MIN_AGE) {
        records.push(&GLUCOSE_TEST);
    }

    let mut tests: Vec<SuggestedTest> = Vec::with_capacity(records.len());
    for record in records {
        if !tests.iter().any(|existing| existing.name == record.name) {
            tests.push(record.into());
        }
    }

    tests.sort_by_key(|test| test.priority);
    tests.truncate(MAX_TESTS);
    tests
}

/// Disease items for the best match, per-symptom items, lifestyle items, then one
/// age-bracket item, truncated in that order.
pub fn suggest_treatments(
    top_match: Option<&MatchResult>,
    symptoms: &[String],
    age: Option<u32>,
) -> Vec<TreatmentSuggestion> {
    let mut treatments: Vec<TreatmentSuggestion> = Vec::new();

    if let Some(top_match) = top_match {
        let items = DISEASE_TREATMENTS
            .iter()
            .find(|(key, _)| *key == top_match.key)
            .map(|(_, items)| *items)
            .unwrap_or(DEFAULT_DISEASE_TREATMENTS);
        treatments.extend(items.iter().map(TreatmentSuggestion::from));
    }

    let mut symptom_items: Vec<TreatmentSuggestion> = Vec::new();
    for symptom in symptoms {
        let Some((_, item)) = SYMPTOM_TREATMENTS
            .iter()
            .find(|(trigger, _)| *trigger == symptom.as_str())
        else {
            continue;
        };
        if !symptom_items.iter().any(|existing| existing.name == item.name) {
            symptom_items.push(item.into());
        }
    }
    treatments.extend(symptom_items);

    treatments.extend(LIFESTYLE_TREATMENTS.iter().map(TreatmentSuggestion::from));

    match age {
        Some(age) if age > OLDER_ADULT_MIN_AGE => treatments.push((&OLDER_ADULT_TREATMENT).into()),
        Some(age) if age < MINOR_MAX_AGE => treatments.push((&MINOR_TREATMENT).into()),
        _ => {}
    }

    treatments.truncate(MAX_TREATMENTS);
    treatments
}

pub fn self_care_tips(symptoms: &[String]) -> Vec<String> {
    let symptom_tips = symptoms.iter().flat_map(|symptom| {
        SYMPTOM_SELF_CARE_TIPS
            .iter()
            .find(|(trigger, _)| *trigger == symptom.as_str())
            .map(|(_, tips)| *tips)
            .unwrap_or_default()
    });

    let mut tips: Vec<String> = Vec::new();
    for tip in GENERAL_SELF_CARE_TIPS.iter().chain(symptom_tips) {
        if tips.len() == MAX_SELF_CARE_TIPS {
            break;
        }
        if !tips.iter().any(|existing| existing == tip) {
            tips.push((*tip).to_string());
        }
    }
    tips
}

pub fn follow_up_advice(urgency: Urgency, patient_name: &str) -> FollowUpAdvice {
    let (timeline, action, monitoring, preparation, message) = match urgency {
        Urgency::High => (
            "IMMEDIATELY",
            "Go to Emergency Room or Call 911",
            "Continuous, do not leave alone",
            "Bring ID, insurance card, medication list",
            format!("{patient_name}, this requires urgent medical attention. Please don't delay."),
        ),
        Urgency::Medium => (
            "Within 24-48 hours",
            "Schedule appointment with Primary Care Physician",
            "Twice daily symptom check",
            "Note symptom changes, prepare questions for doctor",
            format!(
                "{patient_name}, it's important to follow up with your doctor soon to get proper evaluation."
            ),
        ),
        Urgency::Low => (
            "Within 1 week if symptoms persist",
            "Monitor and follow up if no improvement",
            "Daily symptom log",
            "Track symptom patterns and triggers",
            format!(
                "{patient_name}, most likely this will resolve on its own, but keep an eye on it."
            ),
        ),
    };

    FollowUpAdvice {
        timeline: timeline.to_string(),
        action: action.to_string(),
        monitoring: monitoring.to_string(),
        preparation: preparation.to_string(),
        message,
        specific_instructions: [
            "Keep a symptom diary with times and severity",
            "Note any triggers or relieving factors",
            "Track temperature if fever is present",
            "Record medication use and effects",
        ]
        .iter()
        .map(ToString::to_string)
        .collect(),
    }
}

/// General tracking advice. Temperature and photo methods are only listed when a fever or a
/// visible symptom was reported.
pub fn symptom_tracking(symptoms: &[String]) -> SymptomTracking {
    let has_any = |list: &[&str]| symptoms.iter().any(|symptom| list.contains(&symptom.as_str()));

    let mut tracking_methods = vec!["Use a notebook or smartphone app".to_string()];
    if has_any(VISIBLE_SYMPTOMS) {
        tracking_methods
            .push("Take photos of visible changes such as a rash or swelling".to_string());
    }
    if has_any(&["fever"]) {
        tracking_methods.push("Record your temperature morning and evening".to_string());
    }
    tracking_methods.push("Note emotional state alongside physical symptoms".to_string());

    SymptomTracking {
        what_to_track: [
            "Symptom severity (1-10 scale)",
            "Time of day when worst/best",
            "Activities before symptoms change",
            "Food and drink consumption",
            "Medication timing and effects",
            "Sleep quality and duration",
        ]
        .iter()
        .map(ToString::to_string)
        .collect(),
        tracking_methods,
        when_to_review: [
            "Daily for acute symptoms",
            "Weekly for chronic issues",
            "Before doctor appointments",
            "When trying new treatments",
        ]
        .iter()
        .map(ToString::to_string)
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        follow_up_advice, self_care_tips, suggest_tests, suggest_treatments, symptom_tracking,
    };
    use crate::models::{Priority, Severity, Urgency};
    use crate::triage::MatchResult;

    fn symptoms(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn top_match(key: &str, name: &str) -> MatchResult {
        MatchResult {
            disease: name.to_string(),
            key: key.to_string(),
            score: 0.5,
            severity: Severity::Moderate,
            urgency: Urgency::Medium,
        }
    }

    #[test]
    fn tests_are_deduplicated_prioritized_and_capped() {
        let tests = suggest_tests(&symptoms(&["fever", "cough", "nausea", "headache"]), Some(50));
        let names: Vec<&str> = tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Complete Blood Count (CBC)",
                "Inflammatory Markers (CRP, ESR)",
                "Chest X-ray",
                "Basic Metabolic Panel",
                "Neurological Examination",
                "Vital Signs Check",
            ]
        );
        assert!(tests.windows(2).all(|pair| pair[0].priority <= pair[1].priority));
    }

    #[test]
    fn glucose_screen_only_after_forty() {
        let at_forty = suggest_tests(&[], Some(40));
        let over_forty = suggest_tests(&[], Some(41));
        assert!(!at_forty.iter().any(|t| t.name == "Blood Glucose Test"));
        assert_eq!(over_forty.last().map(|t| t.name.as_str()), Some("Blood Glucose Test"));
        assert_eq!(over_forty.last().map(|t| t.priority), Some(Priority::Low));
    }

    #[test]
    fn treatments_follow_disease_symptom_lifestyle_age_order() {
        let treatments = suggest_treatments(
            Some(&top_match("influenza", "Influenza")),
            &symptoms(&["fever", "fever", "headache"]),
            Some(70),
        );
        let names: Vec<&str> = treatments.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Antiviral Medication",
                "Fever Management",
                "Isolation",
                "Fever Reducers",
                "Headache Relief",
                "Adequate Rest",
                "Proper Hydration",
                "Balanced Nutrition",
            ]
        );
    }

    #[test]
    fn unknown_disease_uses_default_items_and_minor_bracket() {
        let treatments = suggest_treatments(
            Some(&top_match("sinusitis", "Sinusitis")),
            &[],
            Some(12),
        );
        let names: Vec<&str> = treatments.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Symptom Management",
                "Medical Follow-up",
                "Adequate Rest",
                "Proper Hydration",
                "Balanced Nutrition",
                "Parental Monitoring",
            ]
        );
    }

    #[test]
    fn no_match_skips_disease_items() {
        let treatments = suggest_treatments(None, &symptoms(&["rash"]), None);
        assert_eq!(treatments.len(), 3);
        assert_eq!(treatments[0].name, "Adequate Rest");
    }

    #[test]
    fn self_care_tips_keep_general_tips_first() {
        let tips = self_care_tips(&symptoms(&["fever", "cough"]));
        assert_eq!(tips.len(), 8);
        assert_eq!(tips[0], "Stay hydrated with water and herbal teas");
        assert_eq!(tips[5], "Use lukewarm sponge baths to reduce fever");
        assert_eq!(tips[7], "Use a humidifier in your room");
    }

    #[test]
    fn follow_up_is_personalized_by_urgency() {
        let advice = follow_up_advice(Urgency::High, "Ana");
        assert_eq!(advice.timeline, "IMMEDIATELY");
        assert!(advice.message.starts_with("Ana,"));
        assert_eq!(advice.specific_instructions.len(), 4);
    }

    #[test]
    fn tracking_methods_depend_on_reported_symptoms() {
        let plain = symptom_tracking(&symptoms(&["cough"]));
        assert_eq!(plain.what_to_track.len(), 6);
        assert_eq!(plain.when_to_review.len(), 4);
        assert_eq!(plain.tracking_methods.len(), 2);
        assert!(!plain.tracking_methods.iter().any(|m| m.contains("temperature")));

        let feverish = symptom_tracking(&symptoms(&["fever", "rash"]));
        assert_eq!(feverish.tracking_methods.len(), 4);
        assert!(feverish.tracking_methods[1].starts_with("Take photos"));
        assert!(feverish.tracking_methods[2].contains("temperature"));
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::knowledge::{
    DISEASE_TREATMENT_PLANS, DiseaseTreatmentPlan, MedicationRecord, PlannedMedication,
    find_medication, find_treatment_plan, normalize_term,
};
use crate::models::{PatientProfile, Severity};

const MAX_RECOMMENDED_TESTS: usize = 5;
const SEARCH_TREATMENT_LIMIT: usize = 3;
const SEARCH_MEDICATION_LIMIT: usize = 2;
const PEDIATRIC_MAX_AGE: u32 = 12;
const SENIOR_MIN_AGE: u32 = 65;
const SAMPLE_PRESCRIPTION_DISCLAIMER: &str = "SAMPLE PRESCRIPTION ONLY. Actual medications must be \
    prescribed by a licensed healthcare provider after proper evaluation.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MedicationLookupError {
    #[error("medication not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationInfo {
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub drug_class: String,
    pub otc: bool,
    pub requires_prescription: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily: Option<String>,
    pub side_effects: Vec<String>,
    pub precautions: Vec<String>,
}

impl From<&MedicationRecord> for MedicationInfo {
    fn from(record: &MedicationRecord) -> Self {
        Self {
            name: record.name.to_string(),
            category: record.category.to_string(),
            drug_class: record.drug_class.to_string(),
            otc: record.otc,
            requires_prescription: !record.otc,
            max_daily: record.max_daily.map(ToString::to_string),
            side_effects: to_strings(record.side_effects),
            precautions: to_strings(record.precautions),
        }
    }
}

/// Generic or brand name, case-insensitive.
pub fn medication_info(name: &str) -> Result<MedicationInfo, MedicationLookupError> {
    find_medication(name)
        .map(MedicationInfo::from)
        .ok_or_else(|| MedicationLookupError::NotFound(name.trim().to_string()))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosisInput {
    #[serde(default)]
    pub primary_diagnosis: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMedication {
    pub name: String,
    pub purpose: String,
    pub dosage: String,
}

impl From<&PlannedMedication> for PlanMedication {
    fn from(medication: &PlannedMedication) -> Self {
        Self {
            name: medication.name.to_string(),
            purpose: medication.purpose.to_string(),
            dosage: medication.dosage.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescribedMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub max_daily: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePrescription {
    pub patient: String,
    pub date: NaiveDate,
    pub medications: Vec<PrescribedMedication>,
    pub instructions: String,
    pub provider: String,
    pub disclaimer: String,
    pub follow_up: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub name: String,
    pub treatments: Vec<String>,
    pub medications: Vec<PlanMedication>,
    pub duration: String,
    pub follow_up: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patient_adjustments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_tests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_prescription: Option<SamplePrescription>,
    pub patient_name: String,
    pub consultation_date: NaiveDate,
}

/// Catalogued plan when the diagnosis names one, otherwise symptom management, adjusted for the
/// patient. `provider` is the assistant name printed on the sample prescription.
pub fn treatment_plan(
    diagnosis: &DiagnosisInput,
    patient: &PatientProfile,
    provider: &str,
    today: NaiveDate,
) -> TreatmentPlan {
    let symptoms: Vec<String> = diagnosis
        .symptoms
        .iter()
        .map(|symptom| normalize_term(symptom))
        .filter(|symptom| !symptom.is_empty())
        .collect();

    let catalogued = diagnosis
        .primary_diagnosis
        .as_deref()
        .and_then(find_treatment_plan);
    let mut plan = match catalogued {
        Some(entry) => catalogued_plan(entry, patient, today),
        None => general_plan(&symptoms, patient, today),
    };

    plan.patient_adjustments = patient_adjustments(&plan, patient);

    if matches!(
        diagnosis.severity,
        Some(Severity::Moderate | Severity::Severe)
    ) {
        plan.recommended_tests = recommended_tests(&symptoms);
    }

    if !symptoms.is_empty() {
        plan.sample_prescription = Some(sample_prescription(&symptoms, patient, provider, today));
    }

    plan
}

fn catalogued_plan(
    entry: &DiseaseTreatmentPlan,
    patient: &PatientProfile,
    today: NaiveDate,
) -> TreatmentPlan {
    TreatmentPlan {
        name: entry.name.to_string(),
        treatments: to_strings(entry.treatments),
        medications: entry.medications.iter().map(PlanMedication::from).collect(),
        duration: entry.duration.to_string(),
        follow_up: entry.follow_up.to_string(),
        patient_adjustments: Vec::new(),
        recommended_tests: Vec::new(),
        sample_prescription: None,
        patient_name: patient.display_name().to_string(),
        consultation_date: today,
    }
}

fn general_plan(symptoms: &[String], patient: &PatientProfile, today: NaiveDate) -> TreatmentPlan {
    let mut medications = Vec::new();
    if has_any(symptoms, &["fever", "pain"]) {
        medications.push(PlanMedication {
            name: "Acetaminophen".to_string(),
            purpose: "Fever and pain relief".to_string(),
            dosage: "500mg every 6 hours as needed".to_string(),
        });
    }
    if has_any(symptoms, &["cough", "congestion"]) {
        medications.push(PlanMedication {
            name: "Dextromethorphan".to_string(),
            purpose: "Cough suppression".to_string(),
            dosage: "30mg every 6-8 hours".to_string(),
        });
    }

    TreatmentPlan {
        name: "General Symptom Management".to_string(),
        treatments: to_strings(&[
            "Rest and adequate hydration",
            "Symptom-specific over-the-counter medications",
            "Monitor for worsening symptoms",
            "Maintain comfortable environment",
        ]),
        medications,
        duration: "Until symptoms improve".to_string(),
        follow_up: "If no improvement in 48 hours".to_string(),
        patient_adjustments: Vec::new(),
        recommended_tests: Vec::new(),
        sample_prescription: None,
        patient_name: patient.display_name().to_string(),
        consultation_date: today,
    }
}

fn patient_adjustments(plan: &TreatmentPlan, patient: &PatientProfile) -> Vec<String> {
    let mut adjustments: Vec<&str> = Vec::new();

    match patient.age {
        Some(age) if age < PEDIATRIC_MAX_AGE => {
            adjustments.push("Pediatric dosing required");
            if plan_mentions(plan, "ibuprofen") {
                adjustments.push("Avoid ibuprofen in children under 6 months");
            }
        }
        Some(age) if age > SENIOR_MIN_AGE => {
            adjustments.push("Consider reduced dosing for age");
            adjustments.push("Monitor for drug interactions");
        }
        _ => {}
    }

    if patient.history_mentions("liver") {
        adjustments.push("Use acetaminophen with caution");
    }
    if patient.history_mentions("kidney") {
        adjustments.push("Avoid NSAIDs if possible");
    }
    if patient.history_mentions("pregnant") || patient.history_mentions("pregnancy") {
        adjustments.push("Consult OB/GYN before any medication");
        adjustments.push("Avoid certain medications during pregnancy");
    }

    to_strings(&adjustments)
}

fn plan_mentions(plan: &TreatmentPlan, needle: &str) -> bool {
    plan.medications
        .iter()
        .any(|medication| medication.name.to_lowercase().contains(needle))
        || plan
            .treatments
            .iter()
            .any(|treatment| treatment.to_lowercase().contains(needle))
}

fn recommended_tests(symptoms: &[String]) -> Vec<String> {
    const RULES: &[(&[&str], &[&str])] = &[
        (
            &["fever", "fatigue", "infection"],
            &["Complete Blood Count (CBC)", "C-reactive Protein (CRP)"],
        ),
        (
            &["abdominal pain", "nausea", "vomiting"],
            &["Basic Metabolic Panel (BMP)", "Liver Function Tests"],
        ),
        (
            &["chest pain", "shortness of breath", "palpitations"],
            &["Electrocardiogram (ECG)", "Chest X-ray"],
        ),
        (
            &["headache", "dizziness", "neurological"],
            &["Neurological examination"],
        ),
    ];

    let mut tests: Vec<String> = RULES
        .iter()
        .filter(|(triggers, _)| has_any(symptoms, triggers))
        .flat_map(|(_, tests)| tests.iter().map(ToString::to_string))
        .collect();
    tests.truncate(MAX_RECOMMENDED_TESTS);
    tests
}

fn sample_prescription(
    symptoms: &[String],
    patient: &PatientProfile,
    provider: &str,
    today: NaiveDate,
) -> SamplePrescription {
    let mut medications = Vec::new();
    if has_any(symptoms, &["fever", "pain", "headache"]) {
        medications.push(prescribed(
            "Acetaminophen",
            "500mg",
            "Every 6 hours as needed for pain/fever",
            "3-5 days",
            "4000mg",
            "Take with food, avoid alcohol",
        ));
    }
    if has_any(symptoms, &["cough", "congestion"]) {
        medications.push(prescribed(
            "Dextromethorphan",
            "30mg",
            "Every 6-8 hours",
            "7 days",
            "120mg",
            "Do not use with MAO inhibitors",
        ));
    }
    if has_any(symptoms, &["allergy", "itch", "rash"]) {
        medications.push(prescribed(
            "Cetirizine",
            "10mg",
            "Once daily",
            "As needed",
            "10mg",
            "May cause drowsiness, avoid driving",
        ));
    }

    SamplePrescription {
        patient: patient.display_name().to_string(),
        date: today,
        medications,
        instructions: "Take as directed with food. Discontinue if adverse reactions occur."
            .to_string(),
        provider: format!("{provider} (AI Medical Assistant)"),
        disclaimer: SAMPLE_PRESCRIPTION_DISCLAIMER.to_string(),
        follow_up: "Schedule follow-up appointment in 1-2 weeks if symptoms persist.".to_string(),
    }
}

fn prescribed(
    name: &str,
    dosage: &str,
    frequency: &str,
    duration: &str,
    max_daily: &str,
    notes: &str,
) -> PrescribedMedication {
    PrescribedMedication {
        name: name.to_string(),
        dosage: dosage.to_string(),
        frequency: frequency.to_string(),
        duration: duration.to_string(),
        max_daily: max_daily.to_string(),
        notes: notes.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentSearchHit {
    pub disease: String,
    pub name: String,
    pub treatments: Vec<String>,
    pub medications: Vec<PlanMedication>,
}

/// Plans whose key, name, or any treatment line contains `keyword`. Blank keywords match nothing.
pub fn search_treatments(keyword: &str) -> Vec<TreatmentSearchHit> {
    let wanted = normalize_term(keyword);
    if wanted.is_empty() {
        return Vec::new();
    }

    DISEASE_TREATMENT_PLANS
        .iter()
        .filter(|plan| {
            normalize_term(plan.key).contains(&wanted)
                || normalize_term(plan.name).contains(&wanted)
                || plan
                    .treatments
                    .iter()
                    .any(|treatment| normalize_term(treatment).contains(&wanted))
        })
        .map(|plan| TreatmentSearchHit {
            disease: plan.key.to_string(),
            name: plan.name.to_string(),
            treatments: plan
                .treatments
                .iter()
                .take(SEARCH_TREATMENT_LIMIT)
                .map(ToString::to_string)
                .collect(),
            medications: plan
                .medications
                .iter()
                .take(SEARCH_MEDICATION_LIMIT)
                .map(PlanMedication::from)
                .collect(),
        })
        .collect()
}

fn has_any(symptoms: &[String], triggers: &[&str]) -> bool {
    symptoms
        .iter()
        .any(|symptom| triggers.contains(&symptom.as_str()))
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

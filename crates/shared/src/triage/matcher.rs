use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::knowledge::{
    DISEASES, DiseaseRecord, EMERGENCY_SYMPTOMS, MODERATE_SYMPTOMS, SYMPTOM_CATEGORIES,
    SYMPTOM_SYNONYMS, SYMPTOM_TERMS, normalize_term,
};
use crate::models::{Severity, Urgency};

const MAX_SURFACED_MATCHES: usize = 5;
const MAX_SUGGESTIONS_PER_SYMPTOM: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub disease: String,
    pub key: String,
    pub score: f64,
    pub severity: Severity,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomAnalysis {
    pub symptoms: Vec<String>,
    pub categories: BTreeMap<String, Vec<String>>,
    pub matches: Vec<MatchResult>,
    pub urgency: Urgency,
    pub severity: Severity,
    pub recommended_actions: Vec<String>,
}

impl SymptomAnalysis {
    pub fn top_match(&self) -> Option<&MatchResult> {
        self.matches.first()
    }
}

/// `|user ∩ disease| / |disease|`, always within `[0, 1]`. Both sides are
/// compared in normalized form.
pub fn overlap_score(user_symptoms: &[String], disease_symptoms: &[&str]) -> f64 {
    if user_symptoms.is_empty() || disease_symptoms.is_empty() {
        return 0.0;
    }
    let user: Vec<String> = user_symptoms
        .iter()
        .map(|symptom| normalize_term(symptom))
        .collect();
    let matched = disease_symptoms
        .iter()
        .filter(|symptom| user.contains(&normalize_term(symptom)))
        .count();
    matched as f64 / disease_symptoms.len() as f64
}

#[derive(Debug, Clone, Copy)]
pub struct SymptomMatcher {
    threshold: f64,
}

impl SymptomMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Every disease whose overlap strictly exceeds the threshold, best first.
    /// Equal scores keep disease table order.
    pub fn rank(&self, symptoms: &[String]) -> Vec<MatchResult> {
        let normalized = normalize_all(symptoms);
        let mut scored: Vec<(f64, &DiseaseRecord)> = DISEASES
            .iter()
            .map(|disease| (overlap_score(&normalized, disease.symptoms), disease))
            .filter(|(score, _)| *score > self.threshold)
            .collect();

        scored.sort_by(|left, right| right.0.total_cmp(&left.0));

        scored
            .into_iter()
            .map(|(score, disease)| MatchResult {
                disease: disease.name.to_string(),
                key: disease.key.to_string(),
                score: round_to_hundredths(score),
                severity: disease.severity,
                urgency: disease.urgency,
            })
            .collect()
    }

    /// Age is accepted for parity with the patient profile but does not change the result.
    pub fn analyze(&self, symptoms: &[String], _age: Option<u32>) -> SymptomAnalysis {
        let normalized = normalize_all(symptoms);
        let mut matches = self.rank(&normalized);
        matches.truncate(MAX_SURFACED_MATCHES);

        let urgency = classify_urgency(&normalized, &matches);
        SymptomAnalysis {
            categories: categorize_symptoms(&normalized),
            severity: severity_from_count(normalized.len()),
            recommended_actions: recommended_actions(urgency)
                .iter()
                .map(ToString::to_string)
                .collect(),
            symptoms: normalized,
            matches,
            urgency,
        }
    }
}

fn classify_urgency(symptoms: &[String], matches: &[MatchResult]) -> Urgency {
    let has_any = |list: &[&str]| symptoms.iter().any(|symptom| list.contains(&symptom.as_str()));

    if has_any(EMERGENCY_SYMPTOMS) || matches.iter().any(|m| m.urgency == Urgency::High) {
        Urgency::High
    } else if has_any(MODERATE_SYMPTOMS) {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}

fn severity_from_count(count: usize) -> Severity {
    match count {
        5.. => Severity::Severe,
        3.. => Severity::Moderate,
        _ => Severity::Mild,
    }
}

fn recommended_actions(urgency: Urgency) -> &'static [&'static str] {
    match urgency {
        Urgency::High => &[
            "Seek emergency medical attention immediately",
            "Call emergency services or go to nearest ER",
            "Do not delay treatment",
        ],
        Urgency::Medium => &[
            "Schedule appointment with healthcare provider within 24-48 hours",
            "Monitor symptoms closely",
            "Rest and stay hydrated",
        ],
        Urgency::Low => &[
            "Self-care and monitoring",
            "Consider over-the-counter remedies if appropriate",
            "Consult doctor if symptoms persist beyond 48 hours",
        ],
    }
}

/// Groups symptoms by body system. Symptoms outside every group are omitted.
pub fn categorize_symptoms(symptoms: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for symptom in symptoms {
        for (category, members) in SYMPTOM_CATEGORIES {
            if members.contains(&symptom.as_str()) {
                categories
                    .entry((*category).to_string())
                    .or_default()
                    .push(symptom.clone());
            }
        }
    }
    categories
}

/// Scores a free-text description of one symptom on a 1-10 scale.
pub fn severity_score_from_description(description: &str) -> u8 {
    const LEVELS: &[(&[&str], u8)] = &[
        (&["slight", "minor", "tolerable", "manageable"], 3),
        (&["uncomfortable", "bothersome", "interferes"], 6),
        (
            &["unbearable", "excruciating", "debilitating", "worst ever"],
            9,
        ),
    ];

    let text = description.to_lowercase();
    LEVELS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(_, score)| *score)
        .unwrap_or(5)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomValidation {
    pub valid_symptoms: Vec<String>,
    pub unrecognized_symptoms: Vec<String>,
    pub suggestions: BTreeMap<String, Vec<String>>,
}

pub fn validate_symptoms(symptoms: &[String]) -> SymptomValidation {
    let known = known_symptoms();
    let mut validation = SymptomValidation::default();

    for raw in symptoms {
        let symptom = normalize_term(raw);
        if symptom.is_empty() {
            continue;
        }
        if known.contains(&symptom.as_str()) {
            validation.valid_symptoms.push(symptom);
            continue;
        }

        let similar: Vec<String> = known
            .iter()
            .filter(|candidate| {
                candidate.contains(symptom.as_str()) || symptom.contains(**candidate)
            })
            .take(MAX_SUGGESTIONS_PER_SYMPTOM)
            .map(|candidate| (*candidate).to_string())
            .collect();
        if !similar.is_empty() {
            validation.suggestions.insert(raw.clone(), similar);
        }
        validation.unrecognized_symptoms.push(raw.clone());
    }

    validation
}

fn known_symptoms() -> Vec<&'static str> {
    let mut known: Vec<&'static str> = SYMPTOM_TERMS.to_vec();
    let extra = SYMPTOM_SYNONYMS
        .iter()
        .map(|(canonical, _)| *canonical)
        .chain(
            SYMPTOM_CATEGORIES
                .iter()
                .flat_map(|(_, members)| members.iter().copied()),
        );
    for symptom in extra {
        if !known.contains(&symptom) {
            known.push(symptom);
        }
    }
    known
}

fn normalize_all(symptoms: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(symptoms.len());
    for symptom in symptoms {
        let term = normalize_term(symptom);
        if !term.is_empty() && !normalized.contains(&term) {
            normalized.push(term);
        }
    }
    normalized
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

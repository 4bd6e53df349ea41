use serde::{Deserialize, Serialize};

use crate::triage::MatchMode;

pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "emergency",
    "911",
    "heart attack",
    "stroke",
    "bleeding",
    "unconscious",
    "can't breathe",
];
const TREATMENT_KEYWORDS: &[&str] = &[
    "treatment",
    "medicine",
    "medication",
    "prescription",
    "drug",
];
const REPORT_KEYWORDS: &[&str] = &["report", "summary", "record", "download", "document"];
const THANKS_KEYWORDS: &[&str] = &["thank", "thanks", "thank you", "appreciate", "grateful"];
const GREETING_KEYWORDS: &[&str] = &["hi", "hello", "hey", "greetings", "morning", "afternoon"];
const HOW_ARE_YOU_KEYWORDS: &[&str] = &["how are you", "how do you do"];
const GOODBYE_KEYWORDS: &[&str] = &["bye", "goodbye", "see you", "farewell"];
const PAIN_KEYWORDS: &[&str] = &["pain", "hurt", "hurts", "ache", "aches", "uncomfortable"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    Emergency,
    Symptoms,
    Treatment,
    Report,
    Thanks,
    Greeting,
    HowAreYou,
    Goodbye,
    Pain,
    General,
}

/// What the rules see: the normalized message and the symptoms named in it.
#[derive(Debug, Clone, Copy)]
pub struct RouteInput<'a> {
    pub text: &'a str,
    pub symptoms: &'a [String],
    pub mode: MatchMode,
}

impl RouteInput<'_> {
    fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords
            .iter()
            .any(|keyword| self.mode.contains(self.text, keyword))
    }
}

pub type RulePredicate = fn(&RouteInput<'_>) -> bool;

/// Checked top to bottom; the first matching rule decides. `General` is the fallback when
/// nothing matches.
pub const ROUTE_RULES: &[(RouteCategory, RulePredicate)] = &[
    (RouteCategory::Emergency, |input| input.mentions_any(EMERGENCY_KEYWORDS)),
    (RouteCategory::Symptoms, |input| !input.symptoms.is_empty()),
    (RouteCategory::Treatment, |input| input.mentions_any(TREATMENT_KEYWORDS)),
    (RouteCategory::Report, |input| input.mentions_any(REPORT_KEYWORDS)),
    (RouteCategory::Thanks, |input| input.mentions_any(THANKS_KEYWORDS)),
    (RouteCategory::Greeting, |input| input.mentions_any(GREETING_KEYWORDS)),
    (RouteCategory::HowAreYou, |input| input.mentions_any(HOW_ARE_YOU_KEYWORDS)),
    (RouteCategory::Goodbye, |input| input.mentions_any(GOODBYE_KEYWORDS)),
    (RouteCategory::Pain, |input| input.mentions_any(PAIN_KEYWORDS)),
];

pub fn route(input: &RouteInput<'_>) -> RouteCategory {
    ROUTE_RULES
        .iter()
        .find(|(_, matches)| matches(input))
        .map(|(category, _)| *category)
        .unwrap_or(RouteCategory::General)
}

#[cfg(test)]
mod tests {
    use super::{RouteCategory, RouteInput, route};
    use crate::knowledge::normalize_term;
    use crate::triage::{MatchMode, SymptomExtractor};

    fn route_message(message: &str, mode: MatchMode) -> RouteCategory {
        let text = normalize_term(message);
        let symptoms = SymptomExtractor::new(mode).extract_from_message(message);
        route(&RouteInput {
            text: &text,
            symptoms: &symptoms,
            mode,
        })
    }

    fn routed(message: &str) -> RouteCategory {
        route_message(message, MatchMode::WordBoundary)
    }

    #[test]
    fn emergency_dominates_symptom_words() {
        assert_eq!(
            routed("I have chest pain and a fever, is this a heart attack?"),
            RouteCategory::Emergency
        );
        assert_eq!(routed("call 911"), RouteCategory::Emergency);
        assert_eq!(routed("I can’t breathe"), RouteCategory::Emergency);
    }

    #[test]
    fn symptoms_beat_treatment_and_social_rules() {
        assert_eq!(
            routed("Hello, what medicine helps a cough?"),
            RouteCategory::Symptoms
        );
        assert_eq!(
            routed("What medication should I take?"),
            RouteCategory::Treatment
        );
        assert_eq!(
            routed("Please download my report, thanks"),
            RouteCategory::Report
        );
    }

    #[test]
    fn social_rules_follow_priority_order() {
        assert_eq!(routed("Thanks so much!"), RouteCategory::Thanks);
        assert_eq!(routed("hello doctor"), RouteCategory::Greeting);
        assert_eq!(routed("How are you today?"), RouteCategory::HowAreYou);
        assert_eq!(routed("ok bye"), RouteCategory::Goodbye);
        assert_eq!(routed("my knee hurts"), RouteCategory::Pain);
        assert_eq!(routed("Is coffee good for you?"), RouteCategory::General);
    }

    #[test]
    fn substring_mode_keeps_loose_matching() {
        assert_eq!(routed("this is odd"), RouteCategory::General);
        assert_eq!(
            route_message("this is odd", MatchMode::Substring),
            RouteCategory::Greeting
        );
    }
}

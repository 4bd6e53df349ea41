//! Symptom extraction, disease matching, and recommendation building.

mod extractor;
mod matcher;
mod recommendations;

pub use extractor::{MAX_EXTRACTED_SYMPTOMS, SymptomExtractor};
pub use matcher::{
    MatchResult, SymptomAnalysis, SymptomMatcher, SymptomValidation, categorize_symptoms,
    overlap_score, severity_score_from_description, validate_symptoms,
};
pub use recommendations::{
    FollowUpAdvice, Recommendations, SuggestedTest, SymptomTracking, TreatmentSuggestion,
    build_recommendations, follow_up_advice, self_care_tips, suggest_tests, suggest_treatments,
    symptom_tracking,
};

use serde::{Deserialize, Serialize};

/// How a vocabulary phrase has to appear in free text to count as a mention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Phrase must be bounded by non-alphanumeric characters or the ends of the text.
    #[default]
    WordBoundary,
    /// Plain containment; "hot" matches inside "shot".
    Substring,
}

impl MatchMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "word" | "word_boundary" => Some(Self::WordBoundary),
            "substring" => Some(Self::Substring),
            _ => None,
        }
    }

    pub fn contains(self, haystack: &str, phrase: &str) -> bool {
        self.find(haystack, phrase).is_some()
    }

    /// Byte offset of the first qualifying occurrence. Both inputs are expected lowercased.
    pub fn find(self, haystack: &str, phrase: &str) -> Option<usize> {
        if phrase.is_empty() {
            return None;
        }
        match self {
            Self::Substring => haystack.find(phrase),
            Self::WordBoundary => haystack.match_indices(phrase).find_map(|(start, _)| {
                let end = start + phrase.len();
                let before_ok = haystack[..start]
                    .chars()
                    .next_back()
                    .is_none_or(|ch| !ch.is_alphanumeric());
                let after_ok = haystack[end..]
                    .chars()
                    .next()
                    .is_none_or(|ch| !ch.is_alphanumeric());
                (before_ok && after_ok).then_some(start)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MatchMode;

    #[test]
    fn word_boundary_rejects_embedded_fragments() {
        assert!(!MatchMode::WordBoundary.contains("i got a flu shot", "hot"));
        assert!(MatchMode::Substring.contains("i got a flu shot", "hot"));
        assert!(MatchMode::WordBoundary.contains("i feel hot, really hot", "hot"));
    }

    #[test]
    fn word_boundary_skips_to_later_valid_occurrence() {
        assert_eq!(MatchMode::WordBoundary.find("shot then hot", "hot"), Some(10));
    }

    #[test]
    fn phrases_with_spaces_and_punctuation_match() {
        assert!(MatchMode::WordBoundary.contains("i can't breathe!", "can't breathe"));
        assert!(MatchMode::WordBoundary.contains("call 911 now", "911"));
        assert!(!MatchMode::WordBoundary.contains("call 9110", "911"));
    }

    #[test]
    fn parses_configuration_values() {
        assert_eq!(MatchMode::parse("WORD"), Some(MatchMode::WordBoundary));
        assert_eq!(MatchMode::parse("substring"), Some(MatchMode::Substring));
        assert_eq!(MatchMode::parse("fuzzy"), None);
    }
}

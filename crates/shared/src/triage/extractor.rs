use crate::knowledge::{SYMPTOM_SYNONYMS, SYMPTOM_TERMS, normalize_term};
use crate::models::{ConversationTurn, Role};

use super::MatchMode;

pub const MAX_EXTRACTED_SYMPTOMS: usize = 15;
const HISTORY_SCAN_TURNS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct SymptomExtractor {
    mode: MatchMode,
}

impl SymptomExtractor {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Canonical symptoms named directly or through a synonym in `message`.
    pub fn extract_from_message(&self, message: &str) -> Vec<String> {
        let text = normalize_term(message);
        let mut found = Vec::new();

        for term in SYMPTOM_TERMS {
            if self.mode.contains(&text, term) {
                push_unique(&mut found, term);
            }
        }

        for (canonical, synonyms) in SYMPTOM_SYNONYMS {
            if synonyms
                .iter()
                .any(|synonym| self.mode.contains(&text, synonym))
            {
                push_unique(&mut found, canonical);
            }
        }

        found.truncate(MAX_EXTRACTED_SYMPTOMS);
        found
    }

    /// Message symptoms followed by vocabulary terms from the last few user turns.
    pub fn extract(&self, message: &str, history: &[ConversationTurn]) -> Vec<String> {
        let mut found = self.extract_from_message(message);

        let window_start = history.len().saturating_sub(HISTORY_SCAN_TURNS);
        for turn in history[window_start..]
            .iter()
            .filter(|turn| turn.role == Role::User)
        {
            let text = normalize_term(&turn.message);
            for term in SYMPTOM_TERMS {
                if self.mode.contains(&text, term) {
                    push_unique(&mut found, term);
                }
            }
        }

        found.truncate(MAX_EXTRACTED_SYMPTOMS);
        found
    }
}

fn push_unique(found: &mut Vec<String>, symptom: &str) {
    if !found.iter().any(|existing| existing == symptom) {
        found.push(symptom.to_string());
    }
}

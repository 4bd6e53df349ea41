use crate::knowledge::normalize_term;
use crate::triage::MatchMode;

const PAIN_LOCATIONS: &[&str] = &[
    "head", "neck", "back", "chest", "stomach", "abdomen", "arm", "leg", "joint", "muscle",
    "throat", "ear", "eye", "tooth", "pelvic",
];
const PAIN_TYPES: &[&str] = &[
    "sharp", "dull", "throbbing", "burning", "aching", "stabbing", "cramping",
];
const SEVERITY_MARKERS: &[&str] = &["pain level", "scale"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PainDetails {
    pub locations: Vec<String>,
    pub pain_types: Vec<String>,
    /// 1-10 when the message states one (`7/10`, `pain level 7`, `on a scale of 1-10 it's 7`).
    pub severity_score: Option<u8>,
}

pub fn extract_pain_details(message: &str, mode: MatchMode) -> PainDetails {
    let text = normalize_term(message);
    PainDetails {
        locations: mentioned(&text, PAIN_LOCATIONS, mode),
        pain_types: mentioned(&text, PAIN_TYPES, mode),
        severity_score: severity_score(&text),
    }
}

fn mentioned(text: &str, candidates: &[&str], mode: MatchMode) -> Vec<String> {
    candidates
        .iter()
        .filter(|candidate| mode.contains(text, candidate))
        .map(ToString::to_string)
        .collect()
}

/// Earliest of: a number directly before `/10`, or the first number after a severity marker.
/// For scales written as `1-10` the stated value is the number after the range.
fn severity_score(text: &str) -> Option<u8> {
    let mut candidates: Vec<(usize, u32)> = Vec::new();

    for (slash, _) in text.match_indices("/10") {
        let digits_start = text[..slash]
            .char_indices()
            .rev()
            .take_while(|(_, ch)| ch.is_ascii_digit())
            .last()
            .map(|(index, _)| index);
        if let Some(start) = digits_start
            && let Ok(value) = text[start..slash].parse::<u32>()
        {
            candidates.push((start, value));
        }
    }

    for marker in SEVERITY_MARKERS {
        for (start, _) in text.match_indices(marker) {
            let rest = &text[start + marker.len()..];
            if let Some(value) = number_after_range(rest) {
                candidates.push((start, value));
            }
        }
    }

    candidates
        .into_iter()
        .min_by_key(|(position, _)| *position)
        .and_then(|(_, value)| u8::try_from(value).ok())
        .filter(|value| (1..=10).contains(value))
}

/// First number in `rest`, skipping a leading `1-10` / `1 to 10` range description.
fn number_after_range(rest: &str) -> Option<u32> {
    let numbers = numbers_in(rest);
    let first = numbers.first()?;
    let skip_range = numbers.len() > 2 && first.0 == 1 && numbers[1].0 == 10;
    let chosen = if skip_range { numbers[2].0 } else { first.0 };
    Some(chosen)
}

fn numbers_in(text: &str) -> Vec<(u32, usize)> {
    let mut numbers = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for (index, ch) in text.char_indices() {
        match (ch.is_ascii_digit(), current) {
            (true, None) => current = Some((index, index + ch.len_utf8())),
            (true, Some((start, _))) => current = Some((start, index + ch.len_utf8())),
            (false, Some((start, end))) => {
                if let Ok(value) = text[start..end].parse::<u32>() {
                    numbers.push((value, start));
                }
                current = None;
            }
            (false, None) => {}
        }
    }
    if let Some((start, end)) = current
        && let Ok(value) = text[start..end].parse::<u32>()
    {
        numbers.push((value, start));
    }
    numbers
}

#[cfg(test)]
mod tests {
    use super::extract_pain_details;
    use crate::triage::MatchMode;

    #[test]
    fn extracts_locations_types_and_fraction_score() {
        let details = extract_pain_details(
            "Sharp, throbbing pain in my lower back, about 7/10",
            MatchMode::WordBoundary,
        );
        assert_eq!(details.locations, vec!["back"]);
        assert_eq!(details.pain_types, vec!["sharp", "throbbing"]);
        assert_eq!(details.severity_score, Some(7));
    }

    #[test]
    fn reads_pain_level_and_scale_phrasing() {
        assert_eq!(
            extract_pain_details("pain level is 4 today", MatchMode::WordBoundary).severity_score,
            Some(4)
        );
        assert_eq!(
            extract_pain_details("on a scale of 1-10 it's an 8", MatchMode::WordBoundary)
                .severity_score,
            Some(8)
        );
        assert_eq!(
            extract_pain_details("it hurts a lot", MatchMode::WordBoundary).severity_score,
            None
        );
    }

    #[test]
    fn out_of_range_scores_are_ignored() {
        assert_eq!(
            extract_pain_details("easily 15/10", MatchMode::WordBoundary).severity_score,
            None
        );
    }
}

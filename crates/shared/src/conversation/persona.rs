use serde::{Deserialize, Serialize};

/// Voice the assistant speaks in. Chosen once per process from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaKind {
    #[default]
    Smith,
    Johnson,
    Patel,
}

impl PersonaKind {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        let normalized = normalized
            .strip_prefix("dr.")
            .or_else(|| normalized.strip_prefix("dr "))
            .unwrap_or(&normalized)
            .trim();
        match normalized {
            "smith" => Some(Self::Smith),
            "johnson" => Some(Self::Johnson),
            "patel" => Some(Self::Patel),
            _ => None,
        }
    }

    pub fn persona(self) -> Persona {
        match self {
            Self::Smith => Persona {
                kind: self,
                name: "Dr. Smith",
                style: "warm",
                emoji: "👨‍⚕️",
                greeting: "Hello there",
            },
            Self::Johnson => Persona {
                kind: self,
                name: "Dr. Johnson",
                style: "professional",
                emoji: "👩‍⚕️",
                greeting: "Good day",
            },
            Self::Patel => Persona {
                kind: self,
                name: "Dr. Patel",
                style: "friendly",
                emoji: "🩺",
                greeting: "Hi there",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub kind: PersonaKind,
    pub name: &'static str,
    pub style: &'static str,
    pub emoji: &'static str,
    pub greeting: &'static str,
}

impl Default for Persona {
    fn default() -> Self {
        PersonaKind::default().persona()
    }
}

#[cfg(test)]
mod tests {
    use super::PersonaKind;

    #[test]
    fn parses_names_with_or_without_title() {
        assert_eq!(PersonaKind::parse("Patel"), Some(PersonaKind::Patel));
        assert_eq!(PersonaKind::parse(" Dr. Johnson "), Some(PersonaKind::Johnson));
        assert_eq!(PersonaKind::parse("dr smith"), Some(PersonaKind::Smith));
        assert_eq!(PersonaKind::parse("house"), None);
    }
}

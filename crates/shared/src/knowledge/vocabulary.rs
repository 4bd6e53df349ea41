pub const SYMPTOM_TERMS: &[&str] = &[
    "fever",
    "cough",
    "headache",
    "fatigue",
    "nausea",
    "vomiting",
    "diarrhea",
    "constipation",
    "chest pain",
    "shortness of breath",
    "dizziness",
    "back pain",
    "joint pain",
    "rash",
    "sore throat",
    "runny nose",
    "sneezing",
    "abdominal pain",
    "loss of appetite",
    "weight loss",
    "insomnia",
    "anxiety",
    "depression",
    "palpitations",
    "chills",
    "sweating",
    "muscle pain",
    "blurred vision",
    "ear pain",
    "congestion",
    "wheezing",
    "heartburn",
    "indigestion",
    "bloating",
    "burning sensation",
    "frequent urination",
    "swelling",
];

/// Canonical symptom followed by phrases users commonly write instead.
pub const SYMPTOM_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "headache",
        &["head pain", "head ache", "migraine", "head pounding"],
    ),
    (
        "stomach pain",
        &[
            "abdominal pain",
            "belly pain",
            "tummy ache",
            "stomach ache",
            "cramps",
        ],
    ),
    (
        "fever",
        &["temperature", "hot", "chills", "sweating", "feverish"],
    ),
    ("cough", &["coughing", "hacking", "clearing throat"]),
    (
        "fatigue",
        &["tired", "exhausted", "weak", "low energy", "lethargic"],
    ),
    ("nausea", &["queasy", "sick to stomach", "feeling sick"]),
    (
        "anxiety",
        &["nervous", "worried", "panic", "stressed", "uneasy"],
    ),
];

pub const EMERGENCY_SYMPTOMS: &[&str] = &[
    "chest pain",
    "shortness of breath",
    "severe headache",
    "uncontrolled bleeding",
    "loss of consciousness",
];

pub const MODERATE_SYMPTOMS: &[&str] = &["fever", "vomiting", "severe pain", "dizziness"];

pub const SYMPTOM_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "respiratory",
        &[
            "cough",
            "shortness of breath",
            "wheezing",
            "chest pain",
            "sore throat",
            "runny nose",
            "congestion",
            "sneezing",
        ],
    ),
    (
        "gastrointestinal",
        &[
            "nausea",
            "vomiting",
            "diarrhea",
            "constipation",
            "abdominal pain",
            "stomach pain",
            "bloating",
            "heartburn",
            "indigestion",
            "loss of appetite",
        ],
    ),
    (
        "neurological",
        &["headache", "dizziness", "blurred vision", "confusion", "numbness"],
    ),
    (
        "musculoskeletal",
        &["back pain", "joint pain", "muscle pain", "stiffness", "swelling"],
    ),
    (
        "general",
        &["fever", "fatigue", "chills", "sweating", "weight loss", "insomnia"],
    ),
];

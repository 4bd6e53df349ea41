//! Canned reply texts and payloads for the rule-routed categories.

use crate::models::{
    EmergencyContact, EmergencyPayload, PatientProfile, PainAssessmentPayload, ReportInfoPayload,
};

use super::{Persona, PersonaKind};
use super::pain::PainDetails;

pub const EMERGENCY_NUMBER: &str = "911";
const EMERGENCY_ACTIONS: &[&str] = &[
    "Call emergency services",
    "Do not drive yourself",
    "Stay on the line with operator",
    "Unlock door if alone",
    "Sit or lie down if feeling faint",
];
const EMERGENCY_CONTACTS: &[(&str, &str)] = &[
    ("Poison Control", "1-800-222-1222"),
    ("Suicide Prevention Lifeline", "988"),
    ("Crisis Text Line", "Text HOME to 741741"),
];
const REPORT_INCLUDES: &[&str] = &[
    "Patient Information & History",
    "Detailed Symptom Analysis",
    "Possible Diagnoses with Confidence Levels",
    "Personalized Treatment Plan",
    "Recommended Medical Tests",
    "Follow-up Instructions",
    "Emergency Contact Information",
    "Doctor's Summary Notes",
];
const REPORT_ESTIMATED_TIME: &str = "15-30 seconds";
const PAIN_FOLLOW_UP_QUESTIONS: &[&str] = &[
    "Where exactly is the pain?",
    "Is it sharp, dull, throbbing, burning, or aching?",
    "On a scale of 1-10, with 10 being the worst pain imaginable, where is it?",
    "How long have you had this pain?",
    "What makes it better or worse?",
];
const RETURN_VISIT_MIN_TURNS: usize = 5;

pub const GENERAL_TREATMENT_ADVICE: &[&str] = &[
    "Get plenty of rest and sleep 7-9 hours a night",
    "Stay well hydrated throughout the day",
    "Eat balanced meals with fruits and vegetables",
    "Follow the dosing instructions on any over-the-counter medication",
    "Check with a pharmacist before combining medications",
    "See a healthcare provider if symptoms persist or get worse",
];

pub const DIAGNOSIS_SUMMARY_FALLBACK: &str = "Based on the symptoms described, I recommend further evaluation by a healthcare provider for proper diagnosis and treatment.";

fn time_greeting(hour: u32) -> &'static str {
    match hour {
        0..12 => "Good morning",
        12..17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Opening message for a new session. `hour` is the local hour of day (0-23).
pub fn welcome_message(persona: &Persona, patient: &PatientProfile, hour: u32) -> String {
    let about = match (patient.age, patient.gender.as_deref().map(str::trim)) {
        (Some(age), Some(gender)) if !gender.is_empty() => {
            format!("I see you're {age} years old, {}. ", gender.to_lowercase())
        }
        (Some(age), _) => format!("I see you're {age} years old. "),
        _ => String::new(),
    };

    format!(
        "{greeting} {name}! {emoji}

I'm {doctor}, your AI medical assistant. It's nice to meet you!

{about}I'm here to listen and help you feel better.

**How this works:**
1. You describe what you're feeling in your own words
2. I'll ask questions to understand better
3. We'll work together to figure out what might be going on
4. I'll suggest next steps that make sense for you

**Please tell me:**
• What symptoms you're experiencing right now
• When they started and how they've been changing
• How they're affecting your daily life
• Anything that makes them better or worse

Take your time. What would you like to share first?",
        greeting = time_greeting(hour),
        name = patient.display_name(),
        emoji = persona.emoji,
        doctor = persona.name,
    )
}

pub fn emergency_reply(name: &str) -> (String, EmergencyPayload) {
    let message = format!(
        "🚨 **EMERGENCY MEDICAL ALERT** 🚨

{name}, I understand you're describing a serious situation. Based on your message, this appears to be a **MEDICAL EMERGENCY**.

1. **STAY CALM** but act quickly
2. **CALL {EMERGENCY_NUMBER} or your local emergency number RIGHT NOW**
3. **DO NOT** try to drive yourself to the hospital
4. **STAY ON THE LINE** with emergency services
5. **FOLLOW THEIR INSTRUCTIONS** carefully

**If you're alone:**
• Call a neighbor or family member immediately
• Unlock your door so emergency personnel can enter
• If possible, sit or lie down while waiting for help

**Other contacts:**
• Poison Control: 1-800-222-1222
• Suicide Prevention: 988 (US)
• Crisis Text Line: Text HOME to 741741

I'm an AI assistant and cannot provide emergency care. Please call for help immediately and then come back to let me know you're safe."
    );

    let payload = EmergencyPayload {
        emergency_number: EMERGENCY_NUMBER.to_string(),
        immediate_actions: EMERGENCY_ACTIONS.iter().map(ToString::to_string).collect(),
        contacts: EMERGENCY_CONTACTS
            .iter()
            .map(|(name, contact)| EmergencyContact {
                name: (*name).to_string(),
                contact: (*contact).to_string(),
            })
            .collect(),
    };

    (message, payload)
}

pub fn report_info_reply(name: &str, format_label: &str) -> (String, ReportInfoPayload) {
    let includes = REPORT_INCLUDES
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n");
    let message = format!(
        "I'd be happy to create a comprehensive medical report for you, {name}! 📋

**Your report will include:**
{includes}

The report will be in {format_label} format, which you can save for your records or share with your doctor.

**Would you like me to generate this report now?** It typically takes about {REPORT_ESTIMATED_TIME} to create."
    );

    let payload = ReportInfoPayload {
        includes: REPORT_INCLUDES.iter().map(ToString::to_string).collect(),
        estimated_time: REPORT_ESTIMATED_TIME.to_string(),
        format: format_label.to_string(),
    };

    (message, payload)
}

pub fn thanks_reply(persona: &Persona, name: &str, last_diagnosis: Option<&str>) -> String {
    match last_diagnosis {
        Some(diagnosis) => format!(
            "You're very welcome, {name}! {emoji}

I'm glad I could help you understand more about {diagnosis}.

**A few gentle reminders:**
• Be kind to yourself as you recover
• Follow the recommendations we discussed
• Don't hesitate to reach out if symptoms change

Is there anything else on your mind regarding your health today?",
            emoji = persona.emoji,
            diagnosis = diagnosis.to_lowercase(),
        ),
        None => format!(
            "You're most welcome, {name}! {emoji}

It's my pleasure to help. Being proactive about your health is one of the best things you can do for yourself.

**I'm here whenever you need:**
• To discuss new or changing symptoms
• To clarify any medical information
• To answer questions about treatments

What else can I assist you with today?",
            emoji = persona.emoji,
        ),
    }
}

pub fn greeting_reply(persona: &Persona, name: &str, history_len: usize) -> String {
    if history_len > RETURN_VISIT_MIN_TURNS {
        format!(
            "Welcome back, {name}! {emoji}

It's good to see you again. How are you feeling since we last spoke?

**Quick check-in:**
• Have your symptoms improved, stayed the same, or gotten worse?
• Did you have a chance to try any of the recommendations we discussed?
• Any new developments or concerns?

What would you like to focus on today?",
            emoji = persona.emoji,
        )
    } else {
        format!(
            "{greeting}, {name}! {emoji}

How are you feeling right now?

**To help me understand better:**
• What symptoms are you noticing, if any?
• Is there anything specific you'd like to discuss or ask about?

I'm listening carefully and ready to help. What's on your mind?",
            greeting = persona.greeting,
            emoji = persona.emoji,
        )
    }
}

/// One of three fixed answers, picked by persona so replies stay deterministic.
pub fn how_are_you_reply(persona: &Persona, name: &str) -> String {
    match persona.kind {
        PersonaKind::Smith => format!(
            "I'm doing well, thank you for asking! {} Just here ready to help you, {name}. How are you feeling today?",
            persona.emoji
        ),
        PersonaKind::Johnson => format!(
            "Thanks for asking! I'm here and ready to assist you with your health concerns. How are you feeling right now, {name}?"
        ),
        PersonaKind::Patel => format!(
            "I'm doing great, focused on helping you feel better! {} That's very kind of you to ask. How has your day been so far, {name}?",
            persona.emoji
        ),
    }
}

pub fn goodbye_reply(persona: &Persona, name: &str) -> String {
    format!(
        "Goodbye, {name}! {emoji}

It was a pleasure speaking with you today. Before you go:

**Final reminders:**
• Take good care of yourself
• Follow through with any recommendations we discussed
• Come back if symptoms change or new concerns arise

I'll be here whenever you need me. Feel better soon!",
        emoji = persona.emoji,
    )
}

pub fn pain_reply(name: &str, details: PainDetails) -> (String, PainAssessmentPayload) {
    let mut acknowledgement = String::new();
    if !details.locations.is_empty() {
        acknowledgement.push_str(&format!(
            "I noted pain around your {}. ",
            details.locations.join(", ")
        ));
    }
    if let Some(score) = details.severity_score {
        acknowledgement.push_str(&format!("You rated it {score}/10. "));
    }

    let message = format!(
        "I hear you're experiencing pain, {name}. I'm sorry you're going through this. {acknowledgement}

**For immediate relief while we talk:**
• Try to find a comfortable position
• Take slow, deep breaths
• Apply a cold or warm compress if appropriate
• Avoid any movements that worsen the pain

**To help me understand better:**
1. **Location:** Where exactly is the pain?
2. **Type:** Is it sharp, dull, throbbing, burning, or aching?
3. **Scale:** On a scale of 1-10, where is it?
4. **Duration:** How long have you had this pain?
5. **Triggers:** What makes it better or worse?

**Important:** If the pain is severe (8-10/10), sudden, or accompanied by chest pain, difficulty breathing, or weakness on one side, please seek emergency care immediately."
    );

    let payload = PainAssessmentPayload {
        locations: details.locations,
        pain_types: details.pain_types,
        severity_score: details.severity_score,
        follow_up_questions: PAIN_FOLLOW_UP_QUESTIONS
            .iter()
            .map(ToString::to_string)
            .collect(),
    };

    (message, payload)
}

/// Used when the generator cannot produce a symptom narrative.
pub fn symptom_fallback_narrative(
    name: &str,
    symptoms: &[String],
    suggested_diagnosis: Option<&str>,
    actions: &[String],
) -> String {
    let mut message = format!(
        "Thank you for sharing that with me, {name}. I understand you're dealing with {}.",
        symptoms.join(", ")
    );
    if let Some(diagnosis) = suggested_diagnosis {
        message.push_str(&format!(
            " Based on what you've described, this may be consistent with {diagnosis}, though only an in-person examination can confirm it."
        ));
    }
    if !actions.is_empty() {
        message.push_str("\n\n**What I recommend:**\n");
        let steps = actions
            .iter()
            .map(|action| format!("• {action}"))
            .collect::<Vec<_>>()
            .join("\n");
        message.push_str(&steps);
    }
    message.push_str(
        "\n\nIf your symptoms suddenly get worse, please seek medical care right away. How long have you been feeling this way?",
    );
    message
}

pub fn treatment_general_reply(name: &str) -> String {
    format!(
        "Good question, {name}. Without a specific medication or condition in mind, here are some general guidelines that help with most common illnesses. If you tell me which medicine or condition you're asking about, I can give you more specific information."
    )
}

pub fn medication_reply(name: &str, found: &[String], unlisted: &[String]) -> String {
    let mut message = if found.is_empty() {
        format!("I looked into that for you, {name}.")
    } else {
        format!(
            "Here's what you should know about {}, {name}. Always follow the label or your pharmacist's directions.",
            found.join(", ")
        )
    };
    if !unlisted.is_empty() {
        message.push_str(&format!(
            " I don't have detailed information on {} in my catalogue, so please check with a pharmacist or your doctor about it.",
            unlisted.join(", ")
        ));
    }
    message
}

pub fn treatment_plan_reply(name: &str, plan_name: &str) -> String {
    format!(
        "Here's a general treatment plan for {plan_name}, {name}. It's tailored to the details you've shared, but please confirm it with your healthcare provider before starting anything new."
    )
}

pub const GENERAL_FALLBACK_MESSAGE: &str = "I understand you're reaching out about something important. I want to make sure I give you the best possible response. Could you tell me a bit more about what's on your mind? I'm here to listen and help in any way I can. 💭";

pub fn error_reply(name: &str) -> String {
    format!(
        "I apologize, {name}. I'm having a bit of technical difficulty right now. Could you please rephrase your question or try again in a moment? 🔧"
    )
}

#[cfg(test)]
mod tests {
    use super::{greeting_reply, time_greeting, welcome_message};
    use crate::conversation::PersonaKind;
    use crate::models::PatientProfile;

    #[test]
    fn greets_by_time_of_day() {
        assert_eq!(time_greeting(7), "Good morning");
        assert_eq!(time_greeting(12), "Good afternoon");
        assert_eq!(time_greeting(21), "Good evening");
    }

    #[test]
    fn welcome_omits_unknown_demographics() {
        let persona = PersonaKind::Smith.persona();
        let anonymous = welcome_message(&persona, &PatientProfile::default(), 9);
        assert!(anonymous.starts_with("Good morning Patient!"));
        assert!(!anonymous.contains("years old"));

        let known = PatientProfile {
            name: Some("Ana".to_string()),
            age: Some(34),
            gender: Some("Female".to_string()),
            ..PatientProfile::default()
        };
        let message = welcome_message(&persona, &known, 15);
        assert!(message.contains("I see you're 34 years old, female."));
        assert!(message.contains("I'm Dr. Smith"));
    }

    #[test]
    fn return_visitors_are_welcomed_back() {
        let persona = PersonaKind::Patel.persona();
        assert!(greeting_reply(&persona, "Ana", 6).starts_with("Welcome back, Ana!"));
        assert!(greeting_reply(&persona, "Ana", 2).starts_with("Hi there, Ana!"));
    }
}

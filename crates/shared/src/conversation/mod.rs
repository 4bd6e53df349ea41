//! Message routing, persona voice, and the per-category reply handlers.

mod handlers;
mod pain;
mod persona;
mod router;
mod templates;

pub use handlers::{ConversationEngine, EngineSettings, HandlerError};
pub use pain::{PainDetails, extract_pain_details};
pub use persona::{Persona, PersonaKind};
pub use router::{EMERGENCY_KEYWORDS, ROUTE_RULES, RouteCategory, RouteInput, RulePredicate, route};
pub use templates::{DIAGNOSIS_SUMMARY_FALLBACK, EMERGENCY_NUMBER, GENERAL_FALLBACK_MESSAGE};

//! report.rs — Projection from a `Session` to the externally visible report.
//!
//! Pure and repeatable: building a report never mutates the session, and only
//! the wall-clock-derived duration changes between calls. The confidence
//! floor of 0.75 is a presentation policy for detected scams, not a
//! recomputation of the estimate.

use serde::{Deserialize, Serialize};

use crate::intel::IntelligenceRecord;
use crate::session::{Session, SessionStore};

/// Wire shape consumed by the report callback. Key names are a compatibility
/// contract; do not rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub session_id: String,
    pub scam_detected: bool,
    pub scam_type: String,
    pub confidence_level: f32,
    pub total_messages_exchanged: u32,
    pub engagement_duration_seconds: u64,
    pub extracted_intelligence: IntelligenceRecord,
    pub agent_notes: String,
}

/// Build the report for `session` as of `now_unix`.
pub fn build(session_id: &str, session: &Session, now_unix: u64) -> FinalReport {
    let duration = now_unix.saturating_sub(session.start_time).max(1);

    let red_flags = if session.red_flags_found.is_empty() {
        "suspicious behavior".to_string()
    } else {
        session
            .red_flags_found
            .iter()
            .take(10)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    let agent_notes = format!(
        "Scam type detected: {}. Red flags identified: {}. Scammer used social \
         engineering tactics including urgency, impersonation, and verification \
         pressure. Total questions asked: {}. Intelligence extracted across {} \
         messages.",
        session.scam_type.as_str(),
        red_flags,
        session.questions_asked,
        session.total_messages_exchanged
    );

    FinalReport {
        session_id: session_id.to_string(),
        scam_detected: session.scam_detected,
        scam_type: if session.scam_detected {
            session.scam_type.as_str().to_string()
        } else {
            "none".to_string()
        },
        confidence_level: if session.scam_detected {
            session.confidence_level.max(0.75)
        } else {
            0.0
        },
        total_messages_exchanged: session.total_messages_exchanged,
        engagement_duration_seconds: duration,
        extracted_intelligence: session.intelligence.clone(),
        agent_notes,
    }
}

impl SessionStore {
    /// Report for an existing session; `None` if the id is unknown.
    pub fn final_report(&self, id: &str) -> Option<FinalReport> {
        self.get(id).map(|s| build(id, &s, self.now_unix()))
    }
}

// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod classify;
pub mod config;
pub mod extract;
pub mod intel;
pub mod llm;
pub mod notify;
pub mod obs;
pub mod red_flags;
pub mod reply;
pub mod report;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::classify::{classify, Classification, ScamType};
pub use crate::config::AppConfig;
pub use crate::intel::IntelligenceRecord;
pub use crate::report::FinalReport;
pub use crate::session::{ConversationMessage, Session, SessionStore};

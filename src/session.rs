//! session.rs — Thread-safe session store and the per-turn update algorithm.
//!
//! One store-wide mutex serializes every mutation: each critical section is a
//! handful of CPU-bound regex scans and set merges, so correctness beats
//! throughput here. Callers never hold a reference into the map — reads and
//! `update()` both hand back cloned snapshots keyed by session id.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::classify::{self, ScamType};
use crate::extract;
use crate::red_flags;
use crate::intel::IntelligenceRecord;

/// Injectable time source so session durations are testable.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

/// Wall-clock seconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// One turn of the upstream conversation history.
///
/// Malformed entries (missing `sender` or `text`) deserialize to defaults and
/// simply contribute nothing, rather than failing the whole update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationMessage {
    pub sender: String,
    pub text: String,
    /// Opaque to the core; carried through untouched.
    pub timestamp: serde_json::Value,
}

impl ConversationMessage {
    pub fn scammer(text: impl Into<String>) -> Self {
        Self {
            sender: "scammer".to_string(),
            text: text.into(),
            timestamp: serde_json::Value::Null,
        }
    }

    pub fn is_scammer(&self) -> bool {
        self.sender == "scammer"
    }
}

/// Accumulated state for one honeypot conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub start_time: u64,
    /// One-way latch; never resets once any classification signal is found.
    pub scam_detected: bool,
    pub scam_type: ScamType,
    /// Highest confidence ever observed, paired with the type that produced it.
    pub confidence_level: f32,
    pub intelligence: IntelligenceRecord,
    /// First-seen order, no duplicates, never truncated here.
    pub red_flags_found: Vec<String>,
    pub questions_asked: u32,
    pub total_messages_exchanged: u32,
    /// Flipped externally via `mark_callback_sent`.
    pub callback_sent: bool,
    /// Replies already served to this session, for external dedup.
    pub used_responses: HashSet<String>,
    /// Append-only log of scammer turns; classification input.
    pub all_scammer_texts: Vec<String>,
    /// History is folded into the session at most once.
    pub history_processed: bool,
}

impl Session {
    fn new(start_time: u64) -> Self {
        Self {
            start_time,
            scam_detected: false,
            scam_type: ScamType::Unknown,
            confidence_level: 0.0,
            intelligence: IntelligenceRecord::default(),
            red_flags_found: Vec::new(),
            questions_asked: 0,
            total_messages_exchanged: 0,
            callback_sent: false,
            used_responses: HashSet::new(),
            all_scammer_texts: Vec::new(),
            history_processed: false,
        }
    }

    fn note_red_flags(&mut self, text: &str) {
        for flag in red_flags::detect(text) {
            if !self.red_flags_found.iter().any(|f| f == flag) {
                self.red_flags_found.push(flag.to_string());
            }
        }
    }
}

/// Keyed, mutex-guarded store of all live sessions.
///
/// Sessions are created lazily on first reference and live for the process
/// lifetime; `retire` is the hook an eviction/TTL sweeper would use.
pub struct SessionStore {
    inner: Mutex<HashMap<String, Session>>,
    clock: Arc<dyn Clock>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn now_unix(&self) -> u64 {
        self.clock.now_unix()
    }

    /// Snapshot of the session, creating it first if unknown.
    pub fn get_or_create(&self, id: &str) -> Session {
        let now = self.clock.now_unix();
        let mut map = self.lock();
        map.entry(id.to_string())
            .or_insert_with(|| Session::new(now))
            .clone()
    }

    /// Snapshot of an existing session, `None` if unknown.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.lock().get(id).cloned()
    }

    /// Replies already served to this session (empty for unknown ids).
    pub fn used_responses(&self, id: &str) -> HashSet<String> {
        self.lock()
            .get(id)
            .map(|s| s.used_responses.clone())
            .unwrap_or_default()
    }

    /// Latch the callback flag; a no-op for unknown ids.
    pub fn mark_callback_sent(&self, id: &str) {
        if let Some(session) = self.lock().get_mut(id) {
            session.callback_sent = true;
        }
    }

    /// Drop a session from the store, returning its final state.
    /// Extension point for an eviction/TTL policy; nothing calls this on the
    /// hot path.
    pub fn retire(&self, id: &str) -> Option<Session> {
        self.lock().remove(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Fold one scammer turn into the session. Runs as a single atomic unit
    /// under the store lock; concurrent updates on the same id serialize.
    pub fn update(
        &self,
        id: &str,
        current_text: &str,
        history: &[ConversationMessage],
        generated_reply: &str,
    ) -> Session {
        let now = self.clock.now_unix();
        let mut map = self.lock();
        let session = map
            .entry(id.to_string())
            .or_insert_with(|| Session::new(now));

        // 1) Fold prior history in, once per session.
        if !session.history_processed && !history.is_empty() {
            for msg in history.iter().filter(|m| m.is_scammer()) {
                session.intelligence.merge_from(&extract::extract_all(&msg.text));
                session.note_red_flags(&msg.text);
            }
            session.history_processed = true;
        }

        // 2) + 3) Record the turn and merge its artifacts.
        session.all_scammer_texts.push(current_text.to_string());
        session
            .intelligence
            .merge_from(&extract::extract_all(current_text));

        // 4) History plus the current scammer turn and our reply.
        session.total_messages_exchanged = history.len() as u32 + 2;

        // 5) Reclassify over everything the scammer has said; the assessment
        // only ever moves to an equal-or-higher confidence.
        let full_text = session.all_scammer_texts.join(" ");
        let c = classify::classify(&full_text);
        if c.signals > 0 {
            session.scam_detected = true;
            if c.confidence >= session.confidence_level {
                session.scam_type = c.scam_type;
                session.confidence_level = c.confidence;
            }
        }

        // 6) Red flags from the current turn, first-seen order.
        session.note_red_flags(current_text);

        // 7) + 8) Reply bookkeeping for the generation collaborator.
        session.questions_asked += generated_reply.matches('?').count() as u32;
        session.used_responses.insert(generated_reply.to_string());

        session.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.inner.lock().expect("session store mutex poisoned")
    }
}

//! reply.rs — Deterministic fallback phrase bank for honeypot replies.
//!
//! When the LLM client yields nothing, a reply is drawn from a fixed bank of
//! investigative responses. Category selection looks at scam-signal keywords
//! in the current message and the turn number; per-session dedup avoids
//! serving the same phrase twice while alternatives remain.

use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use std::collections::{HashMap, HashSet};

static FALLBACK_RESPONSES: Lazy<HashMap<String, Vec<String>>> = Lazy::new(|| {
    let raw = include_str!("../patterns/fallback_replies.json");
    serde_json::from_str(raw).expect("valid fallback reply bank")
});

/// Keywords that mark a message as suspicious enough to warrant the
/// investigative (non-benign) response track.
const SCAM_SIGNALS: &[&str] = &[
    "otp", "verify", "urgent", "blocked", "suspended", "kyc", "fraud", "security", "transaction",
    "click", "link", "immediately", "expired", "penalty", "legal", "arrest", "fee", "charge",
    "transfer", "pin", "password", "cvv", "compromised", "won", "prize", "lottery", "cashback",
    "offer", "claim", "reward", "congratulations", "selected", "http", "www", "bank", "account",
    "warning", "fast", "act now", "last chance", "final", "expire", "hurry", "reference",
    "department", "officer", "employee",
];

fn stage_for_turn(turn: usize) -> &'static str {
    if turn < 3 {
        "early"
    } else if turn < 6 {
        "mid"
    } else {
        "late"
    }
}

/// Pick the response category for a message at the given turn.
pub fn contextual_category(text: &str, turn: usize) -> &'static str {
    let t = text.to_lowercase();

    if !SCAM_SIGNALS.iter().any(|sig| t.contains(sig)) {
        return "benign";
    }

    if t.contains("otp") || t.contains("one time") || t.contains("verification code") {
        return "otp";
    }
    if t.contains("upi") || t.contains("paytm") || t.contains("gpay") || t.contains("phonepe") {
        return "upi";
    }
    if t.contains("link")
        || t.contains("click")
        || t.contains("http")
        || t.contains("www")
        || t.contains("url")
    {
        return "link";
    }
    if t.contains("account") || t.contains("bank") || t.contains("balance") || t.contains("transfer")
    {
        return "account";
    }

    stage_for_turn(turn)
}

/// Choose a fallback reply, avoiding anything in `used` while possible.
///
/// Once the session is flagged as a scam the benign track is off the table;
/// exhausted categories fall through to `mid`, `late`, then `early` before
/// repeats are allowed.
pub fn pick_fallback(
    text: &str,
    turn: usize,
    used: &HashSet<String>,
    scam_detected: bool,
) -> String {
    let mut category = contextual_category(text, turn);
    if scam_detected && category == "benign" {
        category = stage_for_turn(turn);
    }

    let bank = &*FALLBACK_RESPONSES;
    let responses = bank
        .get(category)
        .or_else(|| bank.get("early"))
        .expect("reply bank has an early category");

    let mut available: Vec<&String> = responses.iter().filter(|r| !used.contains(*r)).collect();

    if available.is_empty() {
        for alt in ["mid", "late", "early"] {
            if alt == category {
                continue;
            }
            if let Some(pool) = bank.get(alt) {
                let fresh: Vec<&String> = pool.iter().filter(|r| !used.contains(*r)).collect();
                if !fresh.is_empty() {
                    available = fresh;
                    break;
                }
            }
        }
    }

    if available.is_empty() {
        available = responses.iter().collect();
    }

    (*available
        .choose(&mut rand::rng())
        .expect("non-empty reply pool"))
    .clone()
}

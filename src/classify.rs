//! classify.rs — Keyword-scored scam-type classification.
//!
//! The keyword tables live in `patterns/scam_keywords.json`, embedded at
//! compile time so the classifier is a fixed, deterministic function of its
//! input. Scoring is lowercase substring counting per table; the first table
//! (in declaration order) with the strictly highest hit count wins, which
//! makes the file order the tie-break priority.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Closed set of scam categories, plus `unknown` for unclassified sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamType {
    BankFraud,
    UpiFraud,
    Phishing,
    OtpFraud,
    InsuranceFraud,
    TechSupportFraud,
    DeliveryFraud,
    Unknown,
}

impl ScamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamType::BankFraud => "bank_fraud",
            ScamType::UpiFraud => "upi_fraud",
            ScamType::Phishing => "phishing",
            ScamType::OtpFraud => "otp_fraud",
            ScamType::InsuranceFraud => "insurance_fraud",
            ScamType::TechSupportFraud => "tech_support_fraud",
            ScamType::DeliveryFraud => "delivery_fraud",
            ScamType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Deserialize)]
struct KeywordTable {
    scam_type: ScamType,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordFile {
    tables: Vec<KeywordTable>,
}

static TABLES: Lazy<Vec<KeywordTable>> = Lazy::new(|| {
    let raw = include_str!("../patterns/scam_keywords.json");
    serde_json::from_str::<KeywordFile>(raw)
        .expect("valid scam keyword tables")
        .tables
});

/// Outcome of one classification pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub scam_type: ScamType,
    /// `min(hits / 5, 1.0)` for the winning table.
    pub confidence: f32,
    /// Raw keyword hits of the winning table; zero means no signal at all.
    pub signals: usize,
}

impl Classification {
    pub fn none() -> Self {
        Self {
            scam_type: ScamType::Unknown,
            confidence: 0.0,
            signals: 0,
        }
    }
}

/// Classify `text` against the fixed keyword tables.
pub fn classify(text: &str) -> Classification {
    let t = text.to_lowercase();

    let mut best: Option<(ScamType, usize)> = None;
    for table in TABLES.iter() {
        let hits = table
            .keywords
            .iter()
            .filter(|k| t.contains(k.as_str()))
            .count();
        // Strictly-greater keeps the earlier table on ties.
        if hits > 0 && best.is_none_or(|(_, b)| hits > b) {
            best = Some((table.scam_type, hits));
        }
    }

    match best {
        Some((scam_type, hits)) => Classification {
            scam_type,
            confidence: (hits as f32 / 5.0).min(1.0),
            signals: hits,
        },
        None => Classification::none(),
    }
}

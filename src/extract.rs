//! extract.rs — Pattern-based entity extractors for scammer messages.
//!
//! Six pure, total functions from text to artifact sets, plus `extract_all`
//! which assembles the full `IntelligenceRecord`. Empty input yields empty
//! sets; no function ever fails.
//!
//! Disambiguation order matters in two places:
//! - bank accounts are computed against the phone numbers found in the same
//!   text (a digit run that is, or sits inside, a phone number is no account);
//! - email addresses are computed against the UPI ids found in the same text
//!   (a `local@domain` token is classified as UPI first, email second).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::intel::IntelligenceRecord;

/// Domain bases that mark an `@` handle as an ordinary mailbox, not a UPI id.
const EMAIL_DOMAINS: &[&str] = &[
    "gmail", "yahoo", "hotmail", "outlook", "protonmail", "icloud", "aol", "mail", "zoho",
    "yandex", "live", "msn", "rediffmail", "gmx", "inbox", "fastmail", "tutanota", "pm", "hey",
];

/// Known UPI provider substrings (bank and wallet short codes).
const UPI_PROVIDERS: &[&str] = &[
    "upi", "okhdfcbank", "okicici", "oksbi", "okaxis", "paytm", "ybl", "ibl", "apl", "axl",
    "fbl", "ikwik", "abfspay", "axisbank", "sbi", "hdfcbank", "icici", "kotak", "indus", "boi",
    "pnb", "canara", "unionbank", "rbl", "federal", "dbs", "hsbc", "sc", "citi", "idbi", "bob",
    "ubi",
];

// International format: +CC with grouped digit blocks, e.g. +91-98765 43210.
static PHONE_INTL_GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\d{1,3}[-.\s]?\d{4,5}[-.\s]?\d{4,6}").expect("phone regex"));
// +CC directly followed by a 10-digit block, e.g. +919876543210.
static PHONE_INTL_PLAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\d{1,3}[-.\s]?\d{10}").expect("phone regex"));
// Landline with a 0 trunk prefix.
static PHONE_LANDLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b0\d{10}\b").expect("phone regex"));

// Maximal digit runs; stands in for lookaround-based digit boundaries, which
// the regex crate does not support.
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit regex"));

// Any `local@domain` handle; UPI classification happens on the domain.
static HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._-]{2,}@[A-Za-z0-9.-]+\b").expect("handle regex"));
// Strict mailbox shape: dotted alphabetic TLD required.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email regex")
});
static TLD_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[A-Za-z]{2,}$").expect("tld regex"));

static LINK_HTTP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("link regex"));
static LINK_WWW: Lazy<Regex> = Lazy::new(|| Regex::new(r#"www\.[^\s<>"']+"#).expect("link regex"));

// Case/reference id surface forms: SBI-12345, REF0012345, "CASE: ABC123",
// 123/REF/456.
static CASE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b[A-Z]{2,5}-\d{3,10}\b",
        r"\b[A-Z]{2,5}\d{4,10}\b",
        r"\b(?:CASE|REF|TXN|ORDER|POLICY|TKT)[:#\s]+[A-Z0-9-]{4,15}\b",
        r"\b\d{3,5}/[A-Z]{2,5}/\d{3,5}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("case id regex"))
    .collect()
});

fn digits_of(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Phone numbers: surface forms whose digit-only length is 10–13.
pub fn extract_phone_numbers(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if text.is_empty() {
        return out;
    }

    let mut consider = |surface: &str| {
        let digits = digits_of(surface);
        if (10..=13).contains(&digits.len()) {
            out.insert(surface.trim().to_string());
        }
    };

    for re in [&*PHONE_INTL_GROUPED, &*PHONE_INTL_PLAIN, &*PHONE_LANDLINE] {
        for m in re.find_iter(text) {
            consider(m.as_str());
        }
    }
    // A maximal run of exactly 10 digits is a bare mobile number.
    for m in DIGIT_RUN.find_iter(text) {
        if m.as_str().len() == 10 {
            consider(m.as_str());
        }
    }
    out
}

/// Bank accounts: maximal digit runs of 9–18 digits, minus anything that is
/// plausibly a phone number or a decimal fragment.
pub fn extract_bank_accounts(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if text.is_empty() {
        return out;
    }

    let phone_digits: Vec<String> = extract_phone_numbers(text)
        .iter()
        .map(|p| digits_of(p))
        .collect();

    for m in DIGIT_RUN.find_iter(text) {
        let run = m.as_str();
        if !(9..=18).contains(&run.len()) {
            continue;
        }
        // `+` prefix marks a country code, `.` a decimal fraction.
        if matches!(text[..m.start()].chars().next_back(), Some('+') | Some('.')) {
            continue;
        }
        // A following `.digit` means this run is the integer part of a number.
        let mut rest = text[m.end()..].chars();
        if rest.next() == Some('.') && rest.next().is_some_and(|c| c.is_ascii_digit()) {
            continue;
        }
        // Runs that equal or sit inside an identified phone number are phones.
        if phone_digits.iter().any(|p| p.contains(run)) {
            continue;
        }
        // A 10-digit run starting with a mobile-prefix digit is a phone.
        if run.len() == 10 && matches!(run.as_bytes()[0], b'6'..=b'9') {
            continue;
        }
        out.insert(run.to_string());
    }
    out
}

/// UPI-style payment handles. A `local@domain` token is UPI when the domain
/// contains a known provider code, or when it has no dotted alphabetic TLD
/// and its base is not a known public email provider.
pub fn extract_upi_ids(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if text.is_empty() {
        return out;
    }

    for m in HANDLE.find_iter(text) {
        let token = m.as_str();
        let Some((_, domain_raw)) = token.split_once('@') else {
            continue;
        };
        if domain_raw.contains('@') {
            continue;
        }
        let domain = domain_raw.to_ascii_lowercase();

        let is_provider = UPI_PROVIDERS.iter().any(|p| domain.contains(p));
        let has_tld = TLD_SUFFIX.is_match(&domain);
        let base = domain.split('.').next().unwrap_or(domain.as_str());

        if is_provider || (!has_tld && !EMAIL_DOMAINS.contains(&base)) {
            out.insert(token.to_string());
        }
    }
    out
}

/// Email addresses, excluding anything already classified as a UPI id.
pub fn extract_email_addresses(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if text.is_empty() {
        return out;
    }

    let upi_ids = extract_upi_ids(text);
    for m in EMAIL.find_iter(text) {
        let token = m.as_str();
        if !upi_ids.contains(token) {
            out.insert(token.to_string());
        }
    }
    out
}

/// `http(s)://` and bare `www.` links up to the first whitespace/quote/bracket,
/// with trailing punctuation stripped.
pub fn extract_phishing_links(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if text.is_empty() {
        return out;
    }

    for re in [&*LINK_HTTP, &*LINK_WWW] {
        for m in re.find_iter(text) {
            let link = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
            if !link.is_empty() {
                out.insert(link.to_string());
            }
        }
    }
    out
}

/// Case/reference/policy/order identifiers. A raw match is kept only if it is
/// at least 5 chars and mixes letters with digits.
pub fn extract_case_ids(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if text.is_empty() {
        return out;
    }

    for re in CASE_PATTERNS.iter() {
        for m in re.find_iter(text) {
            let id = m.as_str().trim();
            let has_alpha = id.chars().any(|c| c.is_ascii_alphabetic());
            let has_digit = id.chars().any(|c| c.is_ascii_digit());
            if id.len() >= 5 && has_alpha && has_digit {
                out.insert(id.to_string());
            }
        }
    }
    out
}

/// Run all six extractors and assemble the fixed six-key record.
pub fn extract_all(text: &str) -> IntelligenceRecord {
    IntelligenceRecord {
        phone_numbers: extract_phone_numbers(text),
        bank_accounts: extract_bank_accounts(text),
        upi_ids: extract_upi_ids(text),
        phishing_links: extract_phishing_links(text),
        email_addresses: extract_email_addresses(text),
        case_ids: extract_case_ids(text),
    }
}

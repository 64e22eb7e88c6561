//! red_flags.rs — Detection of manipulation-language keywords.
//!
//! A fixed list of urgency/threat/fee phrases. Detection is lowercase
//! substring matching; results come back in table order so that session-level
//! accumulation stays deterministic.

/// Manipulation keywords that mark pressure tactics in scammer messages.
pub const RED_FLAG_KEYWORDS: &[&str] = &[
    "urgent",
    "immediately",
    "blocked",
    "suspended",
    "otp",
    "verify",
    "click",
    "link",
    "fee",
    "charge",
    "limited time",
    "expire",
    "arrest",
    "legal",
    "penalty",
    "hurry",
    "last chance",
    "act now",
    "final warning",
    "deadline",
];

/// The subset of `RED_FLAG_KEYWORDS` present in `text`.
pub fn detect(text: &str) -> Vec<&'static str> {
    if text.is_empty() {
        return Vec::new();
    }
    let t = text.to_lowercase();
    RED_FLAG_KEYWORDS
        .iter()
        .copied()
        .filter(|flag| t.contains(flag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_benign_text_have_no_flags() {
        assert!(detect("").is_empty());
        assert!(detect("lovely weather today").is_empty());
    }

    #[test]
    fn flags_come_back_in_table_order() {
        let flags = detect("VERIFY immediately or your account will be BLOCKED");
        assert_eq!(flags, vec!["immediately", "blocked", "verify"]);
    }

    #[test]
    fn multi_word_phrases_match() {
        let flags = detect("This is a limited time offer, last chance!");
        assert!(flags.contains(&"limited time"));
        assert!(flags.contains(&"last chance"));
    }

    #[test]
    fn no_duplicate_flags_for_repeated_words() {
        assert_eq!(detect("urgent urgent URGENT"), vec!["urgent"]);
    }
}

//! obs.rs — Logging helpers.
//!
//! Scammer message text is sensitive conversation content; log lines carry a
//! short content hash instead of the raw text.

/// Short, stable hex id for a piece of text (first 6 bytes of SHA-256).
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_short_stable_and_content_sensitive() {
        let a = anon_hash("share your otp");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("share your otp"));
        assert_ne!(a, anon_hash("share your pin"));
    }
}

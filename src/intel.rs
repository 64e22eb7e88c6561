//! intel.rs — The `IntelligenceRecord` wire type and its set-union merge.
//!
//! The record is the contract with the report consumer: six fixed camelCase
//! keys, each an array of unique strings. Category sets only ever grow for a
//! given session; nothing is removed or re-normalized after insertion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Extracted artifacts, keyed by the six fixed intelligence categories.
///
/// `BTreeSet` keeps serialization deterministic (sorted arrays) and makes
/// the merge a plain per-key union.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntelligenceRecord {
    pub phone_numbers: BTreeSet<String>,
    pub bank_accounts: BTreeSet<String>,
    pub upi_ids: BTreeSet<String>,
    pub phishing_links: BTreeSet<String>,
    pub email_addresses: BTreeSet<String>,
    pub case_ids: BTreeSet<String>,
}

impl IntelligenceRecord {
    /// Union `other` into `self`, category by category.
    pub fn merge_from(&mut self, other: &IntelligenceRecord) {
        self.phone_numbers.extend(other.phone_numbers.iter().cloned());
        self.bank_accounts.extend(other.bank_accounts.iter().cloned());
        self.upi_ids.extend(other.upi_ids.iter().cloned());
        self.phishing_links.extend(other.phishing_links.iter().cloned());
        self.email_addresses
            .extend(other.email_addresses.iter().cloned());
        self.case_ids.extend(other.case_ids.iter().cloned());
    }

    /// Pure combinator form of the merge. Commutative, associative,
    /// idempotent; the empty record is the identity.
    pub fn merged(a: &IntelligenceRecord, b: &IntelligenceRecord) -> IntelligenceRecord {
        let mut out = a.clone();
        out.merge_from(b);
        out
    }

    /// Total number of artifacts across all six categories.
    pub fn total_count(&self) -> usize {
        self.phone_numbers.len()
            + self.bank_accounts.len()
            + self.upi_ids.len()
            + self.phishing_links.len()
            + self.email_addresses.len()
            + self.case_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(phones: &[&str], upis: &[&str]) -> IntelligenceRecord {
        let mut r = IntelligenceRecord::default();
        r.phone_numbers = phones.iter().map(|s| s.to_string()).collect();
        r.upi_ids = upis.iter().map(|s| s.to_string()).collect();
        r
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let x = record(&["9876543210"], &["merchant@paytm"]);
        assert_eq!(IntelligenceRecord::merged(&x, &IntelligenceRecord::default()), x);
        assert_eq!(IntelligenceRecord::merged(&IntelligenceRecord::default(), &x), x);
    }

    #[test]
    fn merge_is_idempotent_and_commutative() {
        let a = record(&["9876543210"], &[]);
        let b = record(&["9123456780"], &["fraud@okaxis"]);

        assert_eq!(IntelligenceRecord::merged(&a, &a), a);
        assert_eq!(
            IntelligenceRecord::merged(&a, &b),
            IntelligenceRecord::merged(&b, &a)
        );

        let ab = IntelligenceRecord::merged(&a, &b);
        assert_eq!(ab.phone_numbers.len(), 2);
        assert_eq!(ab.upi_ids.len(), 1);
    }

    #[test]
    fn serializes_under_the_six_wire_keys() {
        let v = serde_json::to_value(record(&["9876543210"], &[])).unwrap();
        for key in [
            "phoneNumbers",
            "bankAccounts",
            "upiIds",
            "phishingLinks",
            "emailAddresses",
            "caseIds",
        ] {
            assert!(v.get(key).is_some(), "missing wire key {key}");
        }
        assert_eq!(v["phoneNumbers"], serde_json::json!(["9876543210"]));
    }

    #[test]
    fn missing_keys_deserialize_as_empty_sets() {
        let r: IntelligenceRecord = serde_json::from_str(r#"{"upiIds":["a@ybl"]}"#).unwrap();
        assert_eq!(r.upi_ids.len(), 1);
        assert!(r.phone_numbers.is_empty());
        assert!(r.case_ids.is_empty());
    }
}

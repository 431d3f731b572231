use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single waitlist registration, stored under `ref_<ref_code>`.
///
/// Entries are written once on first signup and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub email: String,
    pub ref_code: String,
    pub referred_by: Option<String>,
    pub position: u64,
    pub created_at: DateTime<Utc>,
}

impl WaitlistEntry {
    pub fn new(
        email: impl Into<String>,
        ref_code: impl Into<String>,
        referred_by: Option<String>,
        position: u64,
    ) -> Self {
        Self {
            email: email.into(),
            ref_code: ref_code.into(),
            referred_by,
            position,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_fields() {
        let entry = WaitlistEntry::new("a@b.com", "ABCD2345", Some("ZZZZ9999".into()), 3);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["refCode"], "ABCD2345");
        assert_eq!(json["referredBy"], "ZZZZ9999");
        assert_eq!(json["position"], 3);
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn missing_referrer_serializes_as_null() {
        let entry = WaitlistEntry::new("a@b.com", "ABCD2345", None, 1);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json["referredBy"].is_null());
    }

    #[test]
    fn reads_records_written_by_older_deployments() {
        let raw = serde_json::json!({
            "email": "x@y.com",
            "refCode": "K7M2P9QA",
            "referredBy": null,
            "position": 12,
            "createdAt": "2025-01-15T10:30:00.000Z"
        });

        let entry: WaitlistEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.position, 12);
        assert_eq!(entry.ref_code, "K7M2P9QA");
        assert_eq!(entry.referred_by, None);
    }
}

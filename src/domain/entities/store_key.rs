//! Logical key layout shared by every store backend.
//!
//! - `counter` holds the total signup count
//! - `ref_<code>` holds a [`WaitlistEntry`](super::waitlist_entry::WaitlistEntry)
//! - `email_<hash>` maps a normalized email to its referral code
//! - `email_<sanitized>` is the same index as written by earlier deployments;
//!   it is read but never written
//! - `referrals_<code>` holds the number of signups referred by `<code>`

use sha2::{Digest, Sha256};

pub const COUNTER_KEY: &str = "counter";

const MAX_KEY_SEGMENT_LEN: usize = 64;

pub fn ref_key(ref_code: &str) -> String {
    format!("ref_{ref_code}")
}

/// Email index key. The email is hashed so the key stays one-to-one with the
/// address while only using characters every backend accepts.
pub fn email_key(normalized_email: &str) -> String {
    let digest = Sha256::digest(normalized_email.as_bytes());
    format!("email_{}", hex::encode(digest))
}

/// Email index key used by earlier deployments: every character outside
/// `[a-z0-9]` becomes `_`, one per UTF-16 unit. Not one-to-one, so callers
/// must compare the stored entry's email before trusting a hit.
pub fn legacy_email_key(normalized_email: &str) -> String {
    let mut key = String::from("email_");
    for c in normalized_email.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            key.push(c);
        } else {
            key.extend(std::iter::repeat_n('_', c.len_utf16()));
        }
    }
    key
}

pub fn referrals_key(ref_code: &str) -> String {
    format!("referrals_{ref_code}")
}

/// Whether `segment` can be embedded in a key as-is.
/// Allowed: 1-64 ASCII letters, digits, `_` or `-`.
pub fn is_key_safe(segment: &str) -> bool {
    !segment.is_empty()
        && segment.len() <= MAX_KEY_SEGMENT_LEN
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

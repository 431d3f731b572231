use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ref_code::{RefCodeStyle, generate_ref_code},
        validators::{is_valid_email, normalize_email, normalize_referrer},
    },
    domain::entities::{
        store_key::{
            COUNTER_KEY, email_key, is_key_safe, legacy_email_key, ref_key, referrals_key,
        },
        waitlist_entry::WaitlistEntry,
        write_item::WriteItem,
    },
};

pub const DEFAULT_REF_CODE_ATTEMPTS: u32 = 5;

// ============================================================================
// Store Trait
// ============================================================================

/// Key-value backend holding entries, the email index and the counters.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Returns the stored JSON value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> AppResult<Option<Value>>;

    /// Applies every item or none of them.
    async fn batch_write(&self, items: &[WriteItem]) -> AppResult<()>;
}

// ============================================================================
// Result Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub position: u64,
    pub ref_code: String,
    pub total: u64,
    /// True when the email was already registered and nothing was written.
    pub already_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralStatus {
    pub position: u64,
    pub total: u64,
    pub ref_code: String,
    pub referral_count: u64,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct WaitlistUseCases {
    store: Arc<dyn WaitlistStore>,
    ref_code_style: RefCodeStyle,
    max_ref_code_attempts: u32,
    /// Single-writer gate. Every new-signup transaction (index check, counter
    /// read, code allocation, batch write) runs while holding it.
    writer: Arc<Mutex<()>>,
}

impl WaitlistUseCases {
    pub fn new(
        store: Arc<dyn WaitlistStore>,
        ref_code_style: RefCodeStyle,
        max_ref_code_attempts: u32,
    ) -> Self {
        Self {
            store,
            ref_code_style,
            max_ref_code_attempts: max_ref_code_attempts.max(1),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Registers `email`, or returns the existing registration unchanged.
    #[instrument(skip(self))]
    pub async fn signup(&self, email: &str, referrer: Option<&str>) -> AppResult<SignupOutcome> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AppError::InvalidEmail);
        }
        let referrer = normalize_referrer(referrer);

        // Duplicates never need the gate.
        if let Some(existing) = self.existing_signup(&email).await? {
            return Ok(existing);
        }

        let _gate = self.writer.lock().await;

        // Another request may have registered this email while we waited.
        if let Some(existing) = self.existing_signup(&email).await? {
            return Ok(existing);
        }

        let current = get_count(self.store.as_ref(), COUNTER_KEY).await?;
        let position = current + 1;
        let ref_code = self.allocate_ref_code().await?;

        let entry = WaitlistEntry::new(email.as_str(), ref_code.as_str(), referrer.clone(), position);
        let entry_value =
            serde_json::to_value(&entry).map_err(|e| AppError::Internal(e.to_string()))?;

        let mut items = vec![
            WriteItem::upsert(COUNTER_KEY, position),
            WriteItem::upsert(ref_key(&ref_code), entry_value),
            WriteItem::upsert(email_key(&email), ref_code.as_str()),
        ];

        if let Some(referrer) = referrer.as_deref() {
            if is_key_safe(referrer) {
                let key = referrals_key(referrer);
                let referrals = get_count(self.store.as_ref(), &key).await?;
                items.push(WriteItem::upsert(key, referrals + 1));
            } else {
                warn!(email = %email, referrer = %referrer, "Referrer code is not key-safe, not counted");
            }
        }

        if let Err(e) = self.store.batch_write(&items).await {
            error!(
                email = %email,
                ref_code = %ref_code,
                position,
                error = %e,
                "Waitlist signup batch write failed"
            );
            return Err(e);
        }

        info!(
            email = %email,
            ref_code = %ref_code,
            referred_by = ?referrer,
            position,
            "New waitlist signup"
        );

        Ok(SignupOutcome {
            position,
            ref_code,
            total: position,
            already_exists: false,
        })
    }

    #[instrument(skip(self))]
    pub async fn lookup_by_ref_code(&self, ref_code: &str) -> AppResult<ReferralStatus> {
        if !is_key_safe(ref_code) {
            return Err(AppError::RefCodeNotFound);
        }

        let entry = get_entry(self.store.as_ref(), &ref_key(ref_code))
            .await?
            .ok_or(AppError::RefCodeNotFound)?;

        let total = get_count(self.store.as_ref(), COUNTER_KEY).await?;
        let referral_count = get_count(self.store.as_ref(), &referrals_key(ref_code)).await?;

        Ok(ReferralStatus {
            position: entry.position,
            total,
            ref_code: entry.ref_code,
            referral_count,
        })
    }

    pub async fn total_count(&self) -> AppResult<u64> {
        get_count(self.store.as_ref(), COUNTER_KEY).await
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn existing_signup(&self, email: &str) -> AppResult<Option<SignupOutcome>> {
        let entry = match get_string(self.store.as_ref(), &email_key(email)).await? {
            Some(ref_code) => get_entry(self.store.as_ref(), &ref_key(&ref_code))
                .await?
                .ok_or_else(|| {
                    AppError::Store(format!("email index points at missing entry {ref_code}"))
                })?,
            None => match self.legacy_signup(email).await? {
                Some(entry) => entry,
                None => return Ok(None),
            },
        };
        let total = get_count(self.store.as_ref(), COUNTER_KEY).await?;

        Ok(Some(SignupOutcome {
            position: entry.position,
            ref_code: entry.ref_code,
            total,
            already_exists: true,
        }))
    }

    /// Entry registered under the sanitized index key of earlier deployments.
    /// Distinct emails can share that key, so the entry's email must match.
    async fn legacy_signup(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let Some(ref_code) = get_string(self.store.as_ref(), &legacy_email_key(email)).await?
        else {
            return Ok(None);
        };
        if !is_key_safe(&ref_code) {
            return Ok(None);
        }

        match get_entry(self.store.as_ref(), &ref_key(&ref_code)).await? {
            Some(entry) if normalize_email(&entry.email) == email => Ok(Some(entry)),
            _ => Ok(None),
        }
    }

    /// Generates codes until one is unused. Must be called under the writer gate.
    async fn allocate_ref_code(&self) -> AppResult<String> {
        for attempt in 1..=self.max_ref_code_attempts {
            let code = generate_ref_code(self.ref_code_style);
            if self.store.get(&ref_key(&code)).await?.is_none() {
                return Ok(code);
            }
            warn!(attempt, ref_code = %code, "Referral code collision, regenerating");
        }

        Err(AppError::Internal(format!(
            "no unused referral code after {} attempts",
            self.max_ref_code_attempts
        )))
    }
}

// ============================================================================
// Typed Reads
// ============================================================================

/// Reads a non-negative counter. Absent and `null` both read as zero.
pub async fn get_count(store: &dyn WaitlistStore, key: &str) -> AppResult<u64> {
    match store.get(key).await? {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| AppError::Store(format!("expected a count at {key}, found {value}"))),
    }
}

pub async fn get_string(store: &dyn WaitlistStore, key: &str) -> AppResult<Option<String>> {
    match store.get(key).await? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(value) => Err(AppError::Store(format!(
            "expected a string at {key}, found {value}"
        ))),
    }
}

pub async fn get_entry(store: &dyn WaitlistStore, key: &str) -> AppResult<Option<WaitlistEntry>> {
    match store.get(key).await? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

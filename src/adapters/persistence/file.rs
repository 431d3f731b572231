//! Flat-file store: the whole key space lives in one JSON object on disk.
//!
//! Every batch is applied to a copy of the map, written to a sibling temp
//! file and renamed over the original, so a failed write leaves both the file
//! and the in-memory view untouched.

use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ref_code::{RefCodeStyle, generate_ref_code},
        validators::{is_valid_email, normalize_email},
    },
    domain::entities::{
        store_key::{COUNTER_KEY, email_key, ref_key},
        waitlist_entry::WaitlistEntry,
        write_item::WriteItem,
    },
    use_cases::waitlist::WaitlistStore,
};

pub struct FileWaitlistStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Value>>,
}

impl FileWaitlistStore {
    /// Loads `path`, starting empty if it does not exist yet.
    ///
    /// Files in the old format (a bare JSON array of email strings) are
    /// migrated to the keyed layout here and written back before returning.
    pub async fn open(path: impl Into<PathBuf>, ref_code_style: RefCodeStyle) -> AppResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        let values = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => {
                let parsed: Value = serde_json::from_str(&raw).map_err(|e| {
                    AppError::Store(format!("{} is not valid JSON: {e}", path.display()))
                })?;
                match parsed {
                    Value::Object(map) => map.into_iter().collect(),
                    Value::Array(legacy) => {
                        let legacy_len = legacy.len();
                        let migrated = migrate_legacy_list(legacy, ref_code_style)?;
                        write_atomically(&path, &migrated).await?;
                        info!(
                            path = %path.display(),
                            legacy_items = legacy_len,
                            signups = ?migrated.get(COUNTER_KEY),
                            "Migrated legacy waitlist file"
                        );
                        migrated
                    }
                    other => {
                        return Err(AppError::Store(format!(
                            "{} holds unsupported JSON: expected an object, found {}",
                            path.display(),
                            json_kind(&other)
                        )));
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(io_error(&path, e)),
        };

        info!(path = %path.display(), keys = values.len(), "Opened waitlist file store");

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }
}

#[async_trait]
impl WaitlistStore for FileWaitlistStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn batch_write(&self, items: &[WriteItem]) -> AppResult<()> {
        let mut values = self.values.write().await;

        let mut next = values.clone();
        for item in items {
            next.insert(item.key.clone(), item.value.clone());
        }

        write_atomically(&self.path, &next).await?;
        *values = next;
        Ok(())
    }
}

// ============================================================================
// Legacy Migration
// ============================================================================

/// Converts the old `["a@b.com", ...]` format into keyed entries. Positions
/// follow array order; invalid and repeated emails are dropped.
fn migrate_legacy_list(
    legacy: Vec<Value>,
    ref_code_style: RefCodeStyle,
) -> AppResult<BTreeMap<String, Value>> {
    let mut values = BTreeMap::new();
    let mut seen = HashSet::new();
    let mut position = 0u64;

    for raw in legacy {
        let Some(email) = raw.as_str().map(normalize_email) else {
            warn!(value = %raw, "Skipping non-string legacy waitlist item");
            continue;
        };
        if !is_valid_email(&email) || !seen.insert(email.clone()) {
            warn!(email = %email, "Skipping invalid or repeated legacy waitlist email");
            continue;
        }

        position += 1;
        let ref_code = loop {
            let candidate = generate_ref_code(ref_code_style);
            if !values.contains_key(&ref_key(&candidate)) {
                break candidate;
            }
        };

        let entry = WaitlistEntry::new(email.as_str(), ref_code.as_str(), None, position);
        let entry_value =
            serde_json::to_value(&entry).map_err(|e| AppError::Internal(e.to_string()))?;
        values.insert(ref_key(&ref_code), entry_value);
        values.insert(email_key(&email), Value::String(ref_code));
    }

    values.insert(COUNTER_KEY.to_string(), Value::from(position));
    Ok(values)
}

// ============================================================================
// Helpers
// ============================================================================

async fn write_atomically(path: &Path, values: &BTreeMap<String, Value>) -> AppResult<()> {
    let body = serde_json::to_vec_pretty(values).map_err(|e| AppError::Internal(e.to_string()))?;
    let tmp = tmp_path(path);

    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(|e| io_error(&tmp, e))?;
    file.write_all(&body).await.map_err(|e| io_error(&tmp, e))?;
    file.sync_all().await.map_err(|e| io_error(&tmp, e))?;
    drop(file);

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error(path, e))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, e: std::io::Error) -> AppError {
    AppError::Store(format!("{}: {e}", path.display()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOperation {
    Upsert,
}

/// One key write inside a batch. Serializes in the shape the remote
/// config API expects: `{"operation":"upsert","key":..,"value":..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteItem {
    pub operation: WriteOperation,
    pub key: String,
    pub value: Value,
}

impl WriteItem {
    pub fn upsert(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            operation: WriteOperation::Upsert,
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_wire_shape() {
        let item = WriteItem::upsert("counter", 7);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "operation": "upsert", "key": "counter", "value": 7 })
        );
    }
}

use crate::shared::number::value_as_i64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend primary key (auto-increment integer)
pub type RecordId = i64;

/// Read a record id from a loosely typed value (`7` or `"7"`)
pub fn record_id_from_value(value: Option<&Value>) -> Option<RecordId> {
    value_as_i64(value)
}

/// Body answered by create/update endpoints; only the id matters to the forms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedRecord {
    #[serde(default, deserialize_with = "lenient_optional_id")]
    pub id: Option<RecordId>,
}

/// Serde helper: accept `7` or `"7"` for a required id column
pub fn lenient_record_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    record_id_from_value(value.as_ref())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid record id: {:?}", value)))
}

/// Serde helper: like [`lenient_record_id`], unusable ids become `None`
pub fn lenient_optional_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(record_id_from_value(value.as_ref()))
}

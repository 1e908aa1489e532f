//! Domain DTOs for the case API.
//!
//! # Design
//! `Entity` is the `_id` / `_type` prefix every stored record carries; it is
//! flattened into `Case` rather than wrapped. Fields the server fills in only
//! when applicable are `Option` and skipped on output, so they stay absent
//! instead of turning into `null`.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Common prefix of every stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_type", default)]
    pub kind: String,
}

/// A custom field value. At most one of `string` / `order` is meaningful.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(rename = "int", default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// A case as returned by the API. Timestamps are epoch milliseconds.
///
/// Every field tolerates being omitted, and collections also accept `null`,
/// so one sparse record cannot fail a whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(default)]
    pub artifact_count: u64,
    #[serde(default)]
    pub case_id: u64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: HashMap<String, CustomField>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
    #[serde(default)]
    pub flag: bool,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ioc_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_status: Option<String>,
    #[serde(default)]
    pub severity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_artifact_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_ioc_count: Option<u64>,
    #[serde(default)]
    pub start_date: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub tlp: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub updated_by: String,
}

/// Decode `null` as the type's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A task nested in a `SendableCase`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendableTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// The client-suppliable subset of a case, used when creating one.
///
/// Identifiers, timestamps and counters are assigned by the server and have
/// no counterpart here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendableCase {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tlp: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<SendableTask>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_fields: HashMap<String, serde_json::Value>,
}

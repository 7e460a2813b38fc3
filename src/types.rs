//! Core data types shared by the registry, the handoff channel and the fragment decoder.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// A mapping from trait to the implementors one fragment contributes for it.
///
/// Both the trait keys and each record list keep insertion order.
pub type Batch = IndexMap<TraitId, Vec<ImplementorRecord>>;

/// Fully-qualified trait name, used as the registry key.
///
/// Treated as opaque: no normalization or validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitId(String);

impl TraitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TraitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TraitId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TraitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One `impl` block shown in a trait's "Implementors" panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementorRecord {
    /// Formatted `impl` signature. May contain markup; never parsed here.
    pub display_text: String,
    /// Auto or blanket impl produced by the toolchain rather than written by hand.
    pub is_synthetic: bool,
    /// Canonical path of the implementing type.
    pub type_path: String,
    /// Crate whose documentation contributed the impl. Empty when unknown.
    pub crate_name: String,
}

impl ImplementorRecord {
    pub fn new(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            ..Self::default()
        }
    }

    pub fn synthetic(mut self, is_synthetic: bool) -> Self {
        self.is_synthetic = is_synthetic;
        self
    }

    pub fn with_type_path(mut self, type_path: impl Into<String>) -> Self {
        self.type_path = type_path.into();
        self
    }

    pub fn with_crate_name(mut self, crate_name: impl Into<String>) -> Self {
        self.crate_name = crate_name.into();
        self
    }

    /// Decode a record without ever failing.
    ///
    /// Accepts both the camelCase field names and the short names emitted by the
    /// documentation generator (`text`, `synthetic`, `types`). Missing or
    /// wrong-typed fields fall back to their defaults.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            tracing::warn!("Implementor record is not an object, using defaults");
            return Self::default();
        };

        let display_text = fields
            .get("displayText")
            .or_else(|| fields.get("text"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let is_synthetic = fields
            .get("isSynthetic")
            .or_else(|| fields.get("synthetic"))
            .and_then(Value::as_bool)
            .unwrap_or_default();

        let type_path = match fields.get("typePath") {
            Some(Value::String(path)) => path.clone(),
            _ => fields
                .get("types")
                .and_then(Value::as_array)
                .and_then(|types| types.iter().find_map(Value::as_str))
                .unwrap_or_default()
                .to_string(),
        };

        let crate_name = fields
            .get("crateName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if display_text.is_empty() {
            tracing::debug!(type_path = %type_path, "Implementor record has no display text");
        }

        Self {
            display_text,
            is_synthetic,
            type_path,
            crate_name,
        }
    }
}

impl<'de> Deserialize<'de> for ImplementorRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Build a batch from a decoded JSON object.
///
/// A trait whose value is not an array contributes an empty list rather than
/// dropping the whole batch. Returns `None` if `value` is not an object.
pub fn batch_from_value(value: &Value) -> Option<Batch> {
    let entries = value.as_object()?;

    let batch = entries
        .iter()
        .map(|(trait_id, records)| {
            (
                TraitId::new(trait_id.as_str()),
                records_from_value(trait_id, records),
            )
        })
        .collect();

    Some(batch)
}

pub(crate) fn records_from_value(trait_id: &str, records: &Value) -> Vec<ImplementorRecord> {
    match records.as_array() {
        Some(records) => records.iter().map(ImplementorRecord::from_value).collect(),
        None => {
            tracing::warn!(trait_id, "Implementor list is not an array, treating as empty");
            Vec::new()
        }
    }
}

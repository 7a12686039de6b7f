//! # Attribute Merge
//!
//! Partial updates to one block's variant fields.
//!
//! A delta names fields by their wire name and carries JSON values. Merging
//! overlays the delta onto the block's current fields and decodes the result
//! back into the same variant, so:
//! - fields not named in the delta are untouched
//! - `id`, `order` and `type` never change
//! - `null` clears an optional field (and is rejected for a required one)
//! - the merged fields must pass the same range checks as validation
//! - any failure leaves the original block as it was

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ast::{BlockKind, BlockType, ContentBlock, BASE_FIELDS};
use crate::error::{MergeError, ValidationError};
use crate::path::BlockPath;
use crate::validate::check_kind;

/// Field overrides for one block, keyed by wire field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeDelta {
    fields: BTreeMap<String, Value>,
}

impl AttributeDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Snapshot the current values of `fields` on `block`; absent fields are
    /// recorded as `null` so merging the snapshot restores them exactly.
    pub fn capture<'a>(block: &ContentBlock, fields: impl IntoIterator<Item = &'a str>) -> Self {
        let current = kind_fields(&block.kind);
        let mut delta = Self::new();
        for field in fields {
            let value = current.get(field).cloned().unwrap_or(Value::Null);
            delta.insert(field, value);
        }
        delta
    }
}

impl ContentBlock {
    /// Current wire value of one variant field, `None` when absent
    pub fn attribute(&self, field: &str) -> Option<Value> {
        if !self.block_type().has_field(field) {
            return None;
        }
        kind_fields(&self.kind).remove(field)
    }

    /// Merge `delta` in place; on error `self` is unchanged
    pub fn merge_attributes(&mut self, delta: &AttributeDelta) -> Result<(), MergeError> {
        let merged = merge_attributes(self, delta)?;
        self.kind = merged.kind;
        Ok(())
    }
}

/// Apply `delta` to a copy of `block` and return the updated copy
pub fn merge_attributes(block: &ContentBlock, delta: &AttributeDelta) -> Result<ContentBlock, MergeError> {
    let block_type = block.block_type();
    check_fields(block_type, delta)?;

    let mut fields = kind_fields(&block.kind);
    for (field, value) in delta.iter() {
        overlay(&mut fields, field, value);
    }

    let kind = decode(fields).map_err(|err| blame(block, delta, err))?;
    check_kind(&kind, &BlockPath::root()).map_err(|err| out_of_range(delta, err))?;
    tracing::debug!(block_id = %block.id, fields = delta.len(), "merged attributes");

    Ok(ContentBlock {
        id: block.id.clone(),
        order: block.order,
        kind,
    })
}

fn check_fields(block_type: BlockType, delta: &AttributeDelta) -> Result<(), MergeError> {
    for field in delta.field_names() {
        if BASE_FIELDS.contains(&field) || block_type.immutable_fields().contains(&field) {
            return Err(MergeError::ImmutableField {
                field: field.to_string(),
            });
        }
        if !block_type.has_field(field) {
            return Err(MergeError::TypeMismatch {
                block_type,
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

fn kind_fields(kind: &BlockKind) -> Map<String, Value> {
    match serde_json::to_value(kind) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn overlay(fields: &mut Map<String, Value>, field: &str, value: &Value) {
    if value.is_null() {
        fields.remove(field);
    } else {
        fields.insert(field.to_string(), value.clone());
    }
}

fn decode(fields: Map<String, Value>) -> Result<BlockKind, serde_json::Error> {
    serde_json::from_value(Value::Object(fields))
}

/// Attribute a decode failure to the first delta field that fails on its own
fn blame(block: &ContentBlock, delta: &AttributeDelta, err: serde_json::Error) -> MergeError {
    let base = kind_fields(&block.kind);
    for (field, value) in delta.iter() {
        let mut single = base.clone();
        overlay(&mut single, field, value);
        if let Err(field_err) = decode(single) {
            return MergeError::InvalidValue {
                field: field.to_string(),
                reason: field_err.to_string(),
            };
        }
    }
    MergeError::InvalidValue {
        field: delta.field_names().collect::<Vec<_>>().join(", "),
        reason: err.to_string(),
    }
}

fn out_of_range(delta: &AttributeDelta, err: ValidationError) -> MergeError {
    match err {
        ValidationError::InvalidField { field, reason, .. } => MergeError::InvalidValue { field, reason },
        other => MergeError::InvalidValue {
            field: delta.field_names().collect::<Vec<_>>().join(", "),
            reason: other.to_string(),
        },
    }
}

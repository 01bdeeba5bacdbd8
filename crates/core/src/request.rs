//! Inbound event payload and the validated provisioning request built from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_EMBEDDING_DIMENSION, HNSW_MAX_DIMENSION, ProvisionError};

/// Raw invocation event as delivered by the caller.
///
/// Every field is optional here so that an absent key surfaces as a
/// [`ProvisionError::MissingField`] naming it, instead of an opaque parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisioningEvent {
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default, rename = "table_Schema")]
    pub table_schema: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub dimensional_embedding: Option<i64>,
}

impl ProvisioningEvent {
    /// Parse an event from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProvisionError> {
        serde_json::from_value(value).map_err(|e| ProvisionError::InvalidPayload(e.to_string()))
    }

    /// Parse an event from raw JSON text.
    pub fn from_json(raw: &str) -> Result<Self, ProvisionError> {
        serde_json::from_str(raw).map_err(|e| ProvisionError::InvalidPayload(e.to_string()))
    }
}

/// Column names of the provisioned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFields {
    pub primary_key_field: String,
    pub vector_field: String,
    pub text_field: String,
    pub metadata_field: String,
}

impl TableFields {
    pub const PRIMARY_KEY: &'static str = "primary_key_field";
    pub const VECTOR: &'static str = "vector_field";
    pub const TEXT: &'static str = "text_field";
    pub const METADATA: &'static str = "metadata_field";

    /// Build from a `table_Schema` mapping, requiring all four keys.
    pub fn from_mapping(
        mapping: &BTreeMap<String, serde_json::Value>,
    ) -> Result<Self, ProvisionError> {
        Ok(Self {
            primary_key_field: required_key(mapping, Self::PRIMARY_KEY)?,
            vector_field: required_key(mapping, Self::VECTOR)?,
            text_field: required_key(mapping, Self::TEXT)?,
            metadata_field: required_key(mapping, Self::METADATA)?,
        })
    }
}

fn required_key(
    mapping: &BTreeMap<String, serde_json::Value>,
    key: &'static str,
) -> Result<String, ProvisionError> {
    match mapping.get(key) {
        None | Some(serde_json::Value::Null) => Err(ProvisionError::MissingField(key)),
        Some(serde_json::Value::String(s)) => non_blank(s, key),
        Some(other) => Err(ProvisionError::InvalidPayload(format!(
            "table_Schema.{key} must be a string, got {other}"
        ))),
    }
}

fn non_blank(value: &str, key: &'static str) -> Result<String, ProvisionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProvisionError::MissingField(key));
    }
    Ok(trimmed.to_owned())
}

/// Validated provisioning parameters for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub schema_name: String,
    pub table_name: String,
    pub fields: TableFields,
    pub dimension: u32,
}

impl ProvisioningRequest {
    pub fn new(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        fields: TableFields,
        dimension: u32,
    ) -> Result<Self, ProvisionError> {
        let dimension = validate_dimension(i64::from(dimension))?;
        let schema_name = non_blank(&schema_name.into(), "schema_name")?;
        let table_name = non_blank(&table_name.into(), "table_name")?;
        Ok(Self { schema_name, table_name, fields, dimension })
    }
}

impl TryFrom<ProvisioningEvent> for ProvisioningRequest {
    type Error = ProvisionError;

    fn try_from(event: ProvisioningEvent) -> Result<Self, Self::Error> {
        let schema_name = event.schema_name.ok_or(ProvisionError::MissingField("schema_name"))?;
        let table_name = event.table_name.ok_or(ProvisionError::MissingField("table_name"))?;
        let mapping = event.table_schema.ok_or(ProvisionError::MissingField("table_Schema"))?;
        let fields = TableFields::from_mapping(&mapping)?;
        let dimension = match event.dimensional_embedding {
            Some(d) => validate_dimension(d)?,
            None => DEFAULT_EMBEDDING_DIMENSION,
        };
        Self::new(schema_name, table_name, fields, dimension)
    }
}

fn validate_dimension(raw: i64) -> Result<u32, ProvisionError> {
    u32::try_from(raw)
        .ok()
        .filter(|d| (1..=HNSW_MAX_DIMENSION).contains(d))
        .ok_or(ProvisionError::InvalidDimension(raw))
}

//! DDL generation for a pgvector-backed table.
//!
//! Identifiers are interpolated verbatim: callers must only pass trusted,
//! already-validated names. Every statement is idempotent so a repeated
//! invocation against a provisioned database is a no-op.

use std::fmt;

use serde::Serialize;

use crate::{HNSW_EF_CONSTRUCTION, ProvisioningRequest};

/// What a statement creates. Also fixes the execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Extension,
    Schema,
    Table,
    Index,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Schema => "schema",
            Self::Table => "table",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One DDL statement ready to be sent to the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlStatement {
    pub kind: StatementKind,
    pub sql: String,
}

impl SqlStatement {
    fn new(kind: StatementKind, sql: String) -> Self {
        Self { kind, sql }
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Name of the HNSW index created on `table.vector_field`.
///
/// PostgreSQL places it in the table's schema, so it must not be qualified.
pub fn index_name(table_name: &str, vector_field: &str) -> String {
    format!("{table_name}_{vector_field}_hnsw_idx")
}

/// Build the provisioning statements in execution order:
/// extension, schema, table, index.
pub fn build_statements(request: &ProvisioningRequest) -> Vec<SqlStatement> {
    let ProvisioningRequest { schema_name, table_name, fields, dimension } = request;
    let qualified = format!("{schema_name}.{table_name}");

    vec![
        SqlStatement::new(
            StatementKind::Extension,
            "CREATE EXTENSION IF NOT EXISTS vector;".to_owned(),
        ),
        SqlStatement::new(
            StatementKind::Schema,
            format!("CREATE SCHEMA IF NOT EXISTS {schema_name};"),
        ),
        SqlStatement::new(
            StatementKind::Table,
            format!(
                "CREATE TABLE IF NOT EXISTS {qualified} (\n    \
                 {pk} uuid PRIMARY KEY,\n    \
                 {vector} vector({dimension}),\n    \
                 {text} text,\n    \
                 {meta} json\n);",
                pk = fields.primary_key_field,
                vector = fields.vector_field,
                text = fields.text_field,
                meta = fields.metadata_field,
            ),
        ),
        SqlStatement::new(
            StatementKind::Index,
            format!(
                "CREATE INDEX IF NOT EXISTS {index} ON {qualified} \
                 USING hnsw ({vector} vector_cosine_ops) \
                 WITH (ef_construction = {HNSW_EF_CONSTRUCTION});",
                index = index_name(table_name, &fields.vector_field),
                vector = fields.vector_field,
            ),
        ),
    ]
}

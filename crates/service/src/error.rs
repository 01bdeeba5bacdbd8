//! Typed error enum for the invocation boundary.
//!
//! Unifies request validation, connection and statement failures so the
//! handler can turn any of them into a failure envelope.

use pgvec_provision_core::{ProvisionError, StatementKind};
use pgvec_provision_storage::{ExecutionError, StatementFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvocationError {
    /// Event payload was rejected before any statement was built.
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// The executor could not be opened.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// A statement failed; earlier statements stay applied.
    #[error("{}", failure.message)]
    Statement { failure: StatementFailure, applied: Vec<StatementKind> },
}

impl InvocationError {
    /// Whether any DDL reached the database before the failure.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Statement { applied, .. } if !applied.is_empty())
    }
}

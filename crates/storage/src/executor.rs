//! SQL execution capability.
//!
//! The runner only ever talks to the database through [`SqlExecutor`], so it
//! can be driven by an in-memory fake in tests.

use async_trait::async_trait;
use pgvec_provision_core::SqlStatement;
use serde::Serialize;

use crate::ExecutionError;

/// Acknowledgement returned by the endpoint for one executed statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub rows_affected: u64,
}

/// Executes one statement at a time against a remote SQL endpoint.
#[async_trait]
pub trait SqlExecutor: Send {
    /// Execute a single statement, committing it independently.
    async fn execute(&mut self, statement: &SqlStatement)
    -> Result<Acknowledgement, ExecutionError>;

    /// Release the connection once the run is over, successful or not.
    async fn close(self: Box<Self>) -> Result<(), ExecutionError> {
        Ok(())
    }
}

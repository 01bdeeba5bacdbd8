//! Sequential statement runner.
//!
//! Statements run strictly in order; statement N+1 is never sent before
//! statement N has been acknowledged. The first failure stops the run and
//! nothing already applied is undone.

use pgvec_provision_core::{SqlStatement, StatementKind};
use serde::Serialize;

use crate::{Acknowledgement, SqlExecutor};

/// A statement the endpoint acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementOutcome {
    pub index: usize,
    pub kind: StatementKind,
    pub acknowledgement: Acknowledgement,
}

/// The statement that stopped the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementFailure {
    pub index: usize,
    pub kind: StatementKind,
    pub message: String,
}

/// Aggregate result of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub succeeded: Vec<StatementOutcome>,
    pub failure: Option<StatementFailure>,
    /// Statements never attempted because of an earlier failure.
    pub skipped: usize,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn applied_kinds(&self) -> Vec<StatementKind> {
        self.succeeded.iter().map(|o| o.kind).collect()
    }
}

/// Run `statements` in order through `executor`, halting on the first error.
pub async fn run_statements<E>(executor: &mut E, statements: &[SqlStatement]) -> ExecutionReport
where
    E: SqlExecutor + ?Sized,
{
    let mut report = ExecutionReport::default();

    for (index, statement) in statements.iter().enumerate() {
        match executor.execute(statement).await {
            Ok(acknowledgement) => {
                tracing::info!(
                    index,
                    kind = %statement.kind,
                    rows_affected = acknowledgement.rows_affected,
                    sql = %statement,
                    "executed statement"
                );
                report.succeeded.push(StatementOutcome {
                    index,
                    kind: statement.kind,
                    acknowledgement,
                });
            },
            Err(err) => {
                report.skipped = statements.len() - index - 1;
                tracing::error!(
                    index,
                    kind = %statement.kind,
                    applied = ?report.applied_kinds(),
                    skipped = report.skipped,
                    sql = %statement,
                    "statement failed: {err}"
                );
                report.failure =
                    Some(StatementFailure { index, kind: statement.kind, message: err.to_string() });
                break;
            },
        }
    }

    report
}

//! Statement execution layer for pgvec-provision
//!
//! Runs provisioning DDL one statement at a time through a [`SqlExecutor`].
//! The PostgreSQL implementation lives behind the `postgres` feature.

mod error;
mod executor;
#[cfg(feature = "postgres")]
mod pg_executor;
mod runner;

pub use error::ExecutionError;
pub use executor::{Acknowledgement, SqlExecutor};
#[cfg(feature = "postgres")]
pub use pg_executor::{PgExecutor, connect_options};
pub use runner::{ExecutionReport, StatementFailure, StatementOutcome, run_statements};

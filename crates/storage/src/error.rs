//! Typed error enum for statement execution.
//!
//! The display text of every variant is what ends up in the invocation
//! envelope, so database variants print the server message unwrapped.

use std::time::Duration;

use thiserror::Error;

/// A statement could not be executed, or the endpoint could not be reached.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Connection to the database could not be established.
    #[cfg(feature = "postgres")]
    #[error("cannot connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("timed out connecting to database after {}s", .0.as_secs())]
    ConnectTimeout(Duration),

    /// The database rejected the statement (syntax, permission, I/O).
    #[cfg(feature = "postgres")]
    #[error("{}", database_message(.0))]
    Statement(#[source] sqlx::Error),

    /// Rejection reported by a non-sqlx endpoint.
    #[error("{0}")]
    Rejected(String),
}

#[cfg(feature = "postgres")]
fn database_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => format!("{} (SQLSTATE {code})", db_err.message()),
            None => db_err.message().to_owned(),
        },
        other => other.to_string(),
    }
}

//! PostgreSQL executor backed by a single sqlx connection.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use pgvec_provision_core::{DatabaseConfig, SqlStatement};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::{Acknowledgement, ExecutionError, SqlExecutor};

/// Build connect options from the resource url, the resolved secret and the
/// database name.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, ExecutionError> {
    let options = PgConnectOptions::from_str(&config.resource_url).map_err(ExecutionError::Connect)?;
    Ok(options
        .username(&config.credentials.username)
        .password(&config.credentials.password)
        .database(&config.database_name))
}

/// One dedicated connection per invocation. Statements run outside any
/// explicit transaction, so each one autocommits.
#[derive(Debug)]
pub struct PgExecutor {
    conn: PgConnection,
}

impl PgExecutor {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ExecutionError> {
        let options = connect_options(config)?;
        Self::connect_with(&options, config.connect_timeout).await
    }

    pub async fn connect_with(
        options: &PgConnectOptions,
        timeout: Duration,
    ) -> Result<Self, ExecutionError> {
        let conn = tokio::time::timeout(timeout, PgConnection::connect_with(options))
            .await
            .map_err(|_| ExecutionError::ConnectTimeout(timeout))?
            .map_err(ExecutionError::Connect)?;
        tracing::debug!(
            host = options.get_host(),
            database = options.get_database().unwrap_or_default(),
            "provisioning connection established"
        );
        Ok(Self { conn })
    }
}

#[async_trait]
impl SqlExecutor for PgExecutor {
    async fn execute(
        &mut self,
        statement: &SqlStatement,
    ) -> Result<Acknowledgement, ExecutionError> {
        // A bare &str without arguments goes over the simple query protocol.
        let result = sqlx::Executor::execute(&mut self.conn, statement.as_str())
            .await
            .map_err(ExecutionError::Statement)?;
        Ok(Acknowledgement { rows_affected: result.rows_affected() })
    }

    /// Send a graceful Terminate instead of dropping the socket.
    async fn close(self: Box<Self>) -> Result<(), ExecutionError> {
        self.conn.close().await.map_err(ExecutionError::Connect)
    }
}

use async_trait::async_trait;
use pgvec_provision_core::DatabaseConfig;
use pgvec_provision_storage::{ExecutionError, PgExecutor, SqlExecutor};

use crate::ExecutorFactory;

/// Opens one PostgreSQL connection per invocation from startup configuration.
#[derive(Debug, Clone)]
pub struct PgExecutorFactory {
    config: DatabaseConfig,
}

impl PgExecutorFactory {
    #[must_use]
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ExecutorFactory for PgExecutorFactory {
    async fn open(&self) -> Result<Box<dyn SqlExecutor>, ExecutionError> {
        let executor = PgExecutor::connect(&self.config).await?;
        Ok(Box::new(executor))
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use pgvec_provision_core::{
    build_statements, ProvisioningEvent, ProvisioningRequest, FAILURE_BODY_PREFIX, STATUS_ERROR,
    STATUS_OK, SUCCESS_BODY,
};
use pgvec_provision_storage::{run_statements, ExecutionError, ExecutionReport, SqlExecutor};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::InvocationError;

/// Opens a fresh executor for each invocation.
#[async_trait]
pub trait ExecutorFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn SqlExecutor>, ExecutionError>;
}

/// `{"statusCode": .., "body": ..}` envelope returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn success() -> Self {
        Self { status_code: STATUS_OK, body: SUCCESS_BODY.to_owned() }
    }

    pub fn failure(err: &InvocationError) -> Self {
        Self { status_code: STATUS_ERROR, body: format!("{FAILURE_BODY_PREFIX}: {err}") }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

pub struct ProvisioningService {
    executors: Arc<dyn ExecutorFactory>,
}

impl ProvisioningService {
    #[must_use]
    pub fn new(executors: Arc<dyn ExecutorFactory>) -> Self {
        Self { executors }
    }

    /// Build and run the provisioning statements for `request`.
    ///
    /// Returns the report only when every statement was applied.
    pub async fn provision(
        &self,
        request: &ProvisioningRequest,
    ) -> Result<ExecutionReport, InvocationError> {
        let statements = build_statements(request);
        let mut executor = self.executors.open().await?;
        let report = run_statements(executor.as_mut(), &statements).await;
        if let Err(e) = executor.close().await {
            tracing::warn!("closing provisioning connection failed: {e}");
        }

        if let Some(failure) = report.failure.clone() {
            return Err(InvocationError::Statement { failure, applied: report.applied_kinds() });
        }
        Ok(report)
    }

    /// Handle one raw invocation event. Never fails: every error becomes a
    /// 500 envelope.
    pub async fn invoke(&self, event: serde_json::Value) -> InvocationResponse {
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!("invocation", id = %invocation_id);

        async move {
            let result = match ProvisioningEvent::from_value(event)
                .and_then(ProvisioningRequest::try_from)
            {
                Ok(request) => {
                    tracing::info!(
                        schema = %request.schema_name,
                        table = %request.table_name,
                        dimension = request.dimension,
                        "provisioning vector table"
                    );
                    self.provision(&request).await
                },
                Err(e) => Err(e.into()),
            };

            match result {
                Ok(report) => {
                    tracing::info!(statements = report.succeeded.len(), "provisioning complete");
                    InvocationResponse::success()
                },
                Err(err) => {
                    if err.is_partial() {
                        tracing::warn!("provisioning stopped after partial progress: {err}");
                    } else {
                        tracing::warn!("provisioning failed: {err}");
                    }
                    InvocationResponse::failure(&err)
                },
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pgvec_provision_core::{SqlStatement, StatementKind};
    use pgvec_provision_storage::Acknowledgement;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct FakeDatabase {
        executed: Mutex<Vec<String>>,
        opened: Mutex<usize>,
        closed: Mutex<usize>,
        fail_at: Option<(usize, &'static str)>,
        refuse_connections: bool,
    }

    struct FakeExecutor {
        db: Arc<FakeDatabase>,
    }

    #[async_trait]
    impl SqlExecutor for FakeExecutor {
        async fn execute(
            &mut self,
            statement: &SqlStatement,
        ) -> Result<Acknowledgement, ExecutionError> {
            let mut executed = self.db.executed.lock().unwrap();
            let index = executed.len();
            if let Some((at, message)) = self.db.fail_at {
                if at == index {
                    return Err(ExecutionError::Rejected(message.to_owned()));
                }
            }
            executed.push(statement.sql.clone());
            Ok(Acknowledgement::default())
        }

        async fn close(self: Box<Self>) -> Result<(), ExecutionError> {
            *self.db.closed.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct FakeFactory(Arc<FakeDatabase>);

    #[async_trait]
    impl ExecutorFactory for FakeFactory {
        async fn open(&self) -> Result<Box<dyn SqlExecutor>, ExecutionError> {
            *self.0.opened.lock().unwrap() += 1;
            if self.0.refuse_connections {
                return Err(ExecutionError::Rejected("connection refused".to_owned()));
            }
            Ok(Box::new(FakeExecutor { db: Arc::clone(&self.0) }))
        }
    }

    fn service(db: FakeDatabase) -> (ProvisioningService, Arc<FakeDatabase>) {
        let db = Arc::new(db);
        (ProvisioningService::new(Arc::new(FakeFactory(Arc::clone(&db)))), db)
    }

    fn rag_event() -> serde_json::Value {
        json!({
            "schema_name": "rag",
            "table_name": "docs",
            "table_Schema": {
                "primary_key_field": "id",
                "vector_field": "embedding",
                "text_field": "content",
                "metadata_field": "meta"
            },
            "dimensional_embedding": 1024
        })
    }

    #[tokio::test]
    async fn test_all_success_returns_200() {
        let (service, db) = service(FakeDatabase::default());

        let response = service.invoke(rag_event()).await;

        assert_eq!(response, InvocationResponse::success());
        assert_eq!(response.body, "SQL commands executed successfully");
        assert_eq!(db.executed.lock().unwrap().len(), 4);
        assert_eq!(*db.closed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_table_failure_returns_500_with_message() {
        let (service, db) = service(FakeDatabase {
            fail_at: Some((2, "relation already exists with incompatible schema")),
            ..FakeDatabase::default()
        });

        let response = service.invoke(rag_event()).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body,
            "Error executing SQL commands: relation already exists with incompatible schema"
        );
        let executed = db.executed.lock().unwrap();
        assert_eq!(executed.len(), 2);
        assert!(!executed.iter().any(|sql| sql.starts_with("CREATE INDEX")));
        assert_eq!(*db.closed.lock().unwrap(), 1, "connection released after a failed statement");
    }

    #[tokio::test]
    async fn test_dimension_above_hnsw_limit_executes_nothing() {
        let (service, db) = service(FakeDatabase::default());
        let mut event = rag_event();
        event["dimensional_embedding"] = json!(4_096);

        let response = service.invoke(event).await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("4096"), "{}", response.body);
        assert_eq!(*db.opened.lock().unwrap(), 0);
        assert!(db.executed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_executes_nothing() {
        let (service, db) = service(FakeDatabase::default());
        let mut event = rag_event();
        event["table_Schema"].as_object_mut().unwrap().remove("metadata_field");

        let response = service.invoke(event).await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("metadata_field"), "{}", response.body);
        assert!(db.executed.lock().unwrap().is_empty());
        assert_eq!(*db.opened.lock().unwrap(), 0, "no connection before validation passes");
    }

    #[tokio::test]
    async fn test_connection_failure_returns_500() {
        let (service, db) = service(FakeDatabase { refuse_connections: true, ..FakeDatabase::default() });

        let response = service.invoke(rag_event()).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "Error executing SQL commands: connection refused");
        assert!(db.executed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provision_reports_applied_statements() {
        let (service, _db) = service(FakeDatabase {
            fail_at: Some((3, "index build failed")),
            ..FakeDatabase::default()
        });
        let request = ProvisioningRequest::try_from(
            ProvisioningEvent::from_value(rag_event()).unwrap(),
        )
        .unwrap();

        let err = service.provision(&request).await.unwrap_err();

        assert!(err.is_partial());
        match err {
            InvocationError::Statement { failure, applied } => {
                assert_eq!(failure.kind, StatementKind::Index);
                assert_eq!(
                    applied,
                    [StatementKind::Extension, StatementKind::Schema, StatementKind::Table]
                );
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let value = serde_json::to_value(InvocationResponse::success()).unwrap();
        assert_eq!(value, json!({"statusCode": 200, "body": "SQL commands executed successfully"}));
    }
}

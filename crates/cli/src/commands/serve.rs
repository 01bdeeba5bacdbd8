use std::sync::Arc;

use anyhow::Result;
use pgvec_provision_http::{create_router, AppState};

use crate::build_service;

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let service = Arc::new(build_service()?);
    let router = create_router(Arc::new(AppState { service }));

    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP invocation endpoint on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

//! Service layer for pgvec-provision
//!
//! Turns invocation events into executed DDL and a `{statusCode, body}` envelope.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod error;
#[cfg(feature = "postgres")]
mod pg_factory;
mod provisioning_service;

pub use error::InvocationError;
#[cfg(feature = "postgres")]
pub use pg_factory::PgExecutorFactory;
pub use provisioning_service::{ExecutorFactory, InvocationResponse, ProvisioningService};

//! Shared constants for pgvec-provision.
//!
//! Centralizes the DDL tuning values and envelope messages used across crates.

/// Embedding vector dimension used when the event omits `dimensional_embedding`
/// (amazon.titan-embed-text-v2 and BGE-M3 both emit 1024d vectors).
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 1024;

/// Largest `vector` dimension pgvector can build an HNSW index on.
pub const HNSW_MAX_DIMENSION: u32 = 2_000;

/// HNSW build-time candidate list size.
pub const HNSW_EF_CONSTRUCTION: u32 = 256;

/// Default timeout for opening the provisioning connection, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Envelope status code for a fully applied statement sequence.
pub const STATUS_OK: u16 = 200;

/// Envelope status code for any failed invocation.
pub const STATUS_ERROR: u16 = 500;

/// Envelope body for a fully applied statement sequence.
pub const SUCCESS_BODY: &str = "SQL commands executed successfully";

/// Prefix of the envelope body for a failed invocation.
pub const FAILURE_BODY_PREFIX: &str = "Error executing SQL commands";

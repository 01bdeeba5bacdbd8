//! Core types for pgvec-provision
//!
//! Event parsing, request validation, DDL generation and process configuration.
//! No I/O beyond reading the credential secret at startup.

mod constants;
mod env_config;
mod error;
mod request;
mod statements;

pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use request::*;
pub use statements::*;

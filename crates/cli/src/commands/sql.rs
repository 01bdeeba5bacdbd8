use std::path::PathBuf;

use anyhow::Result;
use pgvec_provision_core::{build_statements, ProvisioningEvent, ProvisioningRequest};

use crate::read_event;

pub(crate) fn run(event_path: Option<&PathBuf>) -> Result<()> {
    let raw = read_event(event_path)?;
    let request = ProvisioningRequest::try_from(ProvisioningEvent::from_json(&raw)?)?;

    for statement in build_statements(&request) {
        println!("-- {}\n{}\n", statement.kind, statement);
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::{build_service, read_event};

/// One-shot invocation: the envelope goes to stdout, a failed invocation
/// exits non-zero.
pub(crate) async fn run(event_path: Option<&PathBuf>) -> Result<()> {
    let service = build_service()?;
    // Non-JSON input is passed through as a string and rejected inside the envelope.
    let raw = read_event(event_path)?;
    let event = serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw));

    let response = service.invoke(event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        bail!("invocation failed with status {}", response.status_code);
    }
    Ok(())
}

//! Shared utilities for CLI commands.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tc_core::{EventBatch, parse_event_list};

/// Reads event lists from `paths`, or from `reader` when `paths` is empty.
///
/// Each file holds one calendar; all of them are merged into one batch.
pub fn load_events(paths: &[PathBuf], reader: impl Read) -> Result<EventBatch> {
    if paths.is_empty() {
        return read_event_list(reader).context("failed to read events from stdin");
    }

    let mut batch = EventBatch::default();
    for path in paths {
        batch.extend(load_event_file(path)?);
    }
    Ok(batch)
}

fn load_event_file(path: &Path) -> Result<EventBatch> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let batch =
        read_event_list(file).with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        events = batch.events.len(),
        rejected = batch.rejected.len(),
        "loaded event list"
    );
    Ok(batch)
}

fn read_event_list(mut reader: impl Read) -> Result<EventBatch> {
    let mut body = String::new();
    reader.read_to_string(&mut body)?;
    Ok(parse_event_list(&body)?)
}

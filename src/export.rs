//! Whole-state export and import.
//!
//! Export serializes the in-memory snapshot as pretty-printed JSON — the
//! API key leaves in plaintext, since the export is a portable backup of
//! what the user configured, not an at-rest copy. Import is all-or-nothing:
//! malformed JSON is rejected wholesale, while readable JSON in an older
//! schema goes through the same migration as a normal load.

use anyhow::{Context, Result};

use crate::migrate::migrate_state;
use crate::models::AppState;

/// Serialize a snapshot for backup or transfer.
pub fn export_state(state: &AppState) -> Result<String> {
    serde_json::to_string_pretty(state).context("failed to serialize state for export")
}

/// Parse an exported (or legacy) snapshot.
///
/// Returns an error for anything that is not JSON; the current state is
/// never partially replaced. Valid JSON is migrated to the current schema,
/// so exports from older versions import cleanly.
pub fn import_state(raw: &str) -> Result<AppState> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("import rejected: not valid JSON")?;
    Ok(migrate_state(value))
}

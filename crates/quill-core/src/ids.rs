//! Trail ID generation.
//!
//! IDs are client-generated at creation time as `{prefix}-{16 hex chars}`,
//! e.g. `"trl-3fa94c0b1d2e7a55"`. The random part comes from the OS RNG.

use crate::errors::CoreError;

/// Prefix for trail record IDs.
pub const PREFIX_TRAIL: &str = "trl";

/// Number of random bytes behind each ID (rendered as twice as many hex chars).
const RANDOM_BYTES: usize = 8;

/// Generate a fresh ID with the given prefix.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random number generator is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; RANDOM_BYTES];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("failed to generate random id bytes: {e}"))?;
    Ok(format_id(prefix, &bytes))
}

/// Render `bytes` as lowercase hex behind `prefix-`.
#[must_use]
pub fn format_id(prefix: &str, bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{prefix}-{hex}")
}

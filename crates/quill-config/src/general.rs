//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default log filter when neither `QUILL_LOG` nor a CLI flag says otherwise.
fn default_log_level() -> String {
    "warn".to_string()
}

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// `tracing` filter directive, e.g. `"warn"` or `"quill_store=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default result limit for history queries.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_limit: default_limit(),
        }
    }
}

//! Trail store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dir() -> String {
    ".quill/trails".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding the per-entity JSONL trail files.
    #[serde(default = "default_dir")]
    pub dir: String,
}

impl StoreConfig {
    #[must_use]
    pub fn dir(&self) -> PathBuf {
        PathBuf::from(&self.dir)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dir_is_project_local() {
        let config = StoreConfig::default();
        assert_eq!(config.dir(), PathBuf::from(".quill/trails"));
    }
}

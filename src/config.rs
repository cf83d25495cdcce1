use crate::report::{DEFAULT_DEPTH_LIMIT, LayoutSpacing};
use crate::store::DEFAULT_PLAYBOOK;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration. Every field has a default, so a partial file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of the file-backed playbook store.
    pub playbooks_dir: PathBuf,
    /// Name reported for an empty store and loaded when none is given.
    pub default_playbook: String,
    pub layout: LayoutSpacing,
    pub export_depth_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playbooks_dir: PathBuf::from("playbooks"),
            default_playbook: DEFAULT_PLAYBOOK.to_string(),
            layout: LayoutSpacing::default(),
            export_depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

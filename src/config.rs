use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::site::Site;

pub const DEFAULT_USER_AGENT: &str = "comicsource/0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Host-supplied settings. Everything but `domain` has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub domain: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SourceConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parse config: {}", path.display()))
    }

    pub fn site(&self) -> anyhow::Result<Site> {
        Site::new(&self.domain).context("configure site domain")
    }
}

//! Agent configuration
//!
//! Settings can come from a YAML file; command-line flags override them.
//!
//! ```yaml
//! namespaces: [prod, staging]
//! templates: []
//! dryRun: false
//! onetime: false
//! syncInterval: 60s
//! requestTimeout: 30s
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{CoreError, Result};

/// Default time between two sync passes
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Default timeout for a single cluster request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Agent configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Namespaces to process (empty means every namespace)
    pub namespaces: Vec<String>,

    /// Template ConfigMaps to process by name (empty means every labelled template)
    pub templates: Vec<String>,

    /// Print rendered objects instead of writing them
    pub dry_run: bool,

    /// Run a single pass and exit
    pub onetime: bool,

    /// Time between two sync passes
    #[serde(with = "humantime_serde")]
    pub sync_interval: Duration,

    /// Timeout for a single cluster request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            namespaces: Vec::new(),
            templates: Vec::new(),
            dry_run: false,
            onetime: false,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl AgentConfig {
    /// Load configuration from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the agent cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.sync_interval.is_zero() {
            return Err(CoreError::InvalidConfig {
                message: "sync interval must be greater than zero".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(CoreError::InvalidConfig {
                message: "request timeout must be greater than zero".to_string(),
            });
        }
        if let Some(empty) = self
            .namespaces
            .iter()
            .chain(&self.templates)
            .find(|s| s.trim().is_empty())
        {
            return Err(CoreError::InvalidConfig {
                message: format!("empty namespace or template name: {:?}", empty),
            });
        }
        Ok(())
    }
}

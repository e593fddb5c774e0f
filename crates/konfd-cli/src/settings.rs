//! Effective agent settings: configuration file overridden by flags

use konfd_core::AgentConfig;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Merge the configuration file (if any) with command-line flags
pub fn resolve(cli: &Cli) -> Result<AgentConfig> {
    let mut config = match &cli.config {
        Some(path) => AgentConfig::load_from(path).map_err(|e| CliError::config_file(path, e))?,
        None => AgentConfig::default(),
    };

    if !cli.namespaces.is_empty() {
        config.namespaces = cli.namespaces.clone();
    }
    if !cli.templates.is_empty() {
        config.templates = cli.templates.clone();
    }
    config.dry_run |= cli.noop;
    config.onetime |= cli.onetime;
    if let Some(secs) = cli.sync_interval {
        config.sync_interval = Duration::from_secs(secs);
    }
    if let Some(secs) = cli.request_timeout {
        config.request_timeout = Duration::from_secs(secs);
    }

    config.validate()?;
    Ok(config)
}

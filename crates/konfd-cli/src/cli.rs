//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "konfd")]
#[command(author = "konfd Contributors")]
#[command(version)]
#[command(about = "Render ConfigMap and Secret templates in Kubernetes", long_about = None)]
pub struct Cli {
    /// Namespace to process; repeat for several (default: all namespaces)
    #[arg(short, long = "namespace", env = "KONFD_NAMESPACES", value_delimiter = ',')]
    pub namespaces: Vec<String>,

    /// Template ConfigMap to process; repeat for several (default: all labelled templates)
    #[arg(short, long = "template", env = "KONFD_TEMPLATES", value_delimiter = ',')]
    pub templates: Vec<String>,

    /// Print rendered objects as JSON instead of writing them
    #[arg(long, visible_alias = "dry-run", env = "KONFD_NOOP")]
    pub noop: bool,

    /// Run a single sync pass and exit
    #[arg(long, env = "KONFD_ONETIME")]
    pub onetime: bool,

    /// Seconds between sync passes [default: 60]
    #[arg(long, env = "KONFD_SYNC_INTERVAL", value_name = "SECONDS")]
    pub sync_interval: Option<u64>,

    /// Timeout in seconds for each Kubernetes request [default: 30]
    #[arg(long, env = "KONFD_REQUEST_TIMEOUT", value_name = "SECONDS")]
    pub request_timeout: Option<u64>,

    /// YAML configuration file; flags override its values
    #[arg(short, long, env = "KONFD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, env = "KONFD_DEBUG")]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "KONFD_LOG_FORMAT")]
    pub log_format: LogFormat,
}

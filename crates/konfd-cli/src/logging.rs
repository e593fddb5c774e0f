//! Log output setup

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Filter used when `RUST_LOG` is not set
fn default_directives(debug: bool) -> &'static str {
    if debug {
        "konfd=debug,konfd_kube=debug,konfd_engine=debug"
    } else {
        "konfd=info,konfd_kube=info"
    }
}

/// Install the global subscriber, logging to stderr
///
/// Standard output is kept free for dry-run objects.
pub fn init(debug: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "konfd=info,konfd_kube=info");
        assert!(default_directives(true).contains("konfd_kube=debug"));
    }
}

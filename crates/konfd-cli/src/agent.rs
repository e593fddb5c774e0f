//! The agent: connect, then run one pass or the sync loop

use konfd_core::AgentConfig;
use konfd_kube::{
    ClusterClient, DryRunSink, JsonSink, ShutdownTrigger, SyncDriver, SyncOptions, run_fleet,
    shutdown_channel, wait_for_api,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::display;
use crate::error::{CliError, Result};

/// Delay between two API server readiness checks
const API_RETRY: Duration = Duration::from_secs(1);

/// Run the agent on a fresh multi-threaded runtime
pub fn run(config: AgentConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(format!("failed to start async runtime: {}", e)))?;

    runtime.block_on(run_agent(config))
}

async fn run_agent(config: AgentConfig) -> Result<()> {
    let (trigger, mut shutdown) = shutdown_channel();
    tokio::spawn(forward_signals(trigger));

    info!(
        namespaces = ?config.namespaces,
        templates = ?config.templates,
        dry_run = config.dry_run,
        "starting konfd"
    );

    let client = Arc::new(ClusterClient::connect(config.request_timeout).await?);
    if !wait_for_api(client.as_ref(), API_RETRY, &mut shutdown).await {
        info!("shutdown requested before the API server was ready");
        return Ok(());
    }

    let sink: Arc<dyn DryRunSink> = Arc::new(JsonSink::stdout());
    let options = SyncOptions::from_config(&config);
    let single = options
        .single_target()
        .map(|(namespace, template)| (namespace.to_string(), template.to_string()));
    let driver = SyncDriver::new(client, sink, options);

    if config.onetime {
        if let Some((namespace, template)) = single {
            return sync_single(&driver, &namespace, &template).await;
        }

        let report = driver.run_pass().await;
        report.log_summary();
        display::print_pass_summary(&report);

        return if report.is_success() {
            Ok(())
        } else {
            Err(CliError::SyncFailed {
                failed: report.failure_count(),
            })
        };
    }

    let passes = run_fleet(&driver, config.sync_interval, shutdown).await;
    info!(passes, "konfd stopped");
    Ok(())
}

/// Sync one template in one namespace, failing on any error
async fn sync_single(driver: &SyncDriver, namespace: &str, template: &str) -> Result<()> {
    match driver.sync_template(namespace, template).await {
        Ok(outcome) => {
            info!(namespace, template, outcome = %outcome.outcome, "template synced");
            display::print_template_outcome(namespace, &outcome);
            Ok(())
        }
        Err(error) => Err(CliError::Template {
            namespace: namespace.to_string(),
            template: template.to_string(),
            message: error.to_string(),
        }),
    }
}

/// Trigger shutdown on SIGINT or SIGTERM
async fn forward_signals(trigger: ShutdownTrigger) {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(error = %error, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                warn!(error = %error, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown requested; finishing the current pass");
    trigger.trigger();
}

//! The background sync loop and its shutdown signal
//!
//! Shutdown is checked between passes: a pass in progress always finishes,
//! only the wait before the next one is cut short.

use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::client::ResourceClient;
use crate::driver::SyncDriver;

/// Create a linked shutdown trigger and signal
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

/// Requests shutdown of everything holding the matching [`Shutdown`]
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a shutdown request
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is requested or the trigger is dropped
    pub async fn triggered(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

/// Poll the API server until it answers
///
/// Returns `false` if shutdown was requested first.
pub async fn wait_for_api(
    client: &dyn ResourceClient,
    retry: Duration,
    shutdown: &mut Shutdown,
) -> bool {
    loop {
        if shutdown.is_triggered() {
            return false;
        }

        match client.server_version().await {
            Ok(version) => {
                info!(%version, "Kubernetes API server is ready");
                return true;
            }
            Err(error) => info!(error = %error, "waiting for Kubernetes API server"),
        }

        tokio::select! {
            _ = tokio::time::sleep(retry) => {}
            _ = shutdown.triggered() => return false,
        }
    }
}

/// Run passes every `interval` until shutdown
///
/// Returns the number of passes run.
pub async fn run_fleet(driver: &SyncDriver, interval: Duration, mut shutdown: Shutdown) -> usize {
    let mut passes = 0;

    loop {
        if shutdown.is_triggered() {
            break;
        }

        let report = driver.run_pass().await;
        passes += 1;
        report.log_summary();
        info!(
            "Syncing templates complete. Next sync in {} seconds.",
            interval.as_secs()
        );

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.triggered() => break,
        }
    }

    debug!(passes, "sync loop stopped");
    passes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockResourceClient;
    use crate::driver::SyncOptions;
    use crate::sink::RecordingSink;
    use std::sync::Arc;

    fn driver(client: &MockResourceClient) -> SyncDriver {
        SyncDriver::new(
            Arc::new(client.clone()),
            Arc::new(RecordingSink::new()),
            SyncOptions {
                namespaces: vec!["prod".to_string()],
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_shutdown_signal() {
        let (trigger, mut shutdown) = shutdown_channel();
        let observer = shutdown.clone();
        assert!(!shutdown.is_triggered());

        trigger.trigger();
        shutdown.triggered().await;
        assert!(observer.is_triggered());
    }

    #[tokio::test]
    async fn test_dropped_trigger_releases_waiters() {
        let (trigger, mut shutdown) = shutdown_channel();
        drop(trigger);
        shutdown.triggered().await;
    }

    #[tokio::test]
    async fn test_no_pass_after_shutdown() {
        let client = MockResourceClient::new();
        let (trigger, shutdown) = shutdown_channel();
        trigger.trigger();

        let passes = run_fleet(&driver(&client), Duration::from_secs(60), shutdown).await;

        assert_eq!(passes, 0);
        assert_eq!(client.operation_counts().lists, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_passes_repeat_until_shutdown() {
        let client = MockResourceClient::new();
        let (trigger, shutdown) = shutdown_channel();

        let fleet_client = client.clone();
        let fleet = tokio::spawn(async move {
            run_fleet(&driver(&fleet_client), Duration::from_secs(60), shutdown).await
        });

        tokio::time::sleep(Duration::from_secs(150)).await;
        trigger.trigger();

        let passes = fleet.await.unwrap();
        assert_eq!(passes, 3);
        assert_eq!(client.operation_counts().lists, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_api_retries() {
        let client = MockResourceClient::new();
        client.unready_for(2);
        let (_trigger, mut shutdown) = shutdown_channel();

        let ready = wait_for_api(&client, Duration::from_secs(1), &mut shutdown).await;

        assert!(ready);
        assert_eq!(client.operation_counts().version_checks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_api_stops_on_shutdown() {
        let client = MockResourceClient::new();
        client.unready_for(usize::MAX);
        let (trigger, mut shutdown) = shutdown_channel();
        trigger.trigger();

        assert!(!wait_for_api(&client, Duration::from_secs(1), &mut shutdown).await);
        assert_eq!(client.operation_counts().version_checks, 0);
    }
}

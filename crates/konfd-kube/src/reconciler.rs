//! Writes rendered values into their destination objects
//!
//! A destination is created when absent. When present, only the destination
//! key is compared and overwritten; the fetched object is written back with
//! every other field as it was read.

use konfd_core::Destination;
use std::fmt;
use tracing::{debug, info};

use crate::client::ResourceClient;
use crate::error::{KubeError, Result};
use crate::resource::{Resource, stored_value};
use crate::sink::DryRunSink;

/// What applying a value did, or would have done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Updated { changed: bool },
    WouldCreate,
    WouldUpdate { changed: bool },
}

impl ApplyOutcome {
    /// Whether the stored value differs from what was there before
    pub fn changed(&self) -> bool {
        match self {
            Self::Created | Self::WouldCreate => true,
            Self::Updated { changed } | Self::WouldUpdate { changed } => *changed,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::WouldCreate | Self::WouldUpdate { .. })
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Updated { changed: true } => "updated",
            Self::Updated { changed: false } => "unchanged",
            Self::WouldCreate => "would create",
            Self::WouldUpdate { changed: true } => "would update",
            Self::WouldUpdate { changed: false } => "would rewrite unchanged",
        };
        f.write_str(label)
    }
}

/// Applies rendered values to destinations in the cluster
pub struct Reconciler<'a> {
    client: &'a dyn ResourceClient,
    sink: &'a dyn DryRunSink,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a dyn ResourceClient, sink: &'a dyn DryRunSink, dry_run: bool) -> Self {
        Self {
            client,
            sink,
            dry_run,
        }
    }

    /// Store `value` at the destination key in `namespace`
    ///
    /// In dry-run mode the object that would be written goes to the sink and
    /// the cluster is only read.
    pub async fn apply(
        &self,
        namespace: &str,
        destination: &Destination,
        value: &str,
    ) -> Result<ApplyOutcome> {
        let Destination { kind, name, key } = destination;
        let stored = stored_value(*kind, value);

        let mut current = match self.client.get_resource(*kind, namespace, name).await {
            Ok(current) => current,
            Err(err) if err.is_not_found() => {
                let candidate = Resource::new(*kind, namespace, name).with_value(key, stored);
                return self.create(candidate).await;
            }
            Err(err) => {
                return Err(KubeError::Reconcile {
                    action: "reading",
                    kind: *kind,
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    message: err.to_string(),
                });
            }
        };

        let changed = current.value(key) != Some(stored.as_str());
        if changed {
            info!(namespace, %kind, name = %name, key = %key, "{} {} out of sync; syncing", kind, name);
            current.set_value(key, stored);
        } else {
            debug!(namespace, %kind, name = %name, key = %key, "value unchanged");
        }

        if self.dry_run {
            self.sink.emit(&current)?;
            return Ok(ApplyOutcome::WouldUpdate { changed });
        }

        self.client.update_resource(&current).await?;
        Ok(ApplyOutcome::Updated { changed })
    }

    async fn create(&self, candidate: Resource) -> Result<ApplyOutcome> {
        if self.dry_run {
            self.sink.emit(&candidate)?;
            return Ok(ApplyOutcome::WouldCreate);
        }

        self.client.create_resource(&candidate).await?;
        info!(
            namespace = candidate.namespace(),
            kind = %candidate.kind(),
            name = candidate.name(),
            "created destination"
        );
        Ok(ApplyOutcome::Created)
    }
}

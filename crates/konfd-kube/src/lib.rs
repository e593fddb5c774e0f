//! Konfd Kube - Kubernetes side of konfd
//!
//! This crate reads template ConfigMaps, renders them and writes the results:
//! - `client`: Cluster access behind the [`ResourceClient`] trait
//! - `cache`: Per-pass memoization of referenced objects
//! - `reconciler`: Create-or-update of destination keys
//! - `processor`: Render and apply the templates of one namespace
//! - `driver` / `fleet`: Passes over namespaces and the periodic loop

pub mod cache;
pub mod client;
pub mod driver;
pub mod error;
pub mod fleet;
pub mod processor;
pub mod reconciler;
pub mod report;
pub mod resource;
pub mod sink;

pub use cache::{CachedLookups, FetchCache};
pub use client::{ClusterClient, MockResourceClient, OperationCounts, ResourceClient};
pub use driver::{SyncDriver, SyncOptions, SyncScope};
pub use error::{KubeError, Result, SyncError};
pub use fleet::{Shutdown, ShutdownTrigger, run_fleet, shutdown_channel, wait_for_api};
pub use processor::TemplateProcessor;
pub use reconciler::{ApplyOutcome, Reconciler};
pub use report::{NamespaceReport, PassReport, TemplateFailure, TemplateOutcome};
pub use resource::Resource;
pub use sink::{DryRunSink, JsonSink, RecordingSink};

//! Standard exit codes for konfd
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - the agent stopped cleanly or the single pass synced everything
pub const SUCCESS: u8 = 0;

/// General error - unspecified failure
pub const ERROR: u8 = 1;

/// Configuration error - invalid flags, environment or configuration file
pub const CONFIG_ERROR: u8 = 2;

/// Cluster error - no usable Kubernetes configuration or API server
pub const CLUSTER_ERROR: u8 = 3;

/// Sync error - at least one template failed during a single pass
pub const SYNC_FAILED: u8 = 4;

//! Konfd Core - Core types for the template synchronization agent
//!
//! This crate provides the foundational types used throughout konfd:
//! - `ResourceKind`: The two object kinds konfd reads and writes
//! - `TemplateSource`: A template ConfigMap and its destination annotations
//! - `encoding`: The reversible text encoding used for Secret values
//! - `AgentConfig`: File-based agent configuration

pub mod config;
pub mod encoding;
pub mod error;
pub mod kind;
pub mod source;

pub use config::AgentConfig;
pub use encoding::DecodeError;
pub use error::{CoreError, Result};
pub use kind::ResourceKind;
pub use source::{Destination, TemplateSource};

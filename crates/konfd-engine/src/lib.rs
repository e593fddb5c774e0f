//! Konfd Engine - Jinja2 rendering for konfd templates
//!
//! This crate provides a MiniJinja-based engine whose only functions are
//! `configmap(name, key)` and `secret(name, key)`:
//! - The lookups behind both functions are injected per render
//! - Lookup failures interrupt rendering and stay inspectable
//! - Errors carry the template source and fix suggestions

pub mod engine;
pub mod error;
pub mod functions;
pub mod suggestions;

pub use engine::Engine;
pub use error::{EngineError, Result, TemplateError, TemplateErrorKind};
pub use functions::{LookupError, TemplateFunctions};
pub use suggestions::AVAILABLE_FUNCTIONS;

//! Template engine based on MiniJinja

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::sync::Arc;

use crate::error::{EngineError, Result, TemplateError};
use crate::functions::{self, TemplateFunctions};

/// The template engine
///
/// Undefined names are always an error; a template that renders must have
/// resolved every reference it makes.
#[derive(Debug, Clone, Default)]
pub struct Engine;

impl Engine {
    /// Create a configured MiniJinja environment
    fn create_environment<'source>(
        &self,
        lookups: Arc<dyn TemplateFunctions>,
    ) -> Environment<'source> {
        let mut env = Environment::new();

        env.set_undefined_behavior(UndefinedBehavior::Strict);

        // Rendered values are written verbatim into ConfigMaps and Secrets
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);

        functions::register(&mut env, lookups);
        env
    }

    /// Render a template string against the given lookups
    ///
    /// The template has no variables; everything it outputs comes from
    /// `configmap(...)` and `secret(...)` calls answered by `lookups`.
    pub fn render(
        &self,
        template_name: &str,
        template: &str,
        lookups: Arc<dyn TemplateFunctions>,
    ) -> Result<String> {
        let env = self.create_environment(lookups);

        let tmpl = env
            .template_from_named_str(template_name, template)
            .map_err(|e| {
                EngineError::Parse(TemplateError::from_minijinja(&e, template_name, template, None))
            })?;

        tmpl.render(minijinja::context! {}).map_err(|e| {
            let lookup = functions::lookup_cause(&e);
            EngineError::Exec {
                error: TemplateError::from_minijinja(&e, template_name, template, lookup.as_ref()),
                lookup,
            }
        })
    }
}

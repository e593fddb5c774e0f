//! Renders and applies the templates of one namespace
//!
//! Templates render synchronously while objects are fetched asynchronously,
//! so rendering runs against the fetch cache and is repeated after each
//! miss: a lookup of an object not fetched yet fails as unresolved, the
//! object is fetched and the template renders again. Rendering has no side
//! effects, so the last render is the same as an uninterrupted one. Each
//! distinct object costs at most one extra render.

use konfd_core::{ResourceKind, TemplateSource};
use konfd_engine::Engine;
use tracing::{debug, warn};

use crate::cache::FetchCache;
use crate::client::ResourceClient;
use crate::error::{KubeError, SyncError};
use crate::reconciler::Reconciler;
use crate::report::{NamespaceReport, TemplateFailure, TemplateOutcome};
use crate::resource::Resource;
use crate::sink::DryRunSink;

/// Syncs templates of one namespace during one pass
///
/// Owns the pass's [`FetchCache`]; drop the processor when the pass ends.
pub struct TemplateProcessor<'a> {
    client: &'a dyn ResourceClient,
    namespace: String,
    engine: &'a Engine,
    cache: FetchCache<'a>,
    reconciler: Reconciler<'a>,
}

impl<'a> TemplateProcessor<'a> {
    pub fn new(
        client: &'a dyn ResourceClient,
        namespace: &str,
        engine: &'a Engine,
        sink: &'a dyn DryRunSink,
        dry_run: bool,
    ) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
            engine,
            cache: FetchCache::new(client, namespace),
            reconciler: Reconciler::new(client, sink, dry_run),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn cache(&self) -> &FetchCache<'a> {
        &self.cache
    }

    /// Render a template, fetching the objects it references
    pub async fn render(&mut self, source: &TemplateSource) -> Result<String, SyncError> {
        loop {
            let lookups = self.cache.lookups();
            let err = match self.engine.render(&source.name, &source.template, lookups) {
                Ok(rendered) => return Ok(rendered),
                Err(err) => err,
            };

            let unresolved = err
                .unresolved()
                .filter(|(kind, name)| !self.cache.contains(*kind, name))
                .map(|(kind, name)| (kind, name.to_string()));

            match unresolved {
                Some((kind, name)) => self.fetch_reference(source, kind, &name).await?,
                None => {
                    return Err(SyncError::Render {
                        template: source.name.clone(),
                        error: err,
                    });
                }
            }
        }
    }

    async fn fetch_reference(
        &mut self,
        source: &TemplateSource,
        kind: ResourceKind,
        name: &str,
    ) -> Result<(), SyncError> {
        debug!(namespace = %self.namespace, template = %source.name, %kind, name, "resolving reference");
        self.cache
            .resolve(kind, name)
            .await
            .map(|_| ())
            .map_err(|error| SyncError::Reference {
                template: source.name.clone(),
                error,
            })
    }

    /// Render one template ConfigMap and apply the result
    pub async fn process(&mut self, resource: &Resource) -> Result<TemplateOutcome, SyncError> {
        let source = resource.template_source()?;
        let rendered = self.render(&source).await?;
        let outcome = self
            .reconciler
            .apply(&self.namespace, &source.destination, &rendered)
            .await?;

        debug!(
            namespace = %self.namespace,
            template = %source.name,
            destination = %source.destination.name,
            %outcome,
            "template processed"
        );

        Ok(TemplateOutcome {
            template: source.name,
            destination: source.destination,
            outcome,
        })
    }

    /// Sync the template ConfigMap called `name`
    ///
    /// Every failure is returned, including a missing template.
    pub async fn sync_one(&mut self, name: &str) -> Result<TemplateOutcome, SyncError> {
        let resource = self
            .client
            .get_resource(ResourceKind::ConfigMap, &self.namespace, name)
            .await?;
        self.process(&resource).await
    }

    /// Sync every labelled template ConfigMap of the namespace
    ///
    /// A failing template is logged and recorded; the others still run.
    pub async fn sync_all(&mut self) -> Result<NamespaceReport, KubeError> {
        let templates = self.client.list_template_resources(&self.namespace).await?;
        let mut report = NamespaceReport::new(&self.namespace);

        for template in &templates {
            match self.process(template).await {
                Ok(outcome) => report.synced.push(outcome),
                Err(error) => {
                    warn!(
                        namespace = %self.namespace,
                        template = template.name(),
                        error = %error,
                        "failed to sync template"
                    );
                    report.failed.push(TemplateFailure {
                        template: template.name().to_string(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Sync the named template ConfigMaps, recording each failure
    ///
    /// With `skip_absent`, a name with no ConfigMap in this namespace is
    /// noted as skipped instead of failed.
    pub async fn sync_named(&mut self, names: &[String], skip_absent: bool) -> NamespaceReport {
        let mut report = NamespaceReport::new(&self.namespace);

        for name in names {
            let result = match self
                .client
                .get_resource(ResourceKind::ConfigMap, &self.namespace, name)
                .await
            {
                Ok(resource) => self.process(&resource).await,
                Err(error) if skip_absent && error.is_not_found() => {
                    debug!(namespace = %self.namespace, template = %name, "template not present; skipping");
                    report.skipped.push(name.clone());
                    continue;
                }
                Err(error) => Err(error.into()),
            };

            match result {
                Ok(outcome) => report.synced.push(outcome),
                Err(error) => {
                    warn!(
                        namespace = %self.namespace,
                        template = %name,
                        error = %error,
                        "failed to sync template"
                    );
                    report.failed.push(TemplateFailure {
                        template: name.clone(),
                        error,
                    });
                }
            }
        }

        report
    }
}

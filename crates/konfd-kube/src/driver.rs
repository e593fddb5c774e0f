//! Sync passes over namespaces
//!
//! A pass visits each selected namespace in turn with a fresh
//! [`TemplateProcessor`], so no fetched object outlives the namespace and
//! pass it was fetched in.

use konfd_core::AgentConfig;
use konfd_engine::Engine;
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::ResourceClient;
use crate::error::{Result, SyncError};
use crate::processor::TemplateProcessor;
use crate::report::{NamespaceReport, PassReport, TemplateOutcome};
use crate::sink::DryRunSink;

/// Which templates a pass processes in each namespace
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncScope {
    /// Every ConfigMap labelled as a template
    #[default]
    All,
    /// Only these template ConfigMaps
    Named(Vec<String>),
}

/// What a pass covers
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Namespaces to visit; empty means every namespace in the cluster
    pub namespaces: Vec<String>,
    pub scope: SyncScope,
    pub dry_run: bool,
}

impl SyncOptions {
    /// The namespace and template of a run that targets exactly one template
    pub fn single_target(&self) -> Option<(&str, &str)> {
        match (self.namespaces.as_slice(), &self.scope) {
            ([namespace], SyncScope::Named(names)) if names.len() == 1 => {
                Some((namespace.as_str(), names[0].as_str()))
            }
            _ => None,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        let scope = if config.templates.is_empty() {
            SyncScope::All
        } else {
            SyncScope::Named(config.templates.clone())
        };

        Self {
            namespaces: config.namespaces.clone(),
            scope,
            dry_run: config.dry_run,
        }
    }
}

/// Runs sync passes against a cluster
pub struct SyncDriver {
    client: Arc<dyn ResourceClient>,
    sink: Arc<dyn DryRunSink>,
    engine: Engine,
    options: SyncOptions,
}

impl SyncDriver {
    pub fn new(
        client: Arc<dyn ResourceClient>,
        sink: Arc<dyn DryRunSink>,
        options: SyncOptions,
    ) -> Self {
        Self {
            client,
            sink,
            engine: Engine::default(),
            options,
        }
    }

    /// The namespaces this pass visits
    pub async fn namespaces(&self) -> Result<Vec<String>> {
        if self.options.namespaces.is_empty() {
            self.client.list_namespaces().await
        } else {
            Ok(self.options.namespaces.clone())
        }
    }

    fn processor(&self, namespace: &str) -> TemplateProcessor<'_> {
        TemplateProcessor::new(
            self.client.as_ref(),
            namespace,
            &self.engine,
            self.sink.as_ref(),
            self.options.dry_run,
        )
    }

    /// Sync a single template, returning any failure
    ///
    /// A missing template is an error here, as is every other failure.
    pub async fn sync_template(
        &self,
        namespace: &str,
        name: &str,
    ) -> std::result::Result<TemplateOutcome, SyncError> {
        self.processor(namespace).sync_one(name).await
    }

    /// Sync the selected templates of one namespace
    pub async fn sync_namespace(&self, namespace: &str) -> NamespaceReport {
        let mut processor = self.processor(namespace);

        match &self.options.scope {
            // Listed namespaces need not hold every named template
            SyncScope::Named(names) => {
                processor
                    .sync_named(names, self.options.namespaces.is_empty())
                    .await
            }
            SyncScope::All => match processor.sync_all().await {
                Ok(report) => report,
                Err(error) => {
                    warn!(namespace, error = %error, "failed to list templates");
                    NamespaceReport {
                        error: Some(error),
                        ..NamespaceReport::new(namespace)
                    }
                }
            },
        }
    }

    /// Run one pass over every selected namespace
    pub async fn run_pass(&self) -> PassReport {
        let namespaces = match self.namespaces().await {
            Ok(namespaces) => namespaces,
            Err(error) => {
                warn!(error = %error, "failed to list namespaces");
                return PassReport {
                    namespaces: Vec::new(),
                    error: Some(error),
                };
            }
        };

        let mut report = PassReport::default();
        for namespace in &namespaces {
            let namespace_report = self.sync_namespace(namespace).await;
            info!(
                namespace = %namespace,
                synced = namespace_report.synced.len(),
                failed = namespace_report.failure_count(),
                "namespace synced"
            );
            report.namespaces.push(namespace_report);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockResourceClient;
    use crate::resource::Resource;
    use crate::sink::RecordingSink;
    use konfd_core::ResourceKind;
    use konfd_core::source::keys;

    fn template(namespace: &str, name: &str, dest: &str, text: &str) -> Resource {
        Resource::new(ResourceKind::ConfigMap, namespace, name)
            .with_labels(&[(keys::TEMPLATE_LABEL, keys::TEMPLATE_LABEL_VALUE)])
            .with_annotations(&[
                (keys::KIND, "configmap"),
                (keys::NAME, dest),
                (keys::KEY, "value"),
            ])
            .with_value(keys::TEMPLATE_DATA_KEY, text)
    }

    fn cluster() -> MockResourceClient {
        MockResourceClient::with_resources([
            Resource::new(ResourceKind::ConfigMap, "prod", "env").with_value("name", "production"),
            Resource::new(ResourceKind::ConfigMap, "staging", "env").with_value("name", "staging"),
            template("prod", "greeting", "out", r#"hello {{ configmap("env", "name") }}"#),
            template("staging", "greeting", "out", r#"hello {{ configmap("env", "name") }}"#),
            template("staging", "other", "other-out", "static"),
        ])
    }

    fn driver(client: &MockResourceClient, options: SyncOptions) -> SyncDriver {
        SyncDriver::new(
            Arc::new(client.clone()),
            Arc::new(RecordingSink::new()),
            options,
        )
    }

    #[test]
    fn test_options_from_config() {
        let config = AgentConfig {
            namespaces: vec!["prod".to_string()],
            templates: vec!["greeting".to_string()],
            dry_run: true,
            ..Default::default()
        };

        let options = SyncOptions::from_config(&config);
        assert_eq!(options.namespaces, vec!["prod"]);
        assert_eq!(options.scope, SyncScope::Named(vec!["greeting".to_string()]));
        assert!(options.dry_run);

        assert_eq!(
            SyncOptions::from_config(&AgentConfig::default()).scope,
            SyncScope::All
        );
    }

    #[tokio::test]
    async fn test_pass_over_all_namespaces() {
        let client = cluster();
        let report = driver(&client, SyncOptions::default()).run_pass().await;

        assert!(report.is_success());
        assert_eq!(report.namespaces.len(), 2);
        assert_eq!(report.synced_count(), 3);
        assert_eq!(client.operation_counts().namespace_lists, 1);
        assert_eq!(
            client.value(ResourceKind::ConfigMap, "prod", "out", "value").as_deref(),
            Some("hello production")
        );
        assert_eq!(
            client.value(ResourceKind::ConfigMap, "staging", "out", "value").as_deref(),
            Some("hello staging")
        );
    }

    #[tokio::test]
    async fn test_configured_namespaces_only() {
        let client = cluster();
        let options = SyncOptions {
            namespaces: vec!["staging".to_string()],
            ..Default::default()
        };
        let report = driver(&client, options).run_pass().await;

        assert_eq!(report.namespaces.len(), 1);
        assert_eq!(client.operation_counts().namespace_lists, 0);
        assert!(client.resource(ResourceKind::ConfigMap, "prod", "out").is_none());
    }

    #[tokio::test]
    async fn test_named_templates_in_every_namespace() {
        let client = cluster();
        let options = SyncOptions {
            scope: SyncScope::Named(vec!["greeting".to_string()]),
            ..Default::default()
        };
        let report = driver(&client, options).run_pass().await;

        assert_eq!(report.synced_count(), 2);
        assert_eq!(client.operation_counts().lists, 0);
        assert!(client.resource(ResourceKind::ConfigMap, "staging", "other-out").is_none());
    }

    #[tokio::test]
    async fn test_each_pass_fetches_afresh() {
        let client = cluster();
        let driver = driver(
            &client,
            SyncOptions {
                namespaces: vec!["prod".to_string()],
                ..Default::default()
            },
        );

        driver.run_pass().await;
        client.insert(
            Resource::new(ResourceKind::ConfigMap, "prod", "env").with_value("name", "renamed"),
        );
        driver.run_pass().await;

        assert_eq!(client.reads_of(ResourceKind::ConfigMap, "prod", "env"), 2);
        assert_eq!(
            client.value(ResourceKind::ConfigMap, "prod", "out", "value").as_deref(),
            Some("hello renamed")
        );
    }

    #[tokio::test]
    async fn test_list_failure_is_reported_per_namespace() {
        let client = cluster();
        client.fail_lists();
        let report = driver(&client, SyncOptions::default()).run_pass().await;

        assert_eq!(report.namespaces.len(), 2);
        assert!(report.namespaces.iter().all(|ns| ns.error.is_some()));
        assert_eq!(report.failure_count(), 2);
    }

    #[tokio::test]
    async fn test_sync_template_returns_error() {
        let client = cluster();
        let driver = driver(&client, SyncOptions::default());

        let outcome = driver.sync_template("prod", "greeting").await.unwrap();
        assert_eq!(outcome.destination.name, "out");

        let err = driver.sync_template("prod", "absent").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_named_template_absent_from_listed_namespaces_is_skipped() {
        let client = cluster();
        client.add_namespace("kube-system");
        client.add_namespace("default");
        let options = SyncOptions {
            scope: SyncScope::Named(vec!["other".to_string()]),
            ..Default::default()
        };
        let report = driver(&client, options).run_pass().await;

        assert!(report.is_success());
        assert_eq!(report.synced_count(), 1);
        assert_eq!(report.namespaces.len(), 4);
        let skipped: usize = report.namespaces.iter().map(|ns| ns.skipped.len()).sum();
        assert_eq!(skipped, 3);
    }

    #[tokio::test]
    async fn test_named_template_absent_from_configured_namespace_fails() {
        let client = cluster();
        let options = SyncOptions {
            namespaces: vec!["prod".to_string(), "staging".to_string()],
            scope: SyncScope::Named(vec!["other".to_string()]),
            ..Default::default()
        };
        let report = driver(&client, options).run_pass().await;

        assert!(!report.is_success());
        assert_eq!(report.synced_count(), 1);
        assert_eq!(report.failure_count(), 1);
        let prod = &report.namespaces[0];
        assert_eq!(prod.namespace, "prod");
        assert!(prod.skipped.is_empty());
        assert!(prod.failed[0].error.is_not_found());
    }

    #[test]
    fn test_single_target() {
        let single = SyncOptions {
            namespaces: vec!["prod".to_string()],
            scope: SyncScope::Named(vec!["greeting".to_string()]),
            dry_run: false,
        };
        assert_eq!(single.single_target(), Some(("prod", "greeting")));

        let every_namespace = SyncOptions {
            namespaces: Vec::new(),
            ..single.clone()
        };
        assert_eq!(every_namespace.single_target(), None);

        let two_templates = SyncOptions {
            scope: SyncScope::Named(vec!["a".to_string(), "b".to_string()]),
            ..single.clone()
        };
        assert_eq!(two_templates.single_target(), None);

        let all = SyncOptions {
            scope: SyncScope::All,
            ..single
        };
        assert_eq!(all.single_target(), None);
    }
}

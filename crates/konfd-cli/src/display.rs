//! Display formatting for pass reports

use console::style;
use konfd_kube::{NamespaceReport, PassReport, TemplateOutcome};

fn outcome_line(namespace: &str, synced: &TemplateOutcome) -> String {
    let outcome = if synced.outcome.changed() {
        style(synced.outcome.to_string()).green()
    } else {
        style(synced.outcome.to_string()).dim()
    };

    format!(
        "  {} {}/{} -> {} {}[{}] {}",
        style("✓").green(),
        namespace,
        synced.template,
        synced.destination.kind,
        synced.destination.name,
        synced.destination.key,
        outcome
    )
}

fn namespace_lines(report: &NamespaceReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .synced
        .iter()
        .map(|synced| outcome_line(&report.namespace, synced))
        .collect();

    lines.extend(report.failed.iter().map(|failure| {
        format!(
            "  {} {}/{}: {}",
            style("✗").red(),
            report.namespace,
            failure.template,
            failure.error
        )
    }));

    lines.extend(report.skipped.iter().map(|template| {
        style(format!("  - {}/{}: not present", report.namespace, template))
            .dim()
            .to_string()
    }));

    if let Some(error) = &report.error {
        lines.push(format!("  {} {}: {}", style("✗").red(), report.namespace, error));
    }

    lines
}

/// Summary of a single pass, one line per template
pub fn pass_summary(report: &PassReport) -> String {
    let mut lines: Vec<String> = report.namespaces.iter().flat_map(namespace_lines).collect();

    if let Some(error) = &report.error {
        lines.push(format!("  {} {}", style("✗").red(), error));
    }

    let totals = format!(
        "{} synced, {} changed, {} failed",
        report.synced_count(),
        report.changed_count(),
        report.failure_count()
    );
    let totals = if report.is_success() {
        style(totals).green().bold()
    } else {
        style(totals).red().bold()
    };
    lines.push(format!("{}", totals));

    lines.join("\n")
}

/// Print the result of a single-template run to stderr
pub fn print_template_outcome(namespace: &str, synced: &TemplateOutcome) {
    eprintln!("{}", outcome_line(namespace, synced));
}

/// Print the pass summary to stderr
pub fn print_pass_summary(report: &PassReport) {
    eprintln!("{}", pass_summary(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use konfd_core::{Destination, ResourceKind};
    use konfd_kube::{ApplyOutcome, KubeError, SyncError, TemplateFailure};

    #[test]
    fn test_pass_summary() {
        let mut prod = NamespaceReport::new("prod");
        prod.synced.push(TemplateOutcome {
            template: "db-url".to_string(),
            destination: Destination {
                kind: ResourceKind::Secret,
                name: "app-env".to_string(),
                key: "DATABASE_URL".to_string(),
            },
            outcome: ApplyOutcome::Created,
        });
        prod.failed.push(TemplateFailure {
            template: "broken".to_string(),
            error: SyncError::Kube(KubeError::NotFound {
                kind: ResourceKind::ConfigMap,
                namespace: "prod".to_string(),
                name: "broken".to_string(),
            }),
        });
        prod.skipped.push("elsewhere".to_string());

        let summary = console::strip_ansi_codes(&pass_summary(&PassReport {
            namespaces: vec![prod],
            error: None,
        }))
        .to_string();

        assert!(summary.contains("prod/db-url -> secret app-env[DATABASE_URL] created"));
        assert!(summary.contains("prod/broken: configmap 'broken' not found"));
        assert!(summary.contains("prod/elsewhere: not present"));
        assert!(summary.ends_with("1 synced, 1 changed, 1 failed"));
    }
}

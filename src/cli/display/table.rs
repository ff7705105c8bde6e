//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::k8s::{DeploymentAvailability, HealthReport};
use crate::domain::template::TemplateContent;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render deployments as a formatted table
    pub fn render_deployments(&self, deployments: &[DeploymentAvailability]) -> String {
        if deployments.is_empty() {
            return "No deployments found".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("DEPLOYMENT").set_alignment(CellAlignment::Left),
                Cell::new("NAMESPACE").set_alignment(CellAlignment::Left),
                Cell::new("AVAILABLE").set_alignment(CellAlignment::Center),
                Cell::new("STATUS").set_alignment(CellAlignment::Center),
            ]);

        for d in deployments {
            let icon = StatusIcon::get_replica_icon(d.available_replicas, d.replicas);
            let color = self
                .theme
                .get_replica_color(d.available_replicas, d.replicas);
            let status = StatusIcon::get_status_text(d.available_replicas, d.replicas);

            table.add_row(vec![
                Cell::new(&d.name),
                Cell::new(&d.namespace),
                Cell::new(format!("{} {}/{}", icon, d.available_replicas, d.replicas)).fg(color),
                Cell::new(status).fg(color),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Deployments {} ─╮\n",
            format!("[{} deployments]", deployments.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Running  {} Degraded  {} Failed  {} Stopped\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::WARNING.yellow(),
            StatusIcon::ERROR.red(),
            StatusIcon::STOPPED.bright_black()
        ));

        output
    }

    /// Render a single deployment's availability
    pub fn render_deployment_status(&self, d: &DeploymentAvailability) -> String {
        let color = self
            .theme
            .get_replica_color(d.available_replicas, d.replicas);
        let status = format!(
            "{} {}",
            StatusIcon::get_replica_icon(d.available_replicas, d.replicas),
            StatusIcon::get_status_text(d.available_replicas, d.replicas)
        );

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.add_row(vec![Cell::new("Deployment"), Cell::new(&d.name)]);
        table.add_row(vec![Cell::new("Namespace"), Cell::new(&d.namespace)]);
        table.add_row(vec![
            Cell::new("Replicas"),
            Cell::new(format!("{}/{}", d.available_replicas, d.replicas)).fg(color),
        ]);
        table.add_row(vec![Cell::new("Status"), Cell::new(status).fg(color)]);

        table.to_string()
    }

    /// Render the resources of a template grouped by kind
    pub fn render_template(&self, template: &TemplateContent) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("COUNT").set_alignment(CellAlignment::Center),
                Cell::new("NAMES").set_alignment(CellAlignment::Left),
            ]);

        for (kind, docs) in &template.resource {
            let names: Vec<&str> = docs
                .iter()
                .filter_map(|d| d.get("metadata")?.get("name")?.as_str())
                .collect();
            table.add_row(vec![
                Cell::new(kind).fg(self.theme.info),
                Cell::new(docs.len()).set_alignment(CellAlignment::Center),
                Cell::new(names.join(", ")),
            ]);
        }

        let mut output = format!(
            "Template: {} {}\n",
            template.name.bold(),
            format!("({})", template.description).bright_black()
        );
        if template.resource.is_empty() {
            output.push_str("No resources\n");
        } else {
            output.push_str(&table.to_string());
            output.push('\n');
        }
        output
    }

    /// Render cluster health
    pub fn render_health(&self, report: &HealthReport) -> String {
        let color = self.theme.get_health_color(report.status);
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        table.add_row(vec![
            Cell::new("Status"),
            Cell::new(format!(
                "{} {}",
                StatusIcon::get_health_icon(report.status),
                report.status
            ))
            .fg(color),
        ]);
        if let Some(version) = &report.version {
            table.add_row(vec![Cell::new("Version"), Cell::new(version)]);
        }
        if let Some(description) = &report.description {
            table.add_row(vec![
                Cell::new("Description"),
                Cell::new(description).fg(self.theme.muted),
            ]);
        }

        table.to_string()
    }
}

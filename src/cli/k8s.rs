//! Kubernetes environment commands

use crate::cli::display::TableRenderer;
use crate::cli::template::load_yaml_template;
use crate::domain::config::AppConfig;
use crate::domain::k8s::K8sServiceAdapter;
use crate::infrastructure::constants::{DEFAULT_PING_TIMEOUT_SECS, DEFAULT_WAIT_TIMEOUT_SECS};
use clap::{Args, Parser, Subcommand};
use std::path::Path;
use std::time::Duration;

#[derive(Subcommand, Debug)]
pub enum K8sCommands {
    /// Create the resources in a YAML file and report the deployment name
    Deploy(DeployCommand),

    /// Create every resource of a template (existing resources are kept)
    Apply(ApplyCommand),

    /// List deployments in all namespaces
    List(ListCommand),

    /// Show deployment availability
    Status(StatusCommand),

    /// Scale a deployment up
    Start(StartCommand),

    /// Scale a deployment to zero
    Stop(StopCommand),

    /// Delete a deployment
    Delete(DeleteCommand),

    /// Report API server health
    Health(HealthCommand),

    /// Check that an endpoint answers 200 OK (no cluster access)
    Ping(PingCommand),
}

impl K8sCommands {
    pub async fn execute(&self) -> anyhow::Result<()> {
        match self {
            K8sCommands::Deploy(cmd) => cmd.execute().await,
            K8sCommands::Apply(cmd) => cmd.execute().await,
            K8sCommands::List(cmd) => cmd.execute().await,
            K8sCommands::Status(cmd) => cmd.execute().await,
            K8sCommands::Start(cmd) => cmd.execute().await,
            K8sCommands::Stop(cmd) => cmd.execute().await,
            K8sCommands::Delete(cmd) => cmd.execute().await,
            K8sCommands::Health(cmd) => cmd.execute().await,
            K8sCommands::Ping(cmd) => cmd.execute().await,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct KubeArgs {
    /// Configuration file (TOML) whose [kubernetes] section supplies defaults
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<String>,

    /// Path to kubeconfig file
    /// If not specified, ./kubeconfig.json is used when present, then KUBECONFIG or ~/.kube/config
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    /// If not specified, uses current context from kubeconfig
    #[arg(long)]
    pub context: Option<String>,

    /// Kubernetes namespace (defaults to kubernetes.namespace, then "default")
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,
}

/// A connected adapter plus the namespace commands operate in.
struct Target {
    adapter: K8sServiceAdapter,
    namespace: String,
}

impl KubeArgs {
    async fn connect(&self) -> anyhow::Result<Target> {
        let conf = AppConfig::resolve(self.config_file.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
            .kubernetes;

        let kubeconfig = self.kubeconfig.clone().or_else(|| {
            Path::new(&conf.config_file)
                .exists()
                .then(|| conf.config_file.clone())
        });
        let context = self.context.clone().or(conf.context);
        let namespace = self.namespace.clone().unwrap_or(conf.namespace);

        let adapter = K8sServiceAdapter::new(kubeconfig, context)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes adapter: {}", e))?;

        Ok(Target { adapter, namespace })
    }
}

#[derive(Parser, Debug)]
pub struct DeployCommand {
    /// YAML manifests to create
    #[arg(long, short = 'f')]
    pub file: String,

    /// Deployment name to report
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub kube: KubeArgs,
}

impl DeployCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let yaml = std::fs::read_to_string(&self.file)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", self.file, e))?;

        let Target { adapter, namespace } = self.kube.connect().await?;
        let name = adapter
            .create_k8s_deployment_with_yaml(&yaml, &self.name, &namespace)
            .await
            .map_err(|e| anyhow::anyhow!("Deployment failed: {}", e))?;

        println!("Deployment {} ready in namespace {}", name, namespace);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct ApplyCommand {
    /// Template manifests
    #[arg(long, short = 'f')]
    pub file: String,

    /// Template name (defaults to the file stem)
    #[arg(long)]
    pub template_name: Option<String>,

    #[command(flatten)]
    pub kube: KubeArgs,
}

impl ApplyCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let template = load_yaml_template(&self.file, self.template_name.clone(), "")?;

        let Target { adapter, namespace } = self.kube.connect().await?;
        let created = adapter
            .create_from_template(&template, &namespace)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to apply template {}: {}", template.name, e))?;

        for resource in &created {
            println!("  {}", resource);
        }
        println!(
            "Template {} applied ({} resources)",
            template.name,
            created.len()
        );
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct ListCommand {
    #[command(flatten)]
    pub kube: KubeArgs,
}

impl ListCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let Target { adapter, .. } = self.kube.connect().await?;
        let deployments = adapter
            .list_deployment_availability()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list deployments: {}", e))?;

        println!("{}", TableRenderer::new().render_deployments(&deployments));
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct StatusCommand {
    /// Deployment name
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub kube: KubeArgs,
}

impl StatusCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let Target { adapter, namespace } = self.kube.connect().await?;
        let availability = adapter
            .get_deployment_by_name(&self.name, &namespace)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get deployment status: {}", e))?;

        println!(
            "{}",
            TableRenderer::new().render_deployment_status(&availability)
        );
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct StartCommand {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "1")]
    pub replicas: i32,

    /// Wait until all replicas are available
    #[arg(long)]
    pub wait: bool,

    /// Wait timeout in seconds
    #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
    pub timeout: u64,

    #[command(flatten)]
    pub kube: KubeArgs,
}

impl StartCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let Target { adapter, namespace } = self.kube.connect().await?;

        let result = if self.wait {
            adapter
                .start_k8s_service_and_wait(
                    &self.name,
                    &namespace,
                    self.replicas,
                    Duration::from_secs(self.timeout),
                )
                .await
        } else {
            adapter
                .start_k8s_service(&self.name, &namespace, self.replicas)
                .await
        };
        result.map_err(|e| anyhow::anyhow!("Failed to start {}: {}", self.name, e))?;

        println!("Service {} started ({} replicas)", self.name, self.replicas);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct StopCommand {
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub kube: KubeArgs,
}

impl StopCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let Target { adapter, namespace } = self.kube.connect().await?;
        adapter
            .stop_k8s_service(&self.name, &namespace)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to stop {}: {}", self.name, e))?;

        println!("Service {} stopped", self.name);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct DeleteCommand {
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub kube: KubeArgs,
}

impl DeleteCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let Target { adapter, namespace } = self.kube.connect().await?;
        adapter
            .delete_k8s_service(&self.name, &namespace)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to delete {}: {}", self.name, e))?;

        println!("Deployment {} deleted successfully!", self.name);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct HealthCommand {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub kube: KubeArgs,
}

impl HealthCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let Target { adapter, .. } = self.kube.connect().await?;
        let report = adapter.report_health().await;

        if self.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("{}", TableRenderer::new().render_health(&report));
        }

        if !report.is_ok() {
            anyhow::bail!("cluster is not healthy: {}", report.status);
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct PingCommand {
    #[arg(long)]
    pub url: String,

    /// Timeout in seconds
    #[arg(long, default_value_t = DEFAULT_PING_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl PingCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let ok =
            crate::infrastructure::remote::ping(&self.url, Duration::from_secs(self.timeout))
                .await;

        if !ok {
            anyhow::bail!("{} did not answer OK", self.url);
        }
        println!("{} OK", self.url);
        Ok(())
    }
}

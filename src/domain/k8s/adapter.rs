// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::health::HealthReport;
use super::is_valid_k8s_name;
use crate::domain::template::TemplateContent;
use crate::infrastructure::constants::DEFAULT_PING_TIMEOUT_SECS;
use crate::infrastructure::kubernetes::client::{HackathonKubeClient, HackathonKubeClientImpl};
use crate::infrastructure::kubernetes::manifest::Manifest;
use crate::infrastructure::remote;
use crate::shared::error::HackathonError;
use k8s_openapi::api::apps::v1::Deployment;
use serde::Serialize;
use std::time::Duration;

/// Availability summary of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentAvailability {
    pub name: String,
    pub namespace: String,
    pub replicas: i32,
    pub available_replicas: i32,
    pub available: bool,
}

impl DeploymentAvailability {
    pub fn from_deployment(deployment: &Deployment) -> Self {
        let replicas = deployment
            .spec
            .as_ref()
            .and_then(|s| s.replicas)
            .unwrap_or(1);
        let available_replicas = deployment
            .status
            .as_ref()
            .and_then(|s| s.available_replicas)
            .unwrap_or(0);

        Self {
            name: deployment.metadata.name.clone().unwrap_or_default(),
            namespace: deployment.metadata.namespace.clone().unwrap_or_default(),
            replicas,
            available_replicas,
            available: replicas > 0 && available_replicas >= replicas,
        }
    }
}

/// Deploys and inspects hackathon virtual environments on a Kubernetes
/// cluster. All reconciliation is left to the API server.
pub struct K8sServiceAdapter {
    client: Box<dyn HackathonKubeClient>,
}

impl K8sServiceAdapter {
    /// Loads the kubeconfig at `config_file` (default `./kubeconfig.json`).
    pub async fn new(
        config_file: Option<String>,
        context: Option<String>,
    ) -> Result<Self, HackathonError> {
        let client = HackathonKubeClientImpl::new_with_config(config_file, context)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to initialize Kubernetes client");
                e
            })?;

        Ok(Self {
            client: Box::new(client),
        })
    }

    pub fn with_client(client: Box<dyn HackathonKubeClient>) -> Self {
        Self { client }
    }

    /// Creates every document of `yaml`, then returns the name of deployment
    /// `name`. Documents that already exist are skipped; if any did, the
    /// environment counts as present and `name` is returned as is.
    pub async fn create_k8s_deployment_with_yaml(
        &self,
        yaml: &str,
        name: &str,
        namespace: &str,
    ) -> Result<String, HackathonError> {
        validate_target(name, namespace)?;

        let manifests = Manifest::parse_all(yaml).map_err(|e| {
            tracing::error!(error = %e, name = %name, "Invalid deployment yaml");
            e
        })?;

        let mut conflicts = 0usize;
        for manifest in &manifests {
            match self.client.create_manifest(manifest, namespace).await {
                Ok(()) => {}
                Err(e) if e.is_conflict() => {
                    tracing::info!(
                        kind = %manifest.kind(),
                        resource = %manifest.name().unwrap_or_default(),
                        namespace = %namespace,
                        "Resource already exists"
                    );
                    conflicts += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, name = %name, namespace = %namespace, "Failed to create resources");
                    return Err(e);
                }
            }
        }

        if conflicts > 0 {
            tracing::info!(name = %name, namespace = %namespace, conflicts, "Deployment already exists");
            return Ok(name.to_string());
        }

        let deployment = self.client.get_deployment(name, namespace).await.map_err(|e| {
            tracing::error!(error = %e, name = %name, namespace = %namespace, "Created deployment not readable");
            e
        })?;

        Ok(deployment
            .metadata
            .name
            .unwrap_or_else(|| name.to_string()))
    }

    /// Creates every resource of a template, kinds in sorted order.
    /// Already existing resources are skipped. Returns the resources touched
    /// as `kind/name`.
    pub async fn create_from_template(
        &self,
        template: &TemplateContent,
        namespace: &str,
    ) -> Result<Vec<String>, HackathonError> {
        if !is_valid_k8s_name(namespace) {
            return Err(HackathonError::config_error(format!(
                "Invalid namespace: {}",
                namespace
            )));
        }

        let mut created = Vec::with_capacity(template.resource_count());
        for doc in template.resource.values().flatten() {
            let manifest = Manifest::from_yaml_value(doc)?;
            let label = format!(
                "{}/{}",
                manifest.kind().to_lowercase(),
                manifest.name().unwrap_or_default()
            );

            match self.client.create_manifest(&manifest, namespace).await {
                Ok(()) => created.push(label),
                Err(e) if e.is_conflict() => {
                    tracing::info!(resource = %label, "Resource already exists, skipping");
                    created.push(label);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(template = %template.name, count = created.len(), "Template applied");
        Ok(created)
    }

    pub async fn deployment_exists(&self, name: &str) -> Result<bool, HackathonError> {
        Ok(self.list_deployments().await?.iter().any(|n| n == name))
    }

    /// Names of deployments in all namespaces.
    pub async fn list_deployments(&self) -> Result<Vec<String>, HackathonError> {
        let deployments = self.client.list_deployments().await?;
        Ok(deployments
            .into_iter()
            .filter_map(|d| d.metadata.name)
            .collect())
    }

    pub async fn list_deployment_availability(
        &self,
    ) -> Result<Vec<DeploymentAvailability>, HackathonError> {
        let deployments = self.client.list_deployments().await?;
        Ok(deployments
            .iter()
            .map(DeploymentAvailability::from_deployment)
            .collect())
    }

    pub async fn get_deployment_by_name(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<DeploymentAvailability, HackathonError> {
        let deployment = self.client.get_deployment(name, namespace).await?;
        let mut availability = DeploymentAvailability::from_deployment(&deployment);
        if availability.namespace.is_empty() {
            availability.namespace = namespace.to_string();
        }
        Ok(availability)
    }

    pub async fn start_k8s_service(
        &self,
        name: &str,
        namespace: &str,
        replicas: i32,
    ) -> Result<(), HackathonError> {
        validate_target(name, namespace)?;
        if replicas < 1 {
            return Err(HackathonError::config_error(format!(
                "replicas must be >= 1, got {}",
                replicas
            )));
        }

        self.client.scale_deployment(name, namespace, replicas).await?;
        tracing::info!(name = %name, namespace = %namespace, replicas, "Started service");
        Ok(())
    }

    /// Starts the service and blocks until every replica is available.
    pub async fn start_k8s_service_and_wait(
        &self,
        name: &str,
        namespace: &str,
        replicas: i32,
        timeout: Duration,
    ) -> Result<(), HackathonError> {
        self.start_k8s_service(name, namespace, replicas).await?;
        self.client
            .wait_for_deployment_available(name, namespace, timeout)
            .await
    }

    pub async fn stop_k8s_service(&self, name: &str, namespace: &str) -> Result<(), HackathonError> {
        validate_target(name, namespace)?;
        self.client.scale_deployment(name, namespace, 0).await?;
        tracing::info!(name = %name, namespace = %namespace, "Stopped service");
        Ok(())
    }

    pub async fn delete_k8s_service(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<(), HackathonError> {
        validate_target(name, namespace)?;
        self.client.delete_deployment(name, namespace).await?;
        tracing::info!(name = %name, namespace = %namespace, "Deleted service");
        Ok(())
    }

    /// Never fails: an unreachable API server is reported as `error`, an
    /// API server that answers but refuses to list deployments as `warning`.
    pub async fn report_health(&self) -> HealthReport {
        let version = match self.client.server_version().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Kubernetes API server unreachable");
                return HealthReport::error(e.to_string());
            }
        };

        match self.client.list_deployments().await {
            Ok(_) => HealthReport::ok(version),
            Err(e) => {
                let mut report = HealthReport::warning(e.to_string());
                report.version = Some(version);
                report
            }
        }
    }

    pub async fn ping(&self, url: &str, timeout: Option<Duration>) -> bool {
        remote::ping(
            url,
            timeout.unwrap_or(Duration::from_secs(DEFAULT_PING_TIMEOUT_SECS)),
        )
        .await
    }
}

fn validate_target(name: &str, namespace: &str) -> Result<(), HackathonError> {
    if !is_valid_k8s_name(name) {
        return Err(HackathonError::config_error(format!(
            "Invalid deployment name: {}",
            name
        )));
    }
    if !is_valid_k8s_name(namespace) {
        return Err(HackathonError::config_error(format!(
            "Invalid namespace: {}",
            namespace
        )));
    }
    Ok(())
}

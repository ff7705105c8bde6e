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

use super::manifest::Manifest;
use crate::infrastructure::constants::{DEFAULT_KUBECONFIG_FILE, FIELD_MANAGER, KIND_DEPLOYMENT};
use crate::shared::error::HackathonError;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{DeleteParams, DynamicObject, ListParams, Patch, PatchParams, PostParams};
use kube::discovery::Scope;
use kube::{Api, Client};
use std::path::Path;
use std::time::Duration;

#[async_trait::async_trait]
pub trait HackathonKubeClient: Send + Sync {
    /// Creates one manifest. A 409 from the API server is reported as
    /// `HackathonError::AlreadyExists`.
    async fn create_manifest(&self, manifest: &Manifest, namespace: &str)
        -> Result<(), HackathonError>;

    async fn get_deployment(&self, name: &str, namespace: &str)
        -> Result<Deployment, HackathonError>;

    /// Deployments across all namespaces.
    async fn list_deployments(&self) -> Result<Vec<Deployment>, HackathonError>;

    async fn scale_deployment(
        &self,
        name: &str,
        namespace: &str,
        replicas: i32,
    ) -> Result<(), HackathonError>;

    async fn delete_deployment(&self, name: &str, namespace: &str) -> Result<(), HackathonError>;

    async fn wait_for_deployment_available(
        &self,
        name: &str,
        namespace: &str,
        timeout: Duration,
    ) -> Result<(), HackathonError>;

    /// Git version reported by the API server.
    async fn server_version(&self) -> Result<String, HackathonError>;
}

pub struct HackathonKubeClientImpl {
    client: Client,
}

impl HackathonKubeClientImpl {
    pub async fn new() -> Result<Self, HackathonError> {
        let client = Client::try_default().await.map_err(|e| {
            HackathonError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn get_client(&self) -> Client {
        self.client.clone()
    }

    /// Loads `kubeconfig_path`, or `./kubeconfig.json` when it exists, or the
    /// default resolution (KUBECONFIG env or ~/.kube/config).
    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, HackathonError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let path = kubeconfig_path.or_else(|| {
            Path::new(DEFAULT_KUBECONFIG_FILE)
                .exists()
                .then(|| DEFAULT_KUBECONFIG_FILE.to_string())
        });

        let kubeconfig = if let Some(path) = path {
            tracing::debug!(path = %path, "Loading kubeconfig");
            Kubeconfig::read_from(&path).map_err(|e| {
                HackathonError::KubeError(format!("Failed to load kubeconfig {}: {}", path, e))
            })?
        } else {
            Kubeconfig::read().map_err(|e| {
                HackathonError::KubeError(format!("Failed to load kubeconfig: {}", e))
            })?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                HackathonError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            HackathonError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }

    fn map_api_error(
        err: kube::Error,
        resource_type: &str,
        name: &str,
        namespace: &str,
    ) -> HackathonError {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => {
                HackathonError::not_found(resource_type, name, namespace)
            }
            kube::Error::Api(ae) if ae.code == 409 => {
                HackathonError::already_exists(resource_type, name, namespace)
            }
            kube::Error::Api(ae) => HackathonError::KubeError(ae.message),
            other => HackathonError::KubeError(other.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl HackathonKubeClient for HackathonKubeClientImpl {
    async fn create_manifest(
        &self,
        manifest: &Manifest,
        namespace: &str,
    ) -> Result<(), HackathonError> {
        let (ar, caps) = kube::discovery::pinned_kind(&self.client, &manifest.gvk)
            .await
            .map_err(|e| {
                HackathonError::KubeError(format!(
                    "Failed to resolve {}: {}",
                    manifest.gvk.kind, e
                ))
            })?;

        let name = manifest.name().unwrap_or_default();
        let namespace = manifest.namespace().unwrap_or(namespace);
        let api: Api<DynamicObject> = match caps.scope {
            Scope::Namespaced => Api::namespaced_with(self.client.clone(), namespace, &ar),
            Scope::Cluster => Api::all_with(self.client.clone(), &ar),
        };

        let pp = PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        api.create(&pp, &manifest.object)
            .await
            .map_err(|e| Self::map_api_error(e, manifest.kind(), name, namespace))?;

        tracing::info!(kind = %manifest.kind(), name = %name, namespace = %namespace, "Created resource");
        Ok(())
    }

    async fn get_deployment(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Deployment, HackathonError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| Self::map_api_error(e, KIND_DEPLOYMENT, name, namespace))
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>, HackathonError> {
        let api: Api<Deployment> = Api::all(self.client.clone());
        api.list(&ListParams::default())
            .await
            .map(|list| list.items)
            .map_err(|e| HackathonError::KubeError(e.to_string()))
    }

    async fn scale_deployment(
        &self,
        name: &str,
        namespace: &str,
        replicas: i32,
    ) -> Result<(), HackathonError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let patch = serde_json::json!({ "spec": { "replicas": replicas } });

        let pp = PatchParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        api.patch(name, &pp, &Patch::Merge(&patch))
            .await
            .map_err(|e| Self::map_api_error(e, KIND_DEPLOYMENT, name, namespace))?;
        Ok(())
    }

    async fn delete_deployment(&self, name: &str, namespace: &str) -> Result<(), HackathonError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let dp = DeleteParams::default();

        api.delete(name, &dp)
            .await
            .map_err(|e| Self::map_api_error(e, KIND_DEPLOYMENT, name, namespace))?;
        Ok(())
    }

    async fn wait_for_deployment_available(
        &self,
        name: &str,
        namespace: &str,
        timeout: Duration,
    ) -> Result<(), HackathonError> {
        use kube::runtime::wait::await_condition;

        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let available = |obj: Option<&Deployment>| {
            obj.map(|d| {
                let desired = d.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
                let ready = d
                    .status
                    .as_ref()
                    .and_then(|s| s.available_replicas)
                    .unwrap_or(0);
                ready >= desired
            })
            .unwrap_or(false)
        };

        match tokio::time::timeout(timeout, await_condition(api, name, available)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(HackathonError::KubeError(e.to_string())),
            Err(_) => Err(HackathonError::Timeout(format!(
                "Deployment {}/{} not available after {:?}",
                namespace, name, timeout
            ))),
        }
    }

    async fn server_version(&self) -> Result<String, HackathonError> {
        let info = self.client.apiserver_version().await?;
        Ok(info.git_version)
    }
}

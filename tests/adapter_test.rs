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

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use open_hackathon::{
    HackathonError, HackathonKubeClient, K8sServiceAdapter, Manifest, TemplateContent,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory stand-in for the API server.
#[derive(Default)]
struct FakeCluster {
    /// (namespace, kind, name) of every created resource.
    resources: Vec<(String, String, String)>,
    deployments: BTreeMap<(String, String), Deployment>,
    version: Option<String>,
    list_fails: bool,
    create_fails: bool,
}

struct FakeKubeClient {
    cluster: Arc<Mutex<FakeCluster>>,
}

fn deployment(name: &str, namespace: &str, replicas: i32, available: i32) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            ..Default::default()
        }),
        status: Some(DeploymentStatus {
            available_replicas: Some(available),
            ..Default::default()
        }),
    }
}

#[async_trait]
impl HackathonKubeClient for FakeKubeClient {
    async fn create_manifest(
        &self,
        manifest: &Manifest,
        namespace: &str,
    ) -> Result<(), HackathonError> {
        let mut cluster = self.cluster.lock().unwrap();
        if cluster.create_fails {
            return Err(HackathonError::KubeError("admission webhook denied".into()));
        }

        let name = manifest.name().unwrap_or_default().to_string();
        let namespace = manifest.namespace().unwrap_or(namespace).to_string();
        let key = (namespace.clone(), manifest.kind().to_string(), name.clone());
        if cluster.resources.contains(&key) {
            return Err(HackathonError::already_exists(
                manifest.kind(),
                &name,
                &namespace,
            ));
        }
        cluster.resources.push(key);

        if manifest.kind() == "Deployment" {
            let replicas = manifest.object.data["spec"]["replicas"]
                .as_i64()
                .unwrap_or(1) as i32;
            cluster.deployments.insert(
                (namespace.clone(), name.clone()),
                deployment(&name, &namespace, replicas, 0),
            );
        }
        Ok(())
    }

    async fn get_deployment(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Deployment, HackathonError> {
        self.cluster
            .lock()
            .unwrap()
            .deployments
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| HackathonError::not_found("Deployment", name, namespace))
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>, HackathonError> {
        let cluster = self.cluster.lock().unwrap();
        if cluster.list_fails {
            return Err(HackathonError::KubeError("forbidden".into()));
        }
        Ok(cluster.deployments.values().cloned().collect())
    }

    async fn scale_deployment(
        &self,
        name: &str,
        namespace: &str,
        replicas: i32,
    ) -> Result<(), HackathonError> {
        let mut cluster = self.cluster.lock().unwrap();
        let d = cluster
            .deployments
            .get_mut(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| HackathonError::not_found("Deployment", name, namespace))?;
        d.spec.get_or_insert_with(Default::default).replicas = Some(replicas);
        Ok(())
    }

    async fn delete_deployment(&self, name: &str, namespace: &str) -> Result<(), HackathonError> {
        self.cluster
            .lock()
            .unwrap()
            .deployments
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| HackathonError::not_found("Deployment", name, namespace))
    }

    async fn wait_for_deployment_available(
        &self,
        name: &str,
        namespace: &str,
        _timeout: Duration,
    ) -> Result<(), HackathonError> {
        let mut cluster = self.cluster.lock().unwrap();
        let d = cluster
            .deployments
            .get_mut(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| HackathonError::not_found("Deployment", name, namespace))?;
        let desired = d.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
        d.status.get_or_insert_with(Default::default).available_replicas = Some(desired);
        Ok(())
    }

    async fn server_version(&self) -> Result<String, HackathonError> {
        self.cluster
            .lock()
            .unwrap()
            .version
            .clone()
            .ok_or_else(|| HackathonError::KubeError("connection refused".into()))
    }
}

fn fake_adapter() -> (K8sServiceAdapter, Arc<Mutex<FakeCluster>>) {
    let cluster = Arc::new(Mutex::new(FakeCluster {
        version: Some("v1.30.2".to_string()),
        ..Default::default()
    }));
    let adapter = K8sServiceAdapter::with_client(Box::new(FakeKubeClient {
        cluster: cluster.clone(),
    }));
    (adapter, cluster)
}

const JUPYTER_YAML: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: jupyter
spec:
  replicas: 2
---
apiVersion: v1
kind: Service
metadata:
  name: jupyter
"#;

#[tokio::test]
async fn test_create_deployment_with_yaml() {
    let (adapter, cluster) = fake_adapter();

    let name = adapter
        .create_k8s_deployment_with_yaml(JUPYTER_YAML, "jupyter", "team-a")
        .await
        .unwrap();
    assert_eq!(name, "jupyter");

    let cluster = cluster.lock().unwrap();
    assert_eq!(cluster.resources.len(), 2);
    assert!(cluster
        .resources
        .contains(&("team-a".into(), "Service".into(), "jupyter".into())));
}

#[tokio::test]
async fn test_create_conflict_returns_name() {
    let (adapter, _cluster) = fake_adapter();

    adapter
        .create_k8s_deployment_with_yaml(JUPYTER_YAML, "jupyter", "team-a")
        .await
        .unwrap();
    let name = adapter
        .create_k8s_deployment_with_yaml(JUPYTER_YAML, "jupyter", "team-a")
        .await
        .unwrap();
    assert_eq!(name, "jupyter");
}

#[tokio::test]
async fn test_create_continues_past_existing_resources() {
    let (adapter, cluster) = fake_adapter();
    cluster
        .lock()
        .unwrap()
        .resources
        .push(("team-a".into(), "Service".into(), "jupyter".into()));
    let service_first = r#"
apiVersion: v1
kind: Service
metadata:
  name: jupyter
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: jupyter
"#;

    let name = adapter
        .create_k8s_deployment_with_yaml(service_first, "jupyter", "team-a")
        .await
        .unwrap();
    assert_eq!(name, "jupyter");

    let cluster = cluster.lock().unwrap();
    assert_eq!(cluster.resources.len(), 2);
    assert!(cluster
        .deployments
        .contains_key(&("team-a".to_string(), "jupyter".to_string())));
}

#[tokio::test]
async fn test_create_failure_is_error() {
    let (adapter, cluster) = fake_adapter();
    cluster.lock().unwrap().create_fails = true;

    let err = adapter
        .create_k8s_deployment_with_yaml(JUPYTER_YAML, "jupyter", "team-a")
        .await
        .unwrap_err();
    assert!(matches!(err, HackathonError::KubeError(_)));
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let (adapter, cluster) = fake_adapter();

    assert!(adapter
        .create_k8s_deployment_with_yaml(JUPYTER_YAML, "Jupyter", "team-a")
        .await
        .is_err());
    assert!(adapter
        .create_k8s_deployment_with_yaml("metadata:\n  name: x\n", "x", "team-a")
        .await
        .is_err());
    assert!(cluster.lock().unwrap().resources.is_empty());
}

#[tokio::test]
async fn test_create_missing_deployment_is_not_found() {
    let (adapter, _cluster) = fake_adapter();
    let only_service = "apiVersion: v1\nkind: Service\nmetadata:\n  name: web\n";

    let err = adapter
        .create_k8s_deployment_with_yaml(only_service, "web", "default")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_from_template_skips_existing() {
    let (adapter, cluster) = fake_adapter();
    let template = TemplateContent::from_yaml("jupyter", "notebook lab", JUPYTER_YAML).unwrap();

    let created = adapter
        .create_from_template(&template, "team-a")
        .await
        .unwrap();
    assert_eq!(created, vec!["deployment/jupyter", "service/jupyter"]);

    let again = adapter
        .create_from_template(&template, "team-a")
        .await
        .unwrap();
    assert_eq!(again, created);
    assert_eq!(cluster.lock().unwrap().resources.len(), 2);

    assert!(adapter
        .create_from_template(&template, "Team_A")
        .await
        .is_err());
}

#[tokio::test]
async fn test_list_and_exists() {
    let (adapter, cluster) = fake_adapter();
    {
        let mut cluster = cluster.lock().unwrap();
        cluster.deployments.insert(
            ("a".into(), "web".into()),
            deployment("web", "a", 1, 1),
        );
        cluster.deployments.insert(
            ("b".into(), "db".into()),
            deployment("db", "b", 2, 1),
        );
    }

    let mut names = adapter.list_deployments().await.unwrap();
    names.sort();
    assert_eq!(names, vec!["db", "web"]);
    assert!(adapter.deployment_exists("web").await.unwrap());
    assert!(!adapter.deployment_exists("cache").await.unwrap());

    let availability = adapter.list_deployment_availability().await.unwrap();
    let db = availability.iter().find(|d| d.name == "db").unwrap();
    assert_eq!(db.replicas, 2);
    assert_eq!(db.available_replicas, 1);
    assert!(!db.available);

    let web = adapter.get_deployment_by_name("web", "a").await.unwrap();
    assert!(web.available);
    assert_eq!(web.namespace, "a");

    assert!(adapter
        .get_deployment_by_name("web", "b")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_start_stop_delete() {
    let (adapter, cluster) = fake_adapter();
    cluster.lock().unwrap().deployments.insert(
        ("default".into(), "web".into()),
        deployment("web", "default", 1, 1),
    );

    adapter.stop_k8s_service("web", "default").await.unwrap();
    let status = adapter.get_deployment_by_name("web", "default").await.unwrap();
    assert_eq!(status.replicas, 0);
    assert!(!status.available);

    assert!(adapter.start_k8s_service("web", "default", 0).await.is_err());

    adapter
        .start_k8s_service_and_wait("web", "default", 3, Duration::from_secs(5))
        .await
        .unwrap();
    let status = adapter.get_deployment_by_name("web", "default").await.unwrap();
    assert_eq!(status.replicas, 3);
    assert!(status.available);

    adapter.delete_k8s_service("web", "default").await.unwrap();
    assert!(!adapter.deployment_exists("web").await.unwrap());
    assert!(adapter
        .delete_k8s_service("web", "default")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_report_health() {
    let (adapter, cluster) = fake_adapter();

    let report = adapter.report_health().await;
    assert!(report.is_ok());
    assert_eq!(report.version.as_deref(), Some("v1.30.2"));

    cluster.lock().unwrap().list_fails = true;
    let report = adapter.report_health().await;
    assert_eq!(report.status, "warning");
    assert_eq!(report.version.as_deref(), Some("v1.30.2"));

    cluster.lock().unwrap().version = None;
    let report = adapter.report_health().await;
    assert_eq!(report.status, "error");
    assert!(report.description.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_ping() {
    use httpmock::prelude::*;

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200).body("OK");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/busy");
            then.status(200).body("OK but busy");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/down");
            then.status(503).body("OK");
        })
        .await;

    let (adapter, _cluster) = fake_adapter();
    assert!(adapter.ping(&server.url("/health"), None).await);
    assert!(!adapter.ping(&server.url("/busy"), None).await);
    assert!(!adapter.ping(&server.url("/down"), None).await);
    assert!(
        !adapter
            .ping("http://127.0.0.1:1/", Some(Duration::from_secs(1)))
            .await
    );
}

#[tokio::test]
#[ignore = "requires a Kubernetes cluster"]
async fn test_live_cluster_health() {
    let adapter = K8sServiceAdapter::new(None, None).await.unwrap();
    let report = adapter.report_health().await;
    assert!(report.is_ok(), "{:?}", report);
    adapter.list_deployments().await.unwrap();
}

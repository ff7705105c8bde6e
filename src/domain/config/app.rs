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

use crate::domain::k8s::is_valid_k8s_name;
use crate::infrastructure::constants::{
    CONF_FILE_ENV, DEFAULT_BIND_ADDR, DEFAULT_HACKATHON_API_ENDPOINT, DEFAULT_KUBECONFIG_FILE,
    DEFAULT_NAMESPACE, DEFAULT_SESSION_LIFETIME_MINUTES, LOGIN_PROVIDERS,
    MAX_SESSION_LIFETIME_MINUTES,
};
use crate::shared::error::HackathonError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::read_to_string;
use std::net::SocketAddr;

// ============================================================================
// Application configuration
// ============================================================================

/// Front-end and adapter configuration, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConf,
    #[serde(rename = "hackathon-api")]
    pub hackathon_api: HackathonApiConf,
    pub login: LoginConf,
    /// Exposed verbatim to the browser through `/config.js`.
    pub javascript: Map<String, Value>,
    pub kubernetes: KubernetesConf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConf::default(),
            hackathon_api: HackathonApiConf::default(),
            login: LoginConf::default(),
            javascript: Map::new(),
            kubernetes: KubernetesConf::default(),
        }
    }
}

impl AppConfig {
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self, HackathonError> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            HackathonError::config_error(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        Ok(conf)
    }

    /// Explicit path first, then `OPEN_HACKATHON_CONF_FILE`, then defaults.
    pub fn resolve(config_file: Option<&str>) -> Result<Self, HackathonError> {
        if let Some(path) = config_file {
            return Self::from(path);
        }

        match std::env::var(CONF_FILE_ENV) {
            Ok(env_path) if !env_path.is_empty() => Self::from(&env_path),
            _ => {
                tracing::info!("No configuration file specified, using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), HackathonError> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|e| {
                HackathonError::config_error(format!(
                    "Invalid server.bind '{}': {}",
                    self.server.bind, e
                ))
            })?;

        let lifetime = self.server.session_lifetime_minutes;
        if !(1..=MAX_SESSION_LIFETIME_MINUTES).contains(&lifetime) {
            return Err(HackathonError::config_error(format!(
                "server.session_lifetime_minutes must be between 1 and {}, got {}",
                MAX_SESSION_LIFETIME_MINUTES, lifetime
            )));
        }

        let endpoint = &self.hackathon_api.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(HackathonError::config_error(format!(
                "Invalid hackathon-api.endpoint: {}",
                endpoint
            )));
        }

        for provider in &self.login.provider_enabled {
            if !LOGIN_PROVIDERS.contains(&provider.as_str()) {
                return Err(HackathonError::config_error(format!(
                    "Unknown login provider: {} (supported: {})",
                    provider,
                    LOGIN_PROVIDERS.join(", ")
                )));
            }
        }

        if !is_valid_k8s_name(&self.kubernetes.namespace) {
            return Err(HackathonError::config_error(format!(
                "Invalid kubernetes.namespace: {}",
                self.kubernetes.namespace
            )));
        }

        Ok(())
    }

    /// OAuth verification meta tags rendered into every page.
    pub fn oauth_meta_content(&self) -> MetaContent {
        MetaContent {
            weibo: self.login.weibo.meta_content.clone(),
            qq: self.login.qq.meta_content.clone(),
        }
    }

    /// Body of `/config.js`.
    pub fn javascript_config(&self) -> String {
        format!("var CONFIG={}", Value::Object(self.javascript.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaContent {
    pub weibo: String,
    pub qq: String,
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConf {
    pub bind: String,
    pub session_lifetime_minutes: i64,
}

impl Default for ServerConf {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
            session_lifetime_minutes: DEFAULT_SESSION_LIFETIME_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HackathonApiConf {
    pub endpoint: String,
}

impl Default for HackathonApiConf {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HACKATHON_API_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginConf {
    pub provider_enabled: Vec<String>,
    pub weibo: ProviderMetaConf,
    pub qq: ProviderMetaConf,
}

impl Default for LoginConf {
    fn default() -> Self {
        Self {
            provider_enabled: LOGIN_PROVIDERS.iter().map(|p| p.to_string()).collect(),
            weibo: ProviderMetaConf::default(),
            qq: ProviderMetaConf::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderMetaConf {
    pub meta_content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KubernetesConf {
    pub config_file: String,
    pub context: Option<String>,
    pub namespace: String,
}

impl Default for KubernetesConf {
    fn default() -> Self {
        Self {
            config_file: DEFAULT_KUBECONFIG_FILE.to_string(),
            context: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

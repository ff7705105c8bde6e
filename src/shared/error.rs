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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, HackathonError>;

#[derive(Error, Debug)]
pub enum HackathonError {
    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Resource already exists: {resource_type} '{name}' in namespace '{namespace}'")]
    AlreadyExists {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Remote API error: {0}")]
    RemoteError(String),

    #[error("Remote API error: {url} returned {status}")]
    RemoteStatus { url: String, status: u16 },

    #[error("Remote API unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for HackathonError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => HackathonError::NotFound {
                resource_type: String::new(),
                name: ae.message,
                namespace: String::new(),
            },
            kube::Error::Api(ae) if ae.code == 409 => HackathonError::AlreadyExists {
                resource_type: String::new(),
                name: ae.message,
                namespace: String::new(),
            },
            other => HackathonError::KubeError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for HackathonError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            HackathonError::RemoteUnavailable(err.to_string())
        } else {
            HackathonError::RemoteError(err.to_string())
        }
    }
}

impl HackathonError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn invalid_template(context: impl Into<String>) -> Self {
        Self::InvalidTemplate(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn already_exists(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// True for HTTP 409 style failures.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Failures worth retrying: unreachable remote, timeouts and 5xx answers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RemoteUnavailable(_) | Self::Timeout(_) => true,
            Self::RemoteStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

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

//! Legacy template units: one virtual environment per dict.

use super::provider::VeProvider;
use crate::infrastructure::constants::{
    UNIT_COMMAND, UNIT_IMAGE, UNIT_NAME, UNIT_PORTS, UNIT_YAML_TEMPLATE,
};
use crate::shared::error::HackathonError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A port exposed by a virtual environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    #[serde(default)]
    pub name: String,
    pub port: u16,
    #[serde(default)]
    pub public: bool,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn default_protocol() -> String {
    "tcp".to_string()
}

fn parse_ports(dic: &Map<String, Value>) -> Result<Vec<PortSpec>, HackathonError> {
    match dic.get(UNIT_PORTS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| HackathonError::invalid_template(format!("invalid ports: {}", e))),
    }
}

fn required_str<'a>(dic: &'a Map<String, Value>, key: &str) -> Result<&'a str, HackathonError> {
    dic.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| HackathonError::invalid_template(format!("unit is missing '{}'", key)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DockerTemplateUnit {
    dic: Map<String, Value>,
}

impl DockerTemplateUnit {
    pub fn new(dic: Map<String, Value>) -> Result<Self, HackathonError> {
        required_str(&dic, UNIT_NAME)?;
        required_str(&dic, UNIT_IMAGE)?;
        parse_ports(&dic)?;
        Ok(Self { dic })
    }

    pub fn name(&self) -> &str {
        self.dic.get(UNIT_NAME).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn image(&self) -> &str {
        self.dic.get(UNIT_IMAGE).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn ports(&self) -> Vec<PortSpec> {
        parse_ports(&self.dic).unwrap_or_default()
    }

    pub fn command(&self) -> Vec<String> {
        self.dic
            .get(UNIT_COMMAND)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn dic(&self) -> &Map<String, Value> {
        &self.dic
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct K8sTemplateUnit {
    dic: Map<String, Value>,
}

impl K8sTemplateUnit {
    pub fn new(dic: Map<String, Value>) -> Result<Self, HackathonError> {
        required_str(&dic, UNIT_NAME)?;
        parse_ports(&dic)?;
        Ok(Self { dic })
    }

    pub fn name(&self) -> &str {
        self.dic.get(UNIT_NAME).and_then(Value::as_str).unwrap_or_default()
    }

    /// Inline manifest stream for this environment, if any.
    pub fn yaml_template(&self) -> Option<&str> {
        self.dic.get(UNIT_YAML_TEMPLATE).and_then(Value::as_str)
    }

    pub fn ports(&self) -> Vec<PortSpec> {
        parse_ports(&self.dic).unwrap_or_default()
    }

    pub fn dic(&self) -> &Map<String, Value> {
        &self.dic
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateUnit {
    Docker(DockerTemplateUnit),
    K8s(K8sTemplateUnit),
}

impl TemplateUnit {
    pub fn from_value(value: &Value) -> Result<Self, HackathonError> {
        use crate::infrastructure::constants::TEMPLATE_VIRTUAL_ENVIRONMENT_PROVIDER;

        let dic = value
            .as_object()
            .ok_or_else(|| HackathonError::invalid_template("unit must be an object"))?;
        let provider_value = dic
            .get(TEMPLATE_VIRTUAL_ENVIRONMENT_PROVIDER)
            .ok_or_else(|| HackathonError::invalid_template("unit is missing 'provider'"))?;

        match VeProvider::from_value(provider_value)? {
            VeProvider::Docker => Ok(TemplateUnit::Docker(DockerTemplateUnit::new(dic.clone())?)),
            VeProvider::K8s => Ok(TemplateUnit::K8s(K8sTemplateUnit::new(dic.clone())?)),
            VeProvider::Azure => Err(HackathonError::Unsupported(
                "azure virtual environments".to_string(),
            )),
            VeProvider::Alauda => Err(HackathonError::Unsupported(
                "unsupported virtual environment provider: alauda".to_string(),
            )),
        }
    }

    pub fn provider(&self) -> VeProvider {
        match self {
            TemplateUnit::Docker(_) => VeProvider::Docker,
            TemplateUnit::K8s(_) => VeProvider::K8s,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TemplateUnit::Docker(u) => u.name(),
            TemplateUnit::K8s(u) => u.name(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            TemplateUnit::Docker(u) => Value::Object(u.dic().clone()),
            TemplateUnit::K8s(u) => Value::Object(u.dic().clone()),
        }
    }
}

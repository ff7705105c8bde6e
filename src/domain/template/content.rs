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

use super::unit::TemplateUnit;
use crate::infrastructure::constants::{
    TEMPLATE_DESCRIPTION, TEMPLATE_NAME, TEMPLATE_VIRTUAL_ENVIRONMENTS,
};
use crate::shared::error::HackathonError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// The content of a template, used for both saving and loading.
///
/// A template is described either by a stream of Kubernetes manifests
/// (`resource`, keyed by lowercase kind) or by a list of legacy units.
/// Nothing ties the two forms together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContent {
    pub name: String,
    pub description: String,
    pub resource: BTreeMap<String, Vec<serde_yaml::Value>>,
    pub cluster_info: Option<Value>,
    pub units: Vec<TemplateUnit>,
}

impl TemplateContent {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn from_yaml(
        name: impl Into<String>,
        description: impl Into<String>,
        yaml_content: &str,
    ) -> Result<Self, HackathonError> {
        let mut content = Self::new(name, description);

        for (idx, document) in serde_yaml::Deserializer::from_str(yaml_content).enumerate() {
            let doc = serde_yaml::Value::deserialize(document)?;
            if doc.is_null() {
                continue;
            }

            let kind = match doc.get("kind") {
                Some(serde_yaml::Value::String(s)) => s.to_lowercase(),
                Some(serde_yaml::Value::Number(n)) => n.to_string(),
                Some(serde_yaml::Value::Bool(b)) => b.to_string(),
                _ => {
                    return Err(HackathonError::invalid_template(format!(
                        "document {} has no 'kind'",
                        idx
                    )))
                }
            };

            content.resource.entry(kind).or_default().push(doc);
        }

        Ok(content)
    }

    /// Always returns a list, empty when the kind is absent.
    pub fn get_resource(&self, resource_type: &str) -> &[serde_yaml::Value] {
        self.resource
            .get(&resource_type.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn resource_kinds(&self) -> Vec<&str> {
        self.resource.keys().map(String::as_str).collect()
    }

    pub fn resource_count(&self) -> usize {
        self.resource.values().map(Vec::len).sum()
    }

    pub fn to_yaml(&self) -> Result<String, HackathonError> {
        let mut docs = Vec::with_capacity(self.resource_count());
        for doc in self.resource.values().flatten() {
            docs.push(serde_yaml::to_string(doc)?);
        }
        Ok(docs.join("---\n"))
    }

    pub fn from_dict(args: &Value) -> Result<Self, HackathonError> {
        let name = dict_str(args, TEMPLATE_NAME)?;
        let description = dict_str(args, TEMPLATE_DESCRIPTION)?;
        let units = args
            .get(TEMPLATE_VIRTUAL_ENVIRONMENTS)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                HackathonError::invalid_template(format!(
                    "'{}' must be a list",
                    TEMPLATE_VIRTUAL_ENVIRONMENTS
                ))
            })?
            .iter()
            .map(TemplateUnit::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        let mut content = Self::new(name, description);
        content.units = units;
        Ok(content)
    }

    pub fn to_dict(&self) -> Value {
        let units: Vec<Value> = self.units.iter().map(TemplateUnit::to_value).collect();
        json!({
            TEMPLATE_NAME: self.name,
            TEMPLATE_DESCRIPTION: self.description,
            TEMPLATE_VIRTUAL_ENVIRONMENTS: units,
        })
    }
}

fn dict_str(args: &Value, key: &str) -> Result<String, HackathonError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| HackathonError::invalid_template(format!("template is missing '{}'", key)))
}

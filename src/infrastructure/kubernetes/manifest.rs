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

//! Typed view over a single manifest document.

use crate::shared::error::HackathonError;
use kube::api::DynamicObject;
use kube::core::GroupVersionKind;

#[derive(Debug, Clone)]
pub struct Manifest {
    pub gvk: GroupVersionKind,
    pub object: DynamicObject,
}

impl Manifest {
    pub fn from_yaml_value(doc: &serde_yaml::Value) -> Result<Self, HackathonError> {
        let object: DynamicObject = serde_yaml::from_value(doc.clone())?;
        let types = object.types.as_ref().ok_or_else(|| {
            HackathonError::invalid_template("manifest is missing apiVersion/kind")
        })?;

        let (group, version) = match types.api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", types.api_version.as_str()),
        };
        if version.is_empty() || types.kind.is_empty() {
            return Err(HackathonError::invalid_template(format!(
                "invalid apiVersion/kind: '{}' '{}'",
                types.api_version, types.kind
            )));
        }

        let gvk = GroupVersionKind::gvk(group, version, &types.kind);
        Ok(Self { gvk, object })
    }

    /// Parses every non-empty document of a YAML stream.
    pub fn parse_all(yaml: &str) -> Result<Vec<Self>, HackathonError> {
        use serde::Deserialize;

        let mut manifests = Vec::new();
        for document in serde_yaml::Deserializer::from_str(yaml) {
            let doc = serde_yaml::Value::deserialize(document)?;
            if doc.is_null() {
                continue;
            }
            manifests.push(Self::from_yaml_value(&doc)?);
        }
        Ok(manifests)
    }

    pub fn name(&self) -> Option<&str> {
        self.object.metadata.name.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.gvk.kind
    }

    /// Namespace declared in the manifest, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.object.metadata.namespace.as_deref()
    }
}

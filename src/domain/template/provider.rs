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

use crate::shared::error::HackathonError;
use serde_json::Value;

/// Backend that hosts a virtual environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VeProvider {
    Docker,
    Azure,
    Alauda,
    K8s,
}

impl VeProvider {
    pub fn code(&self) -> i64 {
        match self {
            VeProvider::Docker => 0,
            VeProvider::Azure => 1,
            VeProvider::Alauda => 2,
            VeProvider::K8s => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, HackathonError> {
        match code {
            0 => Ok(VeProvider::Docker),
            1 => Ok(VeProvider::Azure),
            2 => Ok(VeProvider::Alauda),
            3 => Ok(VeProvider::K8s),
            _ => Err(HackathonError::Unsupported(format!(
                "unsupported virtual environment provider: {}",
                code
            ))),
        }
    }

    /// Accepts both `3` and `"3"`.
    pub fn from_value(value: &Value) -> Result<Self, HackathonError> {
        let code = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            HackathonError::invalid_template(format!("invalid provider value: {}", value))
        })?;

        Self::from_code(code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VeProvider::Docker => "docker",
            VeProvider::Azure => "azure",
            VeProvider::Alauda => "alauda",
            VeProvider::K8s => "k8s",
        }
    }
}

impl std::fmt::Display for VeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

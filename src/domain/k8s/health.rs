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

use crate::infrastructure::constants::{
    HEALTH_STATUS_ERROR, HEALTH_STATUS_OK, HEALTH_STATUS_WARNING,
};
use serde::Serialize;

/// Cluster health as reported to the platform's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HealthReport {
    pub fn ok(version: impl Into<String>) -> Self {
        Self {
            status: HEALTH_STATUS_OK,
            version: Some(version.into()),
            description: None,
        }
    }

    pub fn warning(description: impl Into<String>) -> Self {
        Self {
            status: HEALTH_STATUS_WARNING,
            version: None,
            description: Some(description.into()),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            status: HEALTH_STATUS_ERROR,
            version: None,
            description: Some(description.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HEALTH_STATUS_OK
    }
}

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

//! Kubernetes service adapter domain

pub mod adapter;
pub mod health;

pub use self::adapter::{DeploymentAvailability, K8sServiceAdapter};
pub use self::health::HealthReport;

use regex::Regex;
use std::sync::OnceLock;

/// RFC 1123 label: lowercase alphanumerics and '-', alphanumeric at both ends.
pub(crate) fn is_valid_k8s_name(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();

    if name.is_empty() || name.len() > 63 {
        return false;
    }

    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("static regex is valid")
    })
    .is_match(name)
}

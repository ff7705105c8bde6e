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

use super::app::AppConfig;
use std::collections::HashMap;

/// Applies `-D key=value` overrides on top of the loaded configuration.
/// Unknown keys are ignored with a warning; unparsable numbers are skipped.
pub fn apply_to_app_config(configs: &HashMap<String, String>, conf: &mut AppConfig) {
    for (key, value) in configs {
        match key.as_str() {
            "server.bind" => conf.server.bind = value.clone(),
            "server.session-lifetime-minutes" => {
                if let Ok(minutes) = value.parse::<i64>() {
                    conf.server.session_lifetime_minutes = minutes;
                } else {
                    tracing::warn!(key = %key, value = %value, "Ignoring non-numeric override");
                }
            }
            "hackathon-api.endpoint" => {
                conf.hackathon_api.endpoint = value.trim_end_matches('/').to_string()
            }
            "login.provider-enabled" => conf.login.provider_enabled = parse_list(value),
            "login.weibo.meta-content" => conf.login.weibo.meta_content = value.clone(),
            "login.qq.meta-content" => conf.login.qq.meta_content = value.clone(),
            "kubernetes.config-file" => conf.kubernetes.config_file = value.clone(),
            "kubernetes.context" => conf.kubernetes.context = Some(value.clone()),
            "kubernetes.namespace" => conf.kubernetes.namespace = value.clone(),
            _ => {
                if let Some(js_key) = key.strip_prefix("javascript.") {
                    conf.javascript
                        .insert(js_key.to_string(), serde_json::Value::String(value.clone()));
                } else {
                    tracing::warn!(key = %key, "Unknown configuration override");
                }
            }
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

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

/// Kubernetes client defaults
pub const DEFAULT_KUBECONFIG_FILE: &str = "./kubeconfig.json";
pub const DEFAULT_NAMESPACE: &str = "default";
pub const FIELD_MANAGER: &str = "open-hackathon";

/// Health checks
pub const DEFAULT_PING_TIMEOUT_SECS: u64 = 20;
pub const PING_OK_BODY: &str = "OK";
pub const HEALTH_STATUS_OK: &str = "ok";
pub const HEALTH_STATUS_WARNING: &str = "warning";
pub const HEALTH_STATUS_ERROR: &str = "error";

/// Deployment waits
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 300;

/// Web server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SESSION_LIFETIME_MINUTES: i64 = 60;
pub const MAX_SESSION_LIFETIME_MINUTES: i64 = 525_600;
pub const SESSION_COOKIE: &str = "session";
pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_HEADER: &str = "token";

/// hackathon-api
pub const DEFAULT_HACKATHON_API_ENDPOINT: &str = "http://localhost:15000";
pub const HACKATHON_API_TIMEOUT_SECS: u64 = 30;
pub const USER_LOOKUP_MAX_RETRIES: usize = 2;

/// Login providers with an OAuth callback route
pub const LOGIN_PROVIDERS: [&str; 4] = ["github", "qq", "gitcafe", "weibo"];

/// Template dict keys
pub const TEMPLATE_NAME: &str = "name";
pub const TEMPLATE_DESCRIPTION: &str = "description";
pub const TEMPLATE_VIRTUAL_ENVIRONMENTS: &str = "virtual_environments";
pub const TEMPLATE_VIRTUAL_ENVIRONMENT_PROVIDER: &str = "provider";

/// Template unit keys
pub const UNIT_NAME: &str = "name";
pub const UNIT_IMAGE: &str = "image";
pub const UNIT_PORTS: &str = "ports";
pub const UNIT_COMMAND: &str = "command";
pub const UNIT_YAML_TEMPLATE: &str = "yaml_template";

/// Manifest kinds
pub const KIND_DEPLOYMENT: &str = "deployment";

/// Config file environment variable
pub const CONF_FILE_ENV: &str = "OPEN_HACKATHON_CONF_FILE";

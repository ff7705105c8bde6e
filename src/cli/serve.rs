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

//! Web front-end command

use crate::cli::parse_dynamic_configs;
use crate::domain::config::{apply_to_app_config, AppConfig};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Path to the configuration file (TOML)
    /// If not provided, OPEN_HACKATHON_CONF_FILE is used, then defaults
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<String>,

    /// Listen address (overrides server.bind)
    #[arg(long)]
    pub bind: Option<String>,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// Server: server.bind, server.session-lifetime-minutes
    /// Remote: hackathon-api.endpoint
    /// Login: login.provider-enabled (comma-separated), login.weibo.meta-content, login.qq.meta-content
    /// Browser: javascript.<key>
    ///
    /// Example: -Dhackathon-api.endpoint=http://api:15000 -Dlogin.provider-enabled=github,qq
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl ServeCommand {
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::resolve(self.config_file.as_deref())?;

        if !self.properties.is_empty() {
            let overrides = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_app_config(&overrides, &mut config);
        }

        if let Some(ref bind) = self.bind {
            config.server.bind = bind.clone();
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
        Ok(config)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        crate::web::serve(config)
            .await
            .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))
    }
}

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

use super::session::SessionStore;
use crate::domain::config::AppConfig;
use crate::infrastructure::remote::HackathonApiClient;
use crate::shared::error::HackathonError;

/// Shared by every handler.
pub struct AppState {
    pub config: AppConfig,
    pub api: HackathonApiClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, HackathonError> {
        let api = HackathonApiClient::new(config.hackathon_api.endpoint.clone())?;
        let sessions = SessionStore::new(config.server.session_lifetime_minutes);

        tracing::info!(
            endpoint = %api.endpoint(),
            bind = %config.server.bind,
            session_lifetime_minutes = config.server.session_lifetime_minutes,
            providers = ?config.login.provider_enabled,
            "Loaded configuration"
        );

        Ok(Self {
            config,
            api,
            sessions,
        })
    }
}

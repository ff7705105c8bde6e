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

//! HTTP client for the hackathon-api service

use crate::domain::user::{LoginResult, LoginUser};
use crate::infrastructure::constants::{
    HACKATHON_API_TIMEOUT_SECS, TOKEN_HEADER, USER_LOOKUP_MAX_RETRIES,
};
use crate::shared::error::HackathonError;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Wraps every call the front-end makes to hackathon-api, sharing one
/// connection pool.
#[derive(Clone)]
pub struct HackathonApiClient {
    client: Client,
    endpoint: String,
}

impl HackathonApiClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, HackathonError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HACKATHON_API_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Exchanges an OAuth callback code for a login result.
    ///
    /// POST {endpoint}/api/user/login
    pub async fn login(
        &self,
        provider: &str,
        code: Option<&str>,
    ) -> Result<LoginResult, HackathonError> {
        let url = format!("{}/api/user/login", self.endpoint);
        let body = serde_json::json!({ "provider": provider, "code": code });

        let resp = self.client.post(&url).json(&body).send().await?;
        Self::parse_json(resp, &url).await
    }

    /// GET {endpoint}/api/user?uid={id}. Only transient failures are retried.
    pub async fn get_user(&self, uid: i64) -> Result<LoginUser, HackathonError> {
        let url = format!("{}/api/user?uid={}", self.endpoint, uid);
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(100))
            .with_max_times(USER_LOOKUP_MAX_RETRIES);

        let (client, url) = (&self.client, url.as_str());
        let fetch = || async move {
            let resp = client.get(url).send().await?;
            Self::parse_json::<LoginUser>(resp, url).await
        };

        fetch
            .retry(&backoff)
            .when(HackathonError::is_transient)
            .notify(|e, delay| tracing::debug!(uid, error = %e, ?delay, "Retrying user lookup"))
            .await
    }

    /// DELETE {endpoint}/api/user/login?uid={id} with the session token.
    pub async fn logout(&self, uid: i64, token: &str) -> Result<(), HackathonError> {
        let url = format!("{}/api/user/login?uid={}", self.endpoint, uid);
        let resp = self
            .client
            .delete(&url)
            .header(TOKEN_HEADER, token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(HackathonError::RemoteStatus {
                url,
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }

    async fn parse_json<T: DeserializeOwned>(
        resp: Response,
        url: &str,
    ) -> Result<T, HackathonError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(HackathonError::RemoteStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

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

use crate::infrastructure::constants::PING_OK_BODY;
use std::time::Duration;

/// True iff GET `url` answers 200 with body exactly `OK` within `timeout`.
pub async fn ping(url: &str, timeout: Duration) -> bool {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build ping client");
            return false;
        }
    };

    match client.get(url).send().await {
        Ok(resp) if resp.status() == reqwest::StatusCode::OK => match resp.text().await {
            Ok(body) => body == PING_OK_BODY,
            Err(_) => false,
        },
        Ok(resp) => {
            tracing::debug!(url = %url, status = %resp.status(), "Ping returned non-200");
            false
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Ping failed");
            false
        }
    }
}

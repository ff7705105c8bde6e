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

//! Session principals built from hackathon-api responses

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The logged-in user. Never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

/// Result of exchanging an OAuth code with hackathon-api.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
    pub token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub register_state: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experiments: Vec<Value>,
}

/// hackathon-api sends `null` for unset optional fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LoginResult {
    pub fn user(&self) -> LoginUser {
        LoginUser {
            id: self.id,
            name: self.name.clone(),
            nickname: self.nickname.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }

    pub fn has_experiments(&self) -> bool {
        !self.experiments.is_empty()
    }
}

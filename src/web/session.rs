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

//! In-memory sessions keyed by a random cookie id

use crate::infrastructure::constants::{MAX_SESSION_LIFETIME_MINUTES, SESSION_COOKIE};
use axum::http::{header::COOKIE, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
    pub register_state: bool,
    pub expires_at: DateTime<Utc>,
}

/// Sessions expire `lifetime` after their last use.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    lifetime: Duration,
}

impl SessionStore {
    /// `lifetime_minutes` is clamped to `1..=MAX_SESSION_LIFETIME_MINUTES`.
    pub fn new(lifetime_minutes: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            lifetime: Duration::minutes(lifetime_minutes.clamp(1, MAX_SESSION_LIFETIME_MINUTES)),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Opens a session and returns its id.
    pub async fn create(&self, user_id: i64, token: String, register_state: bool) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Session {
            user_id,
            token,
            register_state,
            expires_at: Utc::now() + self.lifetime,
        };

        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    /// Returns the live session and pushes its expiry forward. Expired
    /// sessions are dropped.
    pub async fn touch(&self, id: &str) -> Option<Session> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(id) {
            Some(session) if session.expires_at > now => {
                session.expires_at = now + self.lifetime;
                Some(session.clone())
            }
            Some(_) => {
                sessions.remove(id);
                None
            }
            None => None,
        }
    }

    pub async fn remove(&self, id: &str) -> Option<Session> {
        self.sessions.write().await.remove(id)
    }

    /// Drops every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    #[cfg(test)]
    async fn expire_now(&self, id: &str) {
        if let Some(s) = self.sessions.write().await.get_mut(id) {
            s.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

/// Reads a cookie value from the request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

pub fn session_id(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).filter(|v| !v.is_empty())
}

/// RFC 6265 cookie-octets only: no whitespace, quotes, commas, semicolons,
/// backslashes or control characters.
pub fn is_cookie_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

/// `http_only` is off for cookies the browser scripts must read. `value`
/// must satisfy [`is_cookie_value`].
pub fn set_cookie(name: &str, value: &str, max_age: Duration, http_only: bool) -> String {
    format!(
        "{}={}; Path=/;{} Max-Age={}",
        name,
        value,
        if http_only { " HttpOnly;" } else { "" },
        max_age.num_seconds()
    )
}

pub fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", name)
}

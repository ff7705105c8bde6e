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

//! Page routing, OAuth callbacks and logout

use super::error::{WebError, WebResult};
use super::pages::{is_simple_page, HackathonPage, IndexPage, SettingsPage, SimplePage};
use super::session::{self, Session};
use super::state::AppState;
use crate::domain::user::LoginUser;
use crate::infrastructure::constants::{LOGIN_PROVIDERS, SESSION_COOKIE, TOKEN_COOKIE};
use askama::Template;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query, Request, State},
    http::{
        header::{CONTENT_TYPE, LOCATION, SET_COOKIE},
        request::Parts,
        HeaderValue, StatusCode, Uri,
    },
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

/// The request's principal. Loading failures are logged and treated as
/// anonymous.
pub struct CurrentUser {
    pub session_id: Option<String>,
    pub session: Option<Session>,
    pub user: Option<LoginUser>,
}

impl CurrentUser {
    fn logged_in(&self) -> Option<(&Session, &LoginUser)> {
        match (&self.session, &self.user) {
            (Some(s), Some(u)) => Some((s, u)),
            _ => None,
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session_id = session::session_id(&parts.headers);
        let session = match &session_id {
            Some(id) => state.sessions.touch(id).await,
            None => None,
        };

        let user = match &session {
            Some(s) => load_user(state, s.user_id).await,
            None => None,
        };

        Ok(Self {
            session_id,
            session,
            user,
        })
    }
}

async fn load_user(state: &AppState, uid: i64) -> Option<LoginUser> {
    match state.api.get_user(uid).await {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::error!(uid, error = %e, "Failed to load user");
            None
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/index", get(index))
        .route("/settings", get(settings))
        .route("/hackathon", get(hackathon))
        .route("/config.js", get(js_config))
        .route("/logout", get(logout))
        .fallback(page_or_login)
}

/// Slides a live session on every request and re-issues its cookie so the
/// browser's expiry follows the server's. Responses that set the session
/// cookie themselves (login, logout) are left alone.
pub async fn refresh_session(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let session_id = session::session_id(req.headers());
    let live = match &session_id {
        Some(id) => state.sessions.touch(id).await.is_some(),
        None => false,
    };

    let mut resp = next.run(req).await;

    let prefix = format!("{}=", SESSION_COOKIE);
    let sets_session = resp
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.as_bytes().starts_with(prefix.as_bytes()));

    if let Some(id) = session_id.filter(|_| live && !sets_session) {
        let cookie = session::set_cookie(SESSION_COOKIE, &id, state.sessions.lifetime(), true);
        if let Err(e) = append_cookie(&mut resp, cookie) {
            tracing::warn!(error = %e, "Failed to refresh session cookie");
        }
    }
    resp
}

/// 302 to `location`, relative locations resolved by the browser.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

fn append_cookie(resp: &mut Response, cookie: String) -> WebResult<()> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| WebError::internal(format!("invalid cookie: {}", e)))?;
    resp.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

async fn index(State(state): State<Arc<AppState>>) -> WebResult<Html<String>> {
    let page = IndexPage {
        providers: state.config.login.provider_enabled.clone(),
        meta: state.config.oauth_meta_content(),
    };
    Ok(Html(page.render()?))
}

async fn settings(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> WebResult<Response> {
    let Some((session, user)) = current.logged_in() else {
        return Ok(found("/"));
    };
    if !session.register_state {
        return Ok(found("notregister"));
    }

    let page = SettingsPage {
        user: user.clone(),
        meta: state.config.oauth_meta_content(),
    };
    Ok(Html(page.render()?).into_response())
}

async fn hackathon(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> WebResult<Response> {
    let Some((session, user)) = current.logged_in() else {
        return Ok(found("/"));
    };
    if !session.register_state {
        return Ok(found("notregister"));
    }

    let page = HackathonPage {
        user: user.clone(),
        meta: state.config.oauth_meta_content(),
    };
    Ok(Html(page.render()?).into_response())
}

async fn js_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/javascript")],
        state.config.javascript_config(),
    )
}

/// Everything without a dedicated route: OAuth callbacks first, then the
/// named simple pages.
async fn page_or_login(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
) -> WebResult<Response> {
    let path = uri.path().trim_start_matches('/');

    if LOGIN_PROVIDERS.contains(&path) {
        return login(&state, path, params.get("code").map(String::as_str)).await;
    }

    if is_simple_page(path) {
        let page = SimplePage {
            page: path.to_string(),
            meta: state.config.oauth_meta_content(),
        };
        return Ok(Html(page.render()?).into_response());
    }

    tracing::warn!(page = %path, "page not found");
    Err(WebError::not_found(uri.path()))
}

async fn login(state: &AppState, provider: &str, code: Option<&str>) -> WebResult<Response> {
    let result = state.api.login(provider, code).await?;
    let user = result.user();
    if !session::is_cookie_value(&result.token) {
        tracing::error!(provider = %provider, uid = user.id, "Login token is not a valid cookie value");
        return Ok(found("error"));
    }
    tracing::info!(provider = %provider, uid = user.id, name = %user.name, "User logged in");

    let session_id = state
        .sessions
        .create(user.id, result.token.clone(), result.register_state)
        .await;
    let lifetime = state.sessions.lifetime();

    let mut resp = if !result.register_state {
        found("notregister")
    } else {
        let mut resp = if result.has_experiments() {
            found("hackathon")
        } else {
            found("settings")
        };
        append_cookie(
            &mut resp,
            session::set_cookie(TOKEN_COOKIE, &result.token, lifetime, false),
        )?;
        resp
    };

    append_cookie(
        &mut resp,
        session::set_cookie(SESSION_COOKIE, &session_id, lifetime, true),
    )?;
    Ok(resp)
}

async fn logout(State(state): State<Arc<AppState>>, current: CurrentUser) -> WebResult<Response> {
    let Some((session, user)) = current.logged_in() else {
        return Ok(found("/"));
    };

    if let Err(e) = state.api.logout(user.id, &session.token).await {
        tracing::error!(uid = user.id, error = %e, "Remote logout failed");
    }

    if let Some(id) = &current.session_id {
        state.sessions.remove(id).await;
    }

    let mut resp = found("/");
    append_cookie(&mut resp, session::clear_cookie(SESSION_COOKIE))?;
    append_cookie(&mut resp, session::clear_cookie(TOKEN_COOKIE))?;
    Ok(resp)
}

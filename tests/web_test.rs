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

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use httpmock::prelude::*;
use open_hackathon::web;
use open_hackathon::{AppConfig, AppState};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn test_state(endpoint: &str) -> Arc<AppState> {
    let mut config = AppConfig::default();
    config.hackathon_api.endpoint = endpoint.to_string();
    config.login.weibo.meta_content = "weibo-meta".to_string();
    config.login.qq.meta_content = "qq-meta".to_string();
    config
        .javascript
        .insert("apiconfig".to_string(), json!({"proxy": "http://api"}));
    Arc::new(AppState::new(config).unwrap())
}

async fn get(state: &Arc<AppState>, uri: &str, cookie: Option<&str>) -> Response {
    let mut req = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    web::router(state.clone())
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn set_cookies(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// `name=value` of the cookie named `name`, ready for a Cookie header.
fn cookie_pair(resp: &Response, name: &str) -> Option<String> {
    set_cookies(resp)
        .into_iter()
        .filter_map(|c| c.split(';').next().map(str::to_string))
        .find(|pair| pair.starts_with(&format!("{}=", name)))
}

fn login_body(register_state: bool, experiments: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 7,
        "name": "alice",
        "nickname": "Alice",
        "avatar_url": "http://avatar/alice.png",
        "token": "tok-7",
        "register_state": register_state,
        "experiments": experiments,
    })
}

#[tokio::test]
async fn test_index_renders_providers_and_meta() {
    let state = test_state("http://127.0.0.1:1");

    for uri in ["/", "/index"] {
        let resp = get(&state, uri, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        for provider in ["github", "qq", "gitcafe", "weibo"] {
            assert!(html.contains(&format!("href=\"/{}\"", provider)));
        }
        assert!(html.contains("weibo-meta"));
        assert!(html.contains("qq-meta"));
    }
}

#[tokio::test]
async fn test_config_js() {
    let state = test_state("http://127.0.0.1:1");

    let resp = get(&state, "/config.js", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/javascript"
    );
    assert_eq!(
        body_text(resp).await,
        r#"var CONFIG={"apiconfig":{"proxy":"http://api"}}"#
    );
}

#[tokio::test]
async fn test_simple_pages_and_not_found() {
    let state = test_state("http://127.0.0.1:1");

    let resp = get(&state, "/help", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("data-page=\"help\""));

    let resp = get(&state, "/PrivacyStatement", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get(&state, "/no-such-page", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Page not Found");
}

#[tokio::test]
async fn test_login_required_pages_redirect_anonymous() {
    let state = test_state("http://127.0.0.1:1");

    for uri in ["/settings", "/hackathon", "/logout"] {
        let resp = get(&state, uri, None).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
        assert_eq!(location(&resp), "/");
    }

    let resp = get(&state, "/settings", Some("session=unknown")).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn test_login_unregistered_user() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/user/login")
                .json_body(json!({"provider": "github", "code": "abc"}));
            then.status(200).json_body(login_body(false, json!([])));
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/github?code=abc", None).await;
    login.assert_async().await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "notregister");
    assert!(cookie_pair(&resp, "session").is_some());
    assert!(cookie_pair(&resp, "token").is_none());
    assert_eq!(state.sessions.len().await, 1);
}

#[tokio::test]
async fn test_login_then_settings_then_logout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(200).json_body(login_body(true, json!([])));
        })
        .await;
    let user = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user").query_param("uid", "7");
            then.status(200).json_body(json!({
                "id": 7,
                "name": "alice",
                "nickname": "Alice",
                "avatar_url": "http://avatar/alice.png"
            }));
        })
        .await;
    let logout = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/user/login")
                .query_param("uid", "7")
                .header("token", "tok-7");
            then.status(200);
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/qq?code=xyz", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "settings");
    assert_eq!(cookie_pair(&resp, "token").unwrap(), "token=tok-7");
    let token_cookie = set_cookies(&resp)
        .into_iter()
        .find(|c| c.starts_with("token="))
        .unwrap();
    assert!(!token_cookie.contains("HttpOnly"));
    let session = cookie_pair(&resp, "session").unwrap();

    let resp = get(&state, "/settings", Some(&session)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("data-uid=\"7\""));
    assert!(html.contains("Alice"));

    let resp = get(&state, "/hackathon", Some(&session)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(user.hits_async().await >= 2);

    let resp = get(&state, "/logout", Some(&session)).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(set_cookies(&resp)
        .iter()
        .any(|c| c.starts_with("session=;") && c.contains("Max-Age=0")));
    logout.assert_async().await;
    assert!(state.sessions.is_empty().await);

    let resp = get(&state, "/settings", Some(&session)).await;
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn test_login_with_experiments_goes_to_hackathon() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(200)
                .json_body(login_body(true, json!([{"id": 1, "status": 2}])));
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/weibo?code=1", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "hackathon");
}

#[tokio::test]
async fn test_remote_logout_failure_still_logs_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(200).json_body(login_body(true, json!([])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user");
            then.status(200)
                .json_body(json!({"id": 7, "name": "alice"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/user/login");
            then.status(500);
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/github?code=abc", None).await;
    let session = cookie_pair(&resp, "session").unwrap();

    let resp = get(&state, "/logout", Some(&session)).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_failed_user_lookup_is_anonymous() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(200).json_body(login_body(true, json!([])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user");
            then.status(503);
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/gitcafe?code=abc", None).await;
    let session = cookie_pair(&resp, "session").unwrap();

    let resp = get(&state, "/settings", Some(&session)).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn test_failed_login_is_internal_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(500);
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/github?code=bad", None).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await, "Internal Server Error");
    assert!(state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_active_session_cookie_is_refreshed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(200).json_body(login_body(true, json!([])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user");
            then.status(200).json_body(json!({"id": 7, "name": "alice"}));
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/github?code=abc", None).await;
    let session = cookie_pair(&resp, "session").unwrap();

    for uri in ["/settings", "/hackathon", "/help"] {
        let resp = get(&state, uri, Some(&session)).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        let refreshed = set_cookies(&resp)
            .into_iter()
            .find(|c| c.starts_with("session="))
            .unwrap_or_else(|| panic!("{} did not refresh the session cookie", uri));
        assert!(refreshed.starts_with(&format!("{};", session)));
        assert!(refreshed.contains("Max-Age=3600"));
        assert!(refreshed.contains("HttpOnly"));
    }

    let resp = get(&state, "/settings", Some("session=forged")).await;
    assert!(cookie_pair(&resp, "session").is_none());
}

#[tokio::test]
async fn test_user_with_null_profile_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(200).json_body(json!({
                "id": 7,
                "name": "alice",
                "nickname": null,
                "avatar_url": null,
                "token": "tok-7",
                "register_state": true,
                "experiments": null
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user").query_param("uid", "7");
            then.status(200).json_body(json!({
                "id": 7,
                "name": "alice",
                "nickname": null,
                "avatar_url": null
            }));
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/github?code=abc", None).await;
    assert_eq!(location(&resp), "settings");
    let session = cookie_pair(&resp, "session").unwrap();

    let resp = get(&state, "/settings", Some(&session)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("data-uid=\"7\""));
}

#[tokio::test]
async fn test_login_token_unusable_as_cookie() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(200).json_body(json!({
                "id": 7,
                "name": "alice",
                "token": "tok; Domain=evil.example",
                "register_state": true
            }));
        })
        .await;
    let state = test_state(&server.base_url());

    let resp = get(&state, "/github?code=abc", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "error");
    assert!(set_cookies(&resp).is_empty());
    assert!(state.sessions.is_empty().await);
}

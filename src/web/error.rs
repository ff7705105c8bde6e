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

//! Page-level errors rendered as plain-text responses

use crate::shared::error::HackathonError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum WebError {
    /// 404 - unknown page
    NotFound(String),
    /// 500 - anything else
    Internal(String),
}

impl WebError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound(path) => {
                tracing::error!(path = %path, "Page not found");
                (StatusCode::NOT_FOUND, "Page not Found").into_response()
            }
            WebError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebError::NotFound(p) => write!(f, "Not found: {}", p),
            WebError::Internal(m) => write!(f, "Internal error: {}", m),
        }
    }
}

impl std::error::Error for WebError {}

impl From<HackathonError> for WebError {
    fn from(err: HackathonError) -> Self {
        WebError::Internal(err.to_string())
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        WebError::Internal(format!("template rendering failed: {}", err))
    }
}

pub type WebResult<T> = Result<T, WebError>;

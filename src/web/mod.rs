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

//! HTTP front-end

pub mod error;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;

pub use state::AppState;

use crate::domain::config::AppConfig;
use crate::shared::error::HackathonError;
use axum::{middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Builds the complete router.
pub fn router(state: Arc<AppState>) -> Router {
    routes::router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::refresh_session,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the front-end until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<(), HackathonError> {
    config.validate()?;

    let bind = config.server.bind.clone();
    let state = Arc::new(AppState::new(config)?);

    let purge_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = purge_state.sessions.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "Purged expired sessions");
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}

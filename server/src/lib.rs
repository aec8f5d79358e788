pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod migrations;
pub mod models;
pub mod raw_sql;
pub mod schema;
pub mod security;
pub mod telemetry;

use axum::extract::{FromRef, MatchedPath};
use axum::http::Request;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::db::DbPool;
use crate::security::{security_headers, ImageUrlPolicy, RateLimiter, SecurityHeaders};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
    pub profile_limiter: Arc<RateLimiter>,
    pub image_policy: Arc<ImageUrlPolicy>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        let profile_limiter = RateLimiter::new(config.profile_rate_limit, config.profile_rate_window);
        Self {
            pool: Arc::new(pool),
            config: Arc::new(config),
            profile_limiter: Arc::new(profile_limiter),
            image_policy: Arc::new(ImageUrlPolicy::default()),
        }
    }
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

fn is_probe(path: &str) -> bool {
    path == "/health" || path == "/health/ready"
}

/// The full HTTP surface: API, probes, static files and API docs, wrapped in
/// request tracing and the security headers.
pub fn app(state: AppState) -> Router {
    let headers = SecurityHeaders::from_config(&state.config);
    let static_files = ServeDir::new(&state.config.static_dir);
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::health::router())
        .merge(api::public::router())
        .nest("/api/profile", api::profile::router())
        .nest("/api/images", api::images::router())
        .nest("/api/categories", api::categories::router())
        .nest("/api/recipes", api::recipes::router())
        .merge(api::ingredients::router())
        .merge(api::steps::router())
        .nest_service("/static", static_files)
        .merge(swagger_ui)
        .with_state(state)
        .layer(middleware::from_fn_with_state(headers, security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Orchestrators poll the probes constantly
                    if is_probe(matched_path) {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

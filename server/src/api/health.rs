//! Liveness and readiness probes for container orchestration.

use crate::db::DbPool;
use crate::migrations::{MigrationChain, SCHEMA};
use crate::raw_sql;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::AppState;

/// Tables the app cannot serve without.
pub const ESSENTIAL_TABLES: &[&str] = &[
    "recipez_user",
    "recipez_category",
    "recipez_image",
    "recipez_recipe",
    "recipez_ingredient",
    "recipez_step",
];

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub app: String,
    pub database: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    pub ready: bool,
    /// Check name to `ok` or a short failure description
    pub checks: BTreeMap<String, String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}

fn ping(conn: &mut PgConnection) -> QueryResult<usize> {
    diesel::sql_query("SELECT 1").execute(conn)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "App and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(pool): State<Arc<DbPool>>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = match pool.get() {
        Ok(mut conn) => ping(&mut conn)
            .map_err(|e| tracing::error!(error = %e, "health check query failed"))
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "health check could not get a connection");
            false
        }
    };

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthResponse {
        status: if database_ok { "healthy" } else { "unhealthy" }.to_string(),
        checks: HealthChecks {
            app: "ok".to_string(),
            database: if database_ok { "ok" } else { "error" }.to_string(),
        },
    };
    (status, Json(body))
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to receive traffic", body = ReadyResponse),
        (status = 503, description = "Not ready", body = ReadyResponse)
    )
)]
pub async fn ready(State(pool): State<Arc<DbPool>>) -> (StatusCode, Json<ReadyResponse>) {
    let mut checks = BTreeMap::new();

    let mut conn = match pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check could not get a connection");
            checks.insert("database".to_string(), "error".to_string());
            return not_ready(checks);
        }
    };
    if ping(&mut conn).is_err() {
        checks.insert("database".to_string(), "error".to_string());
        return not_ready(checks);
    }
    checks.insert("database".to_string(), "ok".to_string());

    let mut missing = Vec::new();
    for table in ESSENTIAL_TABLES {
        match raw_sql::table_exists(&mut conn, SCHEMA, table) {
            Ok(true) => {}
            Ok(false) => missing.push(*table),
            Err(e) => {
                checks.insert("schema".to_string(), format!("error: {e}"));
                return not_ready(checks);
            }
        }
    }
    if !missing.is_empty() {
        checks.insert(
            "schema".to_string(),
            format!("missing_tables: {}", missing.join(", ")),
        );
        return not_ready(checks);
    }
    checks.insert("schema".to_string(), "ok".to_string());

    let at_head = MigrationChain::recipez().and_then(|chain| {
        let current = chain.current(&mut conn)?;
        Ok((current.clone(), current.as_deref() == chain.head()))
    });
    match at_head {
        Ok((_, true)) => {
            checks.insert("migrations".to_string(), "ok".to_string());
        }
        Ok((current, false)) => {
            checks.insert(
                "migrations".to_string(),
                format!("behind head (at {})", current.as_deref().unwrap_or("<none>")),
            );
            return not_ready(checks);
        }
        Err(e) => {
            checks.insert("migrations".to_string(), format!("error: {e}"));
            return not_ready(checks);
        }
    }

    (StatusCode::OK, Json(ReadyResponse { ready: true, checks }))
}

fn not_ready(checks: BTreeMap<String, String>) -> (StatusCode, Json<ReadyResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ReadyResponse {
            ready: false,
            checks,
        }),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(health, ready),
    components(schemas(HealthResponse, HealthChecks, ReadyResponse))
)]
pub struct ApiDoc;

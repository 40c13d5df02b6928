/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations": { "applied": 4, "up_to_date": true },
///   "pool": { "active_connections": 1, "idle_connections": 1, "total_connections": 2 }
/// }
/// ```

use crate::{app::AppState, error::ApiResult, extract::Json};
use axum::extract::State;
use decisionlog_shared::db::{
    migrations::migration_status,
    pool::{self, PoolStats},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: &'static str,

    pub version: &'static str,

    /// "connected" or "disconnected"
    pub database: &'static str,

    /// Absent when the database can't be reached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations: Option<MigrationsHealth>,

    pub pool: PoolStats,
}

#[derive(Debug, Serialize)]
pub struct MigrationsHealth {
    pub applied: usize,
    pub up_to_date: bool,
}

/// Always answers 200; a database outage or pending migrations show up as
/// `degraded`
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    let migrations = if connected {
        match migration_status(&state.db).await {
            Ok(s) => Some(MigrationsHealth {
                applied: s.applied_migrations,
                up_to_date: s.is_up_to_date,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Health check could not read migration status");
                None
            }
        }
    } else {
        None
    };

    let healthy = migrations.as_ref().map_or(false, |m| m.up_to_date);

    Ok(Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if connected { "connected" } else { "disconnected" },
        migrations,
        pool: pool::get_pool_stats(&state.db),
    }))
}

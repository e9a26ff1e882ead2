//! Health check and status endpoints
//!
//! This module provides health check and version endpoints.

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use std::borrow::Cow;

use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/detailed", web::get().to(detailed_health_check)),
    )
    .route("/version", web::get().to(version_info));
}

/// Basic health check endpoint
///
/// Returns a simple health status indicating if the service is running.
/// This endpoint is typically used by load balancers and monitoring systems.
pub async fn health_check() -> HttpResponse {
    debug!("Health check requested");

    let health_status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    };

    HttpResponse::Ok().json(ApiResponse::success(health_status))
}

/// Detailed health check endpoint
///
/// Reports uptime, the policy snapshot behind the decision engine, and
/// throttle pressure. The service degrades when the snapshot has not
/// refreshed for several intervals, since decisions are then running on
/// stale policy data.
async fn detailed_health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Detailed health check requested");

    let snapshot = state.policies.snapshot();
    let snapshot_age_seconds = state.policies.age().as_secs();
    let stale_after = state.config.decision().policy_refresh_secs.saturating_mul(3);

    let detailed_status = DetailedHealthStatus {
        status: if snapshot_age_seconds > stale_after {
            Cow::Borrowed("degraded")
        } else {
            Cow::Borrowed("healthy")
        },
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime_seconds: state.uptime_seconds(),
        policies: PolicySnapshotStatus {
            policy_count: snapshot.policies.len(),
            snapshot_age_seconds,
        },
        throttle: ThrottleStatus {
            blocked_attempts: state.throttle.blocked_attempts(),
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(detailed_status)))
}

/// Version information endpoint
///
/// Returns version and build information.
async fn version_info() -> HttpResponse {
    debug!("Version info requested");

    let version_info = VersionInfo {
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        build_time: Cow::Borrowed(env!("BUILD_TIME")),
        git_hash: Cow::Borrowed(env!("GIT_HASH")),
        rust_version: Cow::Borrowed(env!("RUST_VERSION")),
    };

    HttpResponse::Ok().json(ApiResponse::success(version_info))
}

/// Basic health status
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
}

/// Detailed health status
#[derive(Debug, Clone, serde::Serialize)]
struct DetailedHealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
    uptime_seconds: u64,
    policies: PolicySnapshotStatus,
    throttle: ThrottleStatus,
}

/// Serving policy snapshot summary
#[derive(Debug, Clone, serde::Serialize)]
struct PolicySnapshotStatus {
    policy_count: usize,
    snapshot_age_seconds: u64,
}

/// Login throttle summary
#[derive(Debug, Clone, serde::Serialize)]
struct ThrottleStatus {
    blocked_attempts: u64,
}

/// Version information
#[derive(Debug, Clone, serde::Serialize)]
struct VersionInfo {
    version: Cow<'static, str>,
    build_time: Cow<'static, str>,
    git_hash: Cow<'static, str>,
    rust_version: Cow<'static, str>,
}

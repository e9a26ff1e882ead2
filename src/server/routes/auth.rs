//! Authentication endpoints
//!
//! Login, refresh, logout, and strict token introspection. The credential
//! endpoints sit behind the login throttle; every authentication failure
//! feeds it, so repeated guessing escalates into lockouts.

use crate::server::AppState;
use crate::server::middleware::{bearer_token, client_addr};
use crate::server::routes::{ApiResponse, errors};
use crate::utils::error::GatewayError;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use tracing::{debug, error, warn};

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/refresh", web::post().to(refresh_token))
            .route("/validate", web::post().to(validate_token)),
    );
}

/// User login request
#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Refresh and logout request
#[derive(Debug, Deserialize)]
struct RefreshTokenRequest {
    refresh_token: String,
}

/// User login endpoint
async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_addr(&req).unwrap_or_else(|| "unknown".to_string());

    if let Err(retry_secs) = state.throttle.check_allowed(&client) {
        warn!("Throttled login attempt from {}", client);
        return Ok(errors::throttle_error(retry_secs));
    }

    match state.auth.login(&request.username, &request.password).await {
        Ok(pair) => {
            state.throttle.record_success(&client);
            Ok(HttpResponse::Ok().json(ApiResponse::success(pair)))
        }
        Err(GatewayError::Auth(message)) => {
            state.throttle.record_failure(&client);
            Ok(HttpResponse::Unauthorized().json(ApiResponse::<()>::error(message)))
        }
        Err(GatewayError::Authorization(message)) => {
            // The password was right, so a disabled account is not a
            // guessing signal and does not feed the throttle.
            Ok(HttpResponse::Forbidden().json(ApiResponse::<()>::error(message)))
        }
        Err(err) => {
            error!("Login failed: {}", err);
            Ok(errors::gateway_error_to_response(err))
        }
    }
}

/// User logout endpoint
///
/// Revokes every refresh chain belonging to the token's owner. Succeeds
/// whether or not the presented token was usable, so a logout can never
/// be probed for token state.
async fn logout(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> ActixResult<HttpResponse> {
    match state.auth.logout(&request.refresh_token).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success(()))),
        Err(err) => {
            error!("Logout failed: {}", err);
            Ok(errors::gateway_error_to_response(err))
        }
    }
}

/// Refresh token endpoint
///
/// Rotates the presented refresh token into a fresh pair. A replayed
/// token fails here with the same generic message as any other bad
/// token, after poisoning its chain.
async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> ActixResult<HttpResponse> {
    debug!("Token refresh request");

    match state.auth.refresh(&request.refresh_token).await {
        Ok(pair) => Ok(HttpResponse::Ok().json(ApiResponse::success(pair))),
        Err(err) => {
            debug!("Token refresh rejected: {}", err);
            Ok(errors::gateway_error_to_response(err))
        }
    }
}

/// Strict token introspection endpoint
///
/// Verifies the bearer token against live directory state rather than
/// claims alone, and reports the session's roles and effective
/// permissions. Meant for callers that need certainty, not speed.
async fn validate_token(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(errors::unauthorized_error("Missing bearer token"));
    };

    match state.auth.validate_strict(&token).await {
        Ok(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(session))),
        Err(err) => {
            debug!("Token validation rejected: {}", err);
            Ok(errors::gateway_error_to_response(err))
        }
    }
}

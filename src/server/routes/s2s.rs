//! Service-to-service token endpoint
//!
//! Client-credentials exchange for service accounts. Services hold no
//! refresh tokens; when a service token expires the caller exchanges its
//! credentials again.

use crate::server::AppState;
use crate::server::middleware::client_addr;
use crate::server::routes::{ApiResponse, errors};
use crate::utils::error::GatewayError;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Configure service-to-service routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/s2s").route("/token", web::post().to(exchange_token)));
}

/// Client credentials grant request
#[derive(Debug, Deserialize)]
struct TokenExchangeRequest {
    client_id: String,
    client_secret: String,
}

/// Issued service token
#[derive(Debug, Serialize)]
struct TokenExchangeResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
}

/// Exchange client credentials for a short-lived service token
async fn exchange_token(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<TokenExchangeRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_addr(&req).unwrap_or_else(|| "unknown".to_string());

    if let Err(retry_secs) = state.throttle.check_allowed(&client) {
        warn!("Throttled credential exchange from {}", client);
        return Ok(errors::throttle_error(retry_secs));
    }

    match state
        .auth
        .exchange_client_credentials(&request.client_id, &request.client_secret)
        .await
    {
        Ok((access_token, expires_in)) => {
            state.throttle.record_success(&client);
            Ok(HttpResponse::Ok().json(ApiResponse::success(TokenExchangeResponse {
                access_token,
                token_type: "Bearer".to_string(),
                expires_in,
            })))
        }
        Err(GatewayError::Auth(message)) => {
            state.throttle.record_failure(&client);
            Ok(HttpResponse::Unauthorized().json(ApiResponse::<()>::error(message)))
        }
        Err(err) => {
            error!("Credential exchange failed: {}", err);
            Ok(errors::gateway_error_to_response(err))
        }
    }
}

//! Access decision endpoint
//!
//! The forward-auth surface. A proxy (or a curious operator) asks whether
//! a request may pass by replaying its method, path, and bearer token
//! against `/v1/decide/...`; the verdict comes back both as the HTTP
//! status and as a structured body. Every call produces an audit record,
//! allowed or not.

use crate::core::decision::{AccessRequest, DecisionRecord, DenyReason, Outcome};
use crate::core::principal::PrincipalKind;
use crate::server::AppState;
use crate::server::middleware::{bearer_token, client_addr};
use crate::server::routes::ApiResponse;
use crate::utils::generate_request_id;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

/// Configure decision routes
///
/// Method matters to policy resolution, so both routes accept every HTTP
/// method; the bare route answers for the root path itself.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/v1/decide", web::route().to(decide))
        .service(web::resource("/v1/decide/{path:.*}").route(web::route().to(decide)));
}

/// Decision verdict as returned to the caller
#[derive(Debug, Serialize)]
struct DecisionView {
    request_id: String,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<DenyReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    policy_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    principal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    principal_kind: Option<PrincipalKind>,
    latency_ms: u64,
}

impl From<&DecisionRecord> for DecisionView {
    fn from(record: &DecisionRecord) -> Self {
        Self {
            request_id: record.request_id.clone(),
            outcome: record.outcome,
            reason: record.deny_reason,
            policy_id: record.policy_id,
            principal: record.principal.clone(),
            principal_kind: record.principal_kind,
            latency_ms: record.latency.as_millis() as u64,
        }
    }
}

/// Decide one access request
async fn decide(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    // The matched tail never carries the leading slash; "" means the
    // decision is about "/" itself.
    let tail = req.match_info().query("path");
    let path = format!("/{tail}");

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .unwrap_or_else(generate_request_id);

    let access = AccessRequest {
        method: req.method().to_string(),
        path,
        client_addr: client_addr(&req),
        bearer: bearer_token(&req),
        request_id,
    };

    let record = state.engine.decide(access).await;
    let view = DecisionView::from(&record);

    let status = match record.outcome {
        Outcome::Allow => StatusCode::OK,
        Outcome::Deny => record
            .deny_reason
            .map(|reason| {
                StatusCode::from_u16(reason.status_code()).unwrap_or(StatusCode::FORBIDDEN)
            })
            .unwrap_or(StatusCode::FORBIDDEN),
    };

    HttpResponse::build(status).json(ApiResponse {
        success: record.is_allowed(),
        data: Some(view),
        error: record.deny_reason.map(|reason| reason.as_str().to_string()),
        meta: None,
    })
}

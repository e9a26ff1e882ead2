//! Helper functions shared by middleware and route handlers

use crate::auth::jwt::JwtHandler;
use actix_web::HttpRequest;
use actix_web::http::header;

/// Extract the bearer credential from the Authorization header
///
/// Returns the raw token with the scheme prefix stripped. Any other
/// authorization scheme reads as no credential at all.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    JwtHandler::extract_bearer(value).map(|token| token.to_string())
}

/// Client address for throttling keys and audit records
///
/// Prefers the forwarded address when an upstream proxy supplies one.
/// Peer addresses carry an ephemeral port, which is stripped so one host
/// maps to one throttle tracker across connections.
pub fn client_addr(req: &HttpRequest) -> Option<String> {
    let info = req.connection_info();
    let addr = info.realip_remote_addr()?;
    match addr.parse::<std::net::SocketAddr>() {
        Ok(sock) => Some(sock.ip().to_string()),
        Err(_) => Some(addr.to_string()),
    }
}

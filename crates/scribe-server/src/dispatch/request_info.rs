use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use http::HeaderMap;
use http::header::USER_AGENT;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Request fields logged alongside a classified failure
///
/// Captured before the inner service runs, since the request is consumed by
/// the time a failure surfaces.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: String,
    pub uri: String,
    pub client_addr: String,
    pub user_agent: String,
}

impl RequestInfo {
    pub fn from_request(request: &Request) -> Self {
        let connect_info = request.extensions().get::<ConnectInfo<SocketAddr>>().map(|info| info.0);

        Self {
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            client_addr: client_addr(request.headers(), connect_info),
            user_agent: header_str(request.headers(), USER_AGENT.as_str()).unwrap_or_default().to_owned(),
        }
    }
}

/// Client address, preferring proxy headers over the socket peer
///
/// The first entry of `X-Forwarded-For` wins, then `X-Real-IP`.
fn client_addr(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = header_str(headers, X_FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return forwarded.to_owned();
    }

    if let Some(real_ip) = header_str(headers, X_REAL_IP).map(str::trim).filter(|v| !v.is_empty()) {
        return real_ip.to_owned();
    }

    peer.map(|addr| addr.ip().to_string()).unwrap_or_default()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

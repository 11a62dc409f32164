//! Best-effort client address extraction

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};

/// Address used when the request carries no usable client address
pub const FALLBACK_ADDRESS: &str = "127.0.0.1";

/// Client address of a request, attached as an extension by the request middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

/// Resolves the client address
///
/// Order: first `X-Forwarded-For` entry, `X-Real-IP`, socket peer, then
/// [`FALLBACK_ADDRESS`].
pub fn client_addr<B>(request: &Request<B>) -> ClientAddr {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    ClientAddr(
        forwarded_addr(request.headers())
            .or(peer)
            .unwrap_or_else(|| FALLBACK_ADDRESS.to_string()),
    )
}

/// Address announced by a proxy, if any
pub fn forwarded_addr(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    header("x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(String::from)
}

use axum::{extract::Request, middleware::Next, response::Response};

use crate::client_ip::client_addr;

/// Middleware that resolves the client address of every request
///
/// The address is logged together with the method and path, and attached to the
/// request as a [`ClientAddr`](crate::client_ip::ClientAddr) extension for the
/// handlers further down.
pub async fn client_addr_middleware(mut request: Request, next: Next) -> Response {
    let addr = client_addr(&request);

    tracing::info!(
        package = "middleware",
        "{} {} from {}",
        request.method(),
        request.uri().path(),
        addr.0
    );

    request.extensions_mut().insert(addr);

    next.run(request).await
}

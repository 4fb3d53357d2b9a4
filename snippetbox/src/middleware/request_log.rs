//! Request logging stage

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

/// Log every request on arrival, and the outcome of requests that failed
/// on the server side.
pub async fn log_request(request: Request, next: Next) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let proto = format!("{:?}", request.version());
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::info!(ip = %ip, proto = %proto, method = %method, uri = %uri, "received request");

    let response = next.run(request).await;

    if response.status().is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = response.status().as_u16(),
            "request failed"
        );
    }

    response
}

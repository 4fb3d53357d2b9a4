//! Panic recovery stage

use std::any::Any;

use axum::{
    http::{header::CONNECTION, HeaderValue, StatusCode},
    response::Response,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::status_response;

pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Turn a panic anywhere inside into a logged, generic 500.
///
/// `Connection: close` tells the server to drop the connection once the
/// response is written.
pub fn recover_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Recovered from panic while serving request");

    let mut response = status_response(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert(CONNECTION, HeaderValue::from_static("close"));
    response
}

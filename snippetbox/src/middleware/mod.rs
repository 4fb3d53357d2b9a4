//! Middleware stages and the chains that compose them
//!
//! Each stage wraps a [`Layered`] target. [`Chain`] is an ordered list of
//! stages; the first stage in the list runs first on the way in and last on
//! the way out.

pub mod authenticate;
pub mod chain;
pub mod recover;
pub mod request_log;
pub mod security_headers;

use std::convert::Infallible;

use axum::{
    extract::Request,
    response::IntoResponse,
    routing::{MethodRouter, Route},
    Router,
};
use tower::{Layer, Service};

pub use authenticate::{authenticate, require_authentication, LOGIN_PATH};
pub use chain::{Chain, Stage};
pub use recover::recover_panic_layer;
pub use request_log::log_request;
pub use security_headers::apply_security_headers;

/// Something a stage can wrap.
///
/// A [`Router`] is wrapped as a whole, fallback and method-not-allowed
/// answers included. A [`MethodRouter`] is wrapped per registered method, so
/// a request with any other method skips the stage.
pub trait Layered: Sized {
    fn with_layer<L>(self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static;
}

impl Layered for Router {
    fn with_layer<L>(self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.layer(layer)
    }
}

impl<S> Layered for MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_layer<L>(self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.route_layer(layer)
    }
}

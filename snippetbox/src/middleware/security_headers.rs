//! Security headers stage
//!
//! Applies the response security headers using
//! `tower_http::set_header::SetResponseHeaderLayer`. A handler that sets one
//! of these headers itself keeps its own value.

use axum::http::{header, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

use super::Layered;
use crate::config::SecurityHeadersConfig;

/// Apply security headers to `app` based on configuration.
pub fn apply_security_headers<T: Layered>(mut app: T, config: &SecurityHeadersConfig) -> T {
    if !config.enabled {
        return app;
    }

    // Content-Security-Policy
    if !config.content_security_policy.is_empty() {
        if let Ok(hv) = HeaderValue::from_str(&config.content_security_policy) {
            app = app.with_layer(SetResponseHeaderLayer::if_not_present(
                header::CONTENT_SECURITY_POLICY,
                hv,
            ));
        }
    }

    // Referrer-Policy
    if !config.referrer_policy.is_empty() {
        if let Ok(hv) = HeaderValue::from_str(&config.referrer_policy) {
            app = app.with_layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                hv,
            ));
        }
    }

    // X-Content-Type-Options: nosniff
    if config.x_content_type_options {
        app = app.with_layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));
    }

    // X-Frame-Options
    if !config.x_frame_options.is_empty() {
        if let Ok(hv) = HeaderValue::from_str(&config.x_frame_options) {
            app = app.with_layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                hv,
            ));
        }
    }

    // X-XSS-Protection: 0 (disable the legacy browser XSS filter)
    if config.x_xss_protection {
        app = app.with_layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("0"),
        ));
    }

    app
}

//! In-process HTTP client for end-to-end tests
//!
//! Drives the full router with `tower::ServiceExt::oneshot`, carrying the
//! session cookie between requests the way a browser would.

use std::sync::{Arc, LazyLock, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderName, Method, Request, StatusCode},
    Router,
};
use regex::Regex;
use tower::ServiceExt;

use crate::config::Config;
use crate::form::FORM_CONTENT_TYPE;
use crate::routes::routes;
use crate::state::AppState;
use crate::store::mock::{MockSnippetStore, MockUserStore, MOCK_EMAIL, MOCK_PASSWORD};

static CSRF_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input type="hidden" name="csrf_token" value="([A-Za-z0-9]+)">"#).unwrap()
});

/// Pull the CSRF token out of a rendered form
pub fn extract_csrf_token(body: &str) -> Option<String> {
    CSRF_RX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub struct TestClient {
    app: Router,
    pub snippets: Arc<MockSnippetStore>,
    cookie: Mutex<Option<String>>,
}

impl TestClient {
    /// Full application over the mock stores
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let snippets = Arc::new(MockSnippetStore::default());
        let state = AppState::builder()
            .config(config)
            .snippets(snippets.clone())
            .users(Arc::new(MockUserStore))
            .build()
            .unwrap();

        Self {
            app: routes(state),
            snippets,
            cookie: Mutex::new(None),
        }
    }

    /// Latest `name=value` pair the server set for the session cookie
    pub fn cookie(&self) -> Option<String> {
        self.cookie.lock().unwrap().clone()
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        self.send(method, uri, body, None).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    /// Fetch a fresh CSRF token for the current session
    pub async fn csrf_token(&self) -> String {
        let response = self.get("/user/login").await;
        extract_csrf_token(&response.body).expect("login page renders a csrf token")
    }

    /// POST `fields` with a valid CSRF token
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let token = self.csrf_token().await;
        let mut pairs: Vec<(&str, &str)> = fields.to_vec();
        pairs.push(("csrf_token", &token));
        let body = serde_urlencoded::to_string(&pairs).unwrap();
        self.raw_form(Method::POST, uri, body).await
    }

    /// Send `body` as-is, without adding a token
    pub async fn raw_form(&self, method: Method, uri: &str, body: String) -> TestResponse {
        self.request(method, uri, Some(body)).await
    }

    /// Send `body` with the CSRF token in `header_name` instead of the form
    pub async fn request_with_header(
        &self,
        method: Method,
        uri: &str,
        body: &str,
        header_name: &'static str,
    ) -> TestResponse {
        let token = self.csrf_token().await;
        self.send(
            method,
            uri,
            Some(body.to_string()),
            Some((HeaderName::from_static(header_name), token)),
        )
        .await
    }

    /// Log in as the mock user
    pub async fn login(&self) -> TestResponse {
        self.post_form(
            "/user/login",
            &[("email", MOCK_EMAIL), ("password", MOCK_PASSWORD)],
        )
        .await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
        extra_header: Option<(HeaderName, String)>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = self.cookie() {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some((name, value)) = extra_header {
            builder = builder.header(name, value);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default().to_string();
            *self.cookie.lock().unwrap() = Some(pair);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    }
}

#[test]
fn test_extract_csrf_token() {
    let body = r#"<form><input type="hidden" name="csrf_token" value="abc123XYZ"></form>"#;
    assert_eq!(extract_csrf_token(body).as_deref(), Some("abc123XYZ"));
    assert_eq!(extract_csrf_token("<form></form>"), None);
}

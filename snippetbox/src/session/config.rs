//! Session configuration types.

use serde::{Deserialize, Serialize};

/// Session configuration.
///
/// # Example
///
/// ```toml
/// [session]
/// cookie_name = "session"
/// expiry_secs = 43200
/// secure = true
/// same_site = "lax"
/// secret = "at least sixty-four bytes of random material ..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session cookie name.
    ///
    /// Default: `"session"`
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Inactivity lifetime in seconds; every request that touches the
    /// session pushes the deadline forward.
    ///
    /// Default: `43200` (12 hours)
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,

    /// How often expired records are purged from the store, in seconds.
    /// `0` disables the purge task.
    ///
    /// Default: `60`
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,

    /// Cookie path.
    ///
    /// Default: `"/"`
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,

    /// Cookie domain (optional).
    #[serde(default)]
    pub cookie_domain: Option<String>,

    /// Secure cookie flag (HTTPS only).
    ///
    /// Set to `false` for local development without HTTPS.
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub secure: bool,

    /// HttpOnly cookie flag.
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub http_only: bool,

    /// SameSite cookie policy: `"strict"`, `"lax"` or `"none"`.
    ///
    /// Default: `"lax"`
    #[serde(default = "default_same_site")]
    pub same_site: String,

    /// Cookie signing secret, at least 64 bytes.
    ///
    /// When absent a random key is generated at startup, which invalidates
    /// every session on restart.
    #[serde(default)]
    pub secret: Option<String>,

    /// CSRF protection configuration.
    #[serde(default)]
    pub csrf: CsrfConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            expiry_secs: default_expiry_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            cookie_path: default_cookie_path(),
            cookie_domain: None,
            secure: true,
            http_only: true,
            same_site: default_same_site(),
            secret: None,
            csrf: CsrfConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Period of the expired-record purge, if enabled.
    pub fn cleanup_interval(&self) -> Option<std::time::Duration> {
        (self.cleanup_interval_secs > 0)
            .then(|| std::time::Duration::from_secs(self.cleanup_interval_secs))
    }
}

/// CSRF protection configuration.
///
/// ```toml
/// [session.csrf]
/// enabled = true
/// token_length = 32
/// header_name = "X-CSRF-Token"
/// form_field_name = "csrf_token"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    /// When disabled the guard still issues tokens but never rejects.
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Token length in alphanumeric characters.
    ///
    /// Default: `32`
    #[serde(default = "default_token_length")]
    pub token_length: usize,

    /// HTTP header carrying the token for non-form clients.
    ///
    /// Default: `"X-CSRF-Token"`
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Hidden form field carrying the token.
    ///
    /// Default: `"csrf_token"`
    #[serde(default = "default_form_field_name")]
    pub form_field_name: String,

    /// Methods that never carry a token.
    ///
    /// Default: `["GET", "HEAD", "OPTIONS", "TRACE"]`
    #[serde(default = "default_safe_methods")]
    pub safe_methods: Vec<String>,
}

impl CsrfConfig {
    pub fn is_safe_method(&self, method: &http::Method) -> bool {
        self.safe_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method.as_str()))
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token_length: default_token_length(),
            header_name: default_header_name(),
            form_field_name: default_form_field_name(),
            safe_methods: default_safe_methods(),
        }
    }
}

// Default value functions
fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_expiry_secs() -> u64 {
    43_200 // 12 hours
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_same_site() -> String {
    "lax".to_string()
}

fn default_token_length() -> usize {
    32
}

fn default_header_name() -> String {
    "X-CSRF-Token".to_string()
}

fn default_form_field_name() -> String {
    "csrf_token".to_string()
}

fn default_safe_methods() -> Vec<String> {
    vec![
        "GET".to_string(),
        "HEAD".to_string(),
        "OPTIONS".to_string(),
        "TRACE".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "session");
        assert_eq!(config.expiry_secs, 43_200);
        assert!(config.secure);
        assert!(config.http_only);
        assert_eq!(config.same_site, "lax");
        assert!(config.secret.is_none());
        assert_eq!(config.cleanup_interval(), Some(std::time::Duration::from_secs(60)));
    }

    #[test]
    fn test_cleanup_disabled_with_zero() {
        let config = SessionConfig {
            cleanup_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.cleanup_interval(), None);
    }

    #[test]
    fn test_csrf_config_defaults() {
        let config = CsrfConfig::default();
        assert!(config.enabled);
        assert_eq!(config.token_length, 32);
        assert_eq!(config.header_name, "X-CSRF-Token");
        assert_eq!(config.form_field_name, "csrf_token");
    }

    #[test]
    fn test_safe_methods() {
        let config = CsrfConfig::default();
        assert!(config.is_safe_method(&Method::GET));
        assert!(config.is_safe_method(&Method::HEAD));
        assert!(!config.is_safe_method(&Method::POST));
        assert!(!config.is_safe_method(&Method::DELETE));
    }
}

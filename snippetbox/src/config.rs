//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: SNIPPETBOX_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/snippetbox/config.toml
//! 4. System directory: /etc/snippetbox/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::PasswordConfig;
use crate::error::Result;
use crate::session::SessionConfig;

const ENV_PREFIX: &str = "SNIPPETBOX_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Session cookie and CSRF configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Response security headers
    #[serde(default)]
    pub security_headers: SecurityHeadersConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Snippet listing and creation defaults
    #[serde(default)]
    pub snippets: SnippetsConfig,

    /// Password hashing parameters
    #[serde(default)]
    pub password: PasswordConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Security headers added to every response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityHeadersConfig {
    /// Disable to send none of the headers below
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Content-Security-Policy value; empty disables the header
    #[serde(default = "default_content_security_policy")]
    pub content_security_policy: String,

    /// Referrer-Policy value; empty disables the header
    #[serde(default = "default_referrer_policy")]
    pub referrer_policy: String,

    /// Send `X-Content-Type-Options: nosniff`
    #[serde(default = "default_true")]
    pub x_content_type_options: bool,

    /// X-Frame-Options value; empty disables the header
    #[serde(default = "default_x_frame_options")]
    pub x_frame_options: String,

    /// Send `X-XSS-Protection: 0`
    #[serde(default = "default_true")]
    pub x_xss_protection: bool,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            content_security_policy: default_content_security_policy(),
            referrer_policy: default_referrer_policy(),
            x_content_type_options: true,
            x_frame_options: default_x_frame_options(),
            x_xss_protection: true,
        }
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Largest request body, in KiB, buffered by the CSRF guard and form binder
    #[serde(default = "default_body_limit_kb")]
    pub body_limit_kb: usize,
}

impl MiddlewareConfig {
    /// Body limit in bytes
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_kb * 1024
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_kb: default_body_limit_kb(),
        }
    }
}

/// Snippet defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetsConfig {
    /// Number of snippets shown on the home page
    #[serde(default = "default_latest_limit")]
    pub latest_limit: usize,

    /// Pre-selected expiry on the create form
    #[serde(default = "default_expires_days")]
    pub default_expires_days: u32,
}

impl Default for SnippetsConfig {
    fn default() -> Self {
        Self {
            latest_limit: default_latest_limit(),
            default_expires_days: default_expires_days(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_true() -> bool {
    true
}

fn default_content_security_policy() -> String {
    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com"
        .to_string()
}

fn default_referrer_policy() -> String {
    "origin-when-cross-origin".to_string()
}

fn default_x_frame_options() -> String {
    "deny".to_string()
}

fn default_body_limit_kb() -> usize {
    64
}

fn default_latest_limit() -> usize {
    10
}

fn default_expires_days() -> u32 {
    365
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Files found later in the search order are overridden by earlier ones;
    /// environment variables (SNIPPETBOX_ prefix) override every file.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so that higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the search path. Environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Returns paths in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix("snippetbox");
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc/snippetbox/config.toml"));

        paths
    }

    /// Socket address string the server binds
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "snippetbox".to_string(),
                host: default_host(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            session: SessionConfig::default(),
            security_headers: SecurityHeadersConfig::default(),
            middleware: MiddlewareConfig::default(),
            snippets: SnippetsConfig::default(),
            password: PasswordConfig::default(),
        }
    }
}

//! HTTP session management for the server-rendered pages.
//!
//! Sessions are identified by a signed cookie and stored server-side in a
//! shared in-memory store that drops expired records. The session layer loads the record lazily and
//! writes it back after the handler only when it was modified; a failed save
//! turns the response into a 500.
//!
//! # Submodules
//!
//! - [`auth`]: who is logged in, login/logout with session id renewal
//! - [`csrf`]: per-session token and the guard for unsafe methods
//! - [`flash`]: one-shot message shown on the next rendered page
//! - [`store`]: the record store and its expired-record purge task
//!
//! ```toml
//! # config.toml
//! [session]
//! cookie_name = "session"
//! expiry_secs = 43200
//! secure = false  # true in production
//! cleanup_interval_secs = 60
//! ```

pub mod auth;
mod config;
pub mod csrf;
mod flash;
pub mod store;

pub use auth::AuthContext;
pub use config::{CsrfConfig, SessionConfig};
pub use csrf::{csrf_guard, CsrfToken};
pub use flash::Flash;
pub use store::{spawn_expired_deletion, MemorySessionStore};

pub use tower_sessions::{cookie::Key, Expiry, Session, SessionManagerLayer};

use time::Duration;
use tower_sessions::cookie::SameSite;

use crate::error::{Error, Result};
use crate::middleware::Layered;

/// Cookie signing key from the configured secret, or a random one.
pub fn signing_key(config: &SessionConfig) -> Result<Key> {
    match config.secret.as_deref() {
        Some(secret) => Key::try_from(secret.as_bytes())
            .map_err(|e| Error::Session(format!("Invalid session secret: {e}"))),
        None => {
            tracing::warn!("No session secret configured, sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}

/// Wrap `target` in the session load/save layer.
///
/// Every target wrapped this way must share `store` and `key`, otherwise a
/// session created behind one route is invisible behind another.
pub fn apply_session_layer<T: Layered>(
    target: T,
    config: &SessionConfig,
    store: MemorySessionStore,
    key: Key,
) -> T {
    let expiry = if config.expiry_secs == 0 {
        Expiry::OnSessionEnd
    } else {
        Expiry::OnInactivity(Duration::seconds(config.expiry_secs as i64))
    };

    let same_site = match config.same_site.to_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    };

    let mut layer = SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_expiry(expiry)
        .with_secure(config.secure)
        .with_http_only(config.http_only)
        .with_same_site(same_site)
        .with_path(config.cookie_path.clone());

    if let Some(domain) = config.cookie_domain.clone() {
        layer = layer.with_domain(domain);
    }

    target.with_layer(layer.with_signed(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_from_secret() {
        let config = SessionConfig {
            secret: Some("s".repeat(64)),
            ..Default::default()
        };
        let first = signing_key(&config).unwrap();
        let second = signing_key(&config).unwrap();
        assert_eq!(first.master(), second.master());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = SessionConfig {
            secret: Some("too short".to_string()),
            ..Default::default()
        };
        assert!(matches!(signing_key(&config), Err(Error::Session(_))));
    }

    #[test]
    fn test_generated_key_when_no_secret() {
        let config = SessionConfig::default();
        let first = signing_key(&config).unwrap();
        let second = signing_key(&config).unwrap();
        assert_ne!(first.master(), second.master());
    }
}

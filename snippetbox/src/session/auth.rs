//! Authentication state kept in the session.
//!
//! The session only records *who* logged in. [`AuthContext`] is derived from
//! it once per request by the `authenticate` stage and read from the request
//! extensions afterwards; handlers never consult the session key directly.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::Error;

/// Session key holding the logged-in user's id.
pub const AUTHENTICATED_USER_ID_KEY: &str = "authenticated_user_id";

/// Session key holding the path to return to after logging in.
pub const REDIRECT_AFTER_LOGIN_KEY: &str = "redirect_path_after_login";

/// Who is making the current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthContext {
    user_id: Option<i64>,
}

impl AuthContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    #[must_use]
    pub fn authenticated(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }
}

/// Requests that never passed the authenticate stage are anonymous.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .unwrap_or_default())
    }
}

/// User id stored by the last successful login, if any.
pub async fn authenticated_user_id(session: &Session) -> Result<Option<i64>, Error> {
    session
        .get::<i64>(AUTHENTICATED_USER_ID_KEY)
        .await
        .map_err(|e| Error::Session(format!("Failed to read authenticated user: {e}")))
}

/// Mark the session as belonging to `user_id` under a fresh session id.
pub async fn login(session: &Session, user_id: i64) -> Result<(), Error> {
    session.cycle_id().await?;
    session.insert(AUTHENTICATED_USER_ID_KEY, user_id).await?;
    Ok(())
}

/// Forget the logged-in user; the session id changes as well.
pub async fn logout(session: &Session) -> Result<(), Error> {
    session.remove::<i64>(AUTHENTICATED_USER_ID_KEY).await?;
    session.cycle_id().await?;
    Ok(())
}

/// Remember where an anonymous visitor was headed.
pub async fn remember_redirect(session: &Session, path: &str) -> Result<(), Error> {
    session.insert(REDIRECT_AFTER_LOGIN_KEY, path).await?;
    Ok(())
}

/// Pop the remembered path; a second call returns `None`.
pub async fn take_redirect(session: &Session) -> Result<Option<String>, Error> {
    Ok(session.remove::<String>(REDIRECT_AFTER_LOGIN_KEY).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::session::MemorySessionStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemorySessionStore::default()), None)
    }

    #[test]
    fn test_auth_context() {
        let anon = AuthContext::default();
        assert!(!anon.is_authenticated());
        assert_eq!(anon, AuthContext::anonymous());

        let alice = AuthContext::authenticated(1);
        assert!(alice.is_authenticated());
        assert_eq!(alice.user_id(), Some(1));
    }

    #[tokio::test]
    async fn test_login_and_logout_cycle_session_id() {
        let session = session();
        session.insert("seen", true).await.unwrap();
        session.save().await.unwrap();
        let anonymous_id = session.id();
        assert!(anonymous_id.is_some());

        login(&session, 7).await.unwrap();
        session.save().await.unwrap();
        let login_id = session.id();
        assert_ne!(login_id, anonymous_id);
        assert_eq!(authenticated_user_id(&session).await.unwrap(), Some(7));
        // data other than the auth id survives renewal
        assert_eq!(session.get::<bool>("seen").await.unwrap(), Some(true));

        logout(&session).await.unwrap();
        session.save().await.unwrap();
        assert_ne!(session.id(), login_id);
        assert_eq!(authenticated_user_id(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redirect_path_is_one_shot() {
        let session = session();
        remember_redirect(&session, "/snippet/create").await.unwrap();

        assert_eq!(
            take_redirect(&session).await.unwrap().as_deref(),
            Some("/snippet/create")
        );
        assert_eq!(take_redirect(&session).await.unwrap(), None);
    }
}

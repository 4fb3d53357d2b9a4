//! Data handed to every page template.

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Datelike, Utc};
use serde::Serialize;
use tower_sessions::Session;

use crate::error::Error;
use crate::session::{AuthContext, CsrfToken, Flash};
use crate::store::{Snippet, User};

/// Render context shared by all pages.
///
/// Built per request from [`PageContext::template_data`], then extended by
/// the handler with whatever the page shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub flash: String,
    /// The submitted (or empty) form, including its validation errors.
    pub form: Option<minijinja::Value>,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub user: Option<User>,
}

impl TemplateData {
    /// Attach a form so a failed submission re-renders with the user's input.
    #[must_use]
    pub fn with_form<F: Serialize>(mut self, form: &F) -> Self {
        self.form = Some(minijinja::Value::from_serialize(form));
        self
    }

    #[must_use]
    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    #[must_use]
    pub fn with_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.snippets = snippets;
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }
}

/// Request-scoped values a page needs: session, auth state, CSRF token.
///
/// Extracting it has no side effects; the flash message is only consumed
/// when [`template_data`](Self::template_data) is called, so handlers that
/// redirect instead of rendering leave it for the next page.
#[derive(Debug, Clone)]
pub struct PageContext {
    session: Session,
    auth: AuthContext,
    csrf_token: Option<CsrfToken>,
}

impl PageContext {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn auth(&self) -> AuthContext {
        self.auth
    }

    /// Defaults for every page; pops the flash message.
    pub async fn template_data(&self) -> Result<TemplateData, Error> {
        Ok(TemplateData {
            current_year: Utc::now().year(),
            is_authenticated: self.auth.is_authenticated(),
            csrf_token: self
                .csrf_token
                .as_ref()
                .map(|t| t.token().to_string())
                .unwrap_or_default(),
            flash: Flash::pop(&self.session).await?,
            ..TemplateData::default()
        })
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            Error::Session("Session not found in request extensions".to_string())
        })?;

        Ok(Self {
            session,
            auth: parts
                .extensions
                .get::<AuthContext>()
                .copied()
                .unwrap_or_default(),
            csrf_token: parts.extensions.get::<CsrfToken>().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Arc;
    use crate::session::MemorySessionStore;

    use crate::validator::Validator;

    #[derive(Default, Serialize, Deserialize)]
    struct LoginForm {
        email: String,
        #[serde(skip_deserializing)]
        validator: Validator,
    }

    fn parts_with(session: &Session) -> Parts {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(session.clone());
        parts.extensions.insert(AuthContext::authenticated(1));
        parts
            .extensions
            .insert(CsrfToken::new("token123".to_string()));
        parts
    }

    #[tokio::test]
    async fn test_template_data_defaults() {
        let session = Session::new(None, Arc::new(MemorySessionStore::default()), None);
        Flash::put(&session, "Snippet successfully created!")
            .await
            .unwrap();

        let ctx = PageContext::from_request_parts(&mut parts_with(&session), &())
            .await
            .unwrap();
        let data = ctx.template_data().await.unwrap();

        assert_eq!(data.current_year, Utc::now().year());
        assert!(data.is_authenticated);
        assert_eq!(data.csrf_token, "token123");
        assert_eq!(data.flash, "Snippet successfully created!");

        // the flash was consumed by the first render
        let again = ctx.template_data().await.unwrap();
        assert_eq!(again.flash, "");
    }

    #[tokio::test]
    async fn test_missing_session_is_an_error() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let result = PageContext::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(Error::Session(_))));
    }

    #[test]
    fn test_form_keeps_input_and_errors() {
        let mut form = LoginForm {
            email: "not-an-email".to_string(),
            ..Default::default()
        };
        form.validator
            .add_field_error("email", "This field must be a valid email address");

        let data = TemplateData::default().with_form(&form);
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["form"]["email"], "not-an-email");
        assert_eq!(
            value["form"]["validator"]["field_errors"]["email"],
            "This field must be a valid email address"
        );
    }
}

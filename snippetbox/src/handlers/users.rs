//! Signup, login and logout

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use super::DEFAULT_LOGIN_REDIRECT;
use crate::error::Result;
use crate::form::DecodedForm;
use crate::session::{auth, Flash};
use crate::state::AppState;
use crate::store::StoreError;
use crate::templates::PageContext;
use crate::validator::{matches, min_chars, not_blank, Validator, EMAIL_RX};

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl SignupForm {
    pub fn validate(&mut self) {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.name), "name", "This field cannot be blank");
        v.check_field(not_blank(&self.email), "email", "This field cannot be blank");
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", "This field cannot be blank");
        v.check_field(
            min_chars(&self.password, MIN_PASSWORD_CHARS),
            "password",
            "This field must be at least 8 characters long",
        );
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl LoginForm {
    pub fn validate(&mut self) {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.email), "email", "This field cannot be blank");
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", "This field cannot be blank");
    }
}

pub async fn signup(State(state): State<AppState>, page: PageContext) -> Result<Response> {
    let data = page.template_data().await?.with_form(&SignupForm::default());
    state.templates().render(StatusCode::OK, "signup.html", &data)
}

pub async fn signup_post(
    State(state): State<AppState>,
    page: PageContext,
    DecodedForm(mut form): DecodedForm<SignupForm>,
) -> Result<Response> {
    form.validate();

    if form.validator.valid() {
        match state
            .users()
            .insert(&form.name, &form.email, &form.password)
            .await
        {
            Ok(()) => {
                Flash::put(page.session(), "Your signup was successful. Please log in.").await?;
                return Ok(Redirect::to("/user/login").into_response());
            }
            Err(StoreError::DuplicateEmail) => {
                form.validator
                    .add_field_error("email", "Email address is already in use");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = page.template_data().await?.with_form(&form);
    state
        .templates()
        .render(StatusCode::UNPROCESSABLE_ENTITY, "signup.html", &data)
}

pub async fn login(State(state): State<AppState>, page: PageContext) -> Result<Response> {
    let data = page.template_data().await?.with_form(&LoginForm::default());
    state.templates().render(StatusCode::OK, "login.html", &data)
}

/// Check credentials, renew the session and go back to where the user was
/// sent from, if anywhere.
pub async fn login_post(
    State(state): State<AppState>,
    page: PageContext,
    DecodedForm(mut form): DecodedForm<LoginForm>,
) -> Result<Response> {
    form.validate();

    if form.validator.valid() {
        match state.users().authenticate(&form.email, &form.password).await {
            Ok(user_id) => {
                let session = page.session();
                auth::login(session, user_id).await?;
                tracing::info!(user_id, "User logged in");

                let target = auth::take_redirect(session)
                    .await?
                    .unwrap_or_else(|| DEFAULT_LOGIN_REDIRECT.to_string());
                return Ok(Redirect::to(&target).into_response());
            }
            Err(StoreError::InvalidCredentials) => {
                form.validator
                    .add_non_field_error("Email or password is incorrect");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = page.template_data().await?.with_form(&form);
    state
        .templates()
        .render(StatusCode::UNPROCESSABLE_ENTITY, "login.html", &data)
}

pub async fn logout_post(page: PageContext) -> Result<Response> {
    let session = page.session();
    auth::logout(session).await?;
    Flash::put(session, "You've been logged out successfully!").await?;

    tracing::info!(user_id = ?page.auth().user_id(), "User logged out");
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let mut form = SignupForm {
            name: String::new(),
            email: "bob@".to_string(),
            password: "short".to_string(),
            ..Default::default()
        };
        form.validate();

        let v = &form.validator;
        assert_eq!(v.field_error("name"), Some("This field cannot be blank"));
        assert_eq!(v.field_error("email"), Some("This field must be a valid email address"));
        assert_eq!(
            v.field_error("password"),
            Some("This field must be at least 8 characters long")
        );
    }

    #[test]
    fn test_blank_email_reports_blank_first() {
        let mut form = LoginForm::default();
        form.validate();
        assert_eq!(form.validator.field_error("email"), Some("This field cannot be blank"));
        assert_eq!(form.validator.field_error("password"), Some("This field cannot be blank"));
    }

    #[test]
    fn test_password_never_rendered_back() {
        let form = LoginForm {
            email: "bob@example.com".to_string(),
            password: "validPa$$word".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["email"], "bob@example.com");
        assert!(value.get("password").is_none());
    }
}

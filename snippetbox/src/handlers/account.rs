//! Account pages (protected)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::form::DecodedForm;
use crate::middleware::LOGIN_PATH;
use crate::session::Flash;
use crate::state::AppState;
use crate::store::StoreError;
use crate::templates::PageContext;
use crate::validator::{min_chars, not_blank, Validator};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordUpdateForm {
    #[serde(skip_serializing)]
    pub current_password: String,
    #[serde(skip_serializing)]
    pub new_password: String,
    #[serde(skip_serializing)]
    pub new_password_confirmation: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl PasswordUpdateForm {
    pub fn validate(&mut self) {
        let v = &mut self.validator;
        v.check_field(
            not_blank(&self.current_password),
            "currentPassword",
            "This field cannot be blank",
        );
        v.check_field(
            not_blank(&self.new_password),
            "newPassword",
            "This field cannot be blank",
        );
        v.check_field(
            min_chars(&self.new_password, 8),
            "newPassword",
            "This field must be at least 8 characters long",
        );
        v.check_field(
            not_blank(&self.new_password_confirmation),
            "newPasswordConfirmation",
            "This field cannot be blank",
        );
        v.check_field(
            self.new_password == self.new_password_confirmation,
            "newPasswordConfirmation",
            "Passwords do not match",
        );
    }
}

fn current_user_id(page: &PageContext) -> Result<i64> {
    page.auth()
        .user_id()
        .ok_or_else(|| Error::Internal("protected handler reached without a user".to_string()))
}

pub async fn account_view(State(state): State<AppState>, page: PageContext) -> Result<Response> {
    let user_id = current_user_id(&page)?;

    let user = match state.users().get(user_id).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Ok(Redirect::to(LOGIN_PATH).into_response()),
        Err(e) => return Err(e.into()),
    };

    let data = page.template_data().await?.with_user(user);
    state.templates().render(StatusCode::OK, "account.html", &data)
}

pub async fn password_update(State(state): State<AppState>, page: PageContext) -> Result<Response> {
    let data = page
        .template_data()
        .await?
        .with_form(&PasswordUpdateForm::default());
    state.templates().render(StatusCode::OK, "password.html", &data)
}

pub async fn password_update_post(
    State(state): State<AppState>,
    page: PageContext,
    DecodedForm(mut form): DecodedForm<PasswordUpdateForm>,
) -> Result<Response> {
    form.validate();

    if form.validator.valid() {
        let user_id = current_user_id(&page)?;
        match state
            .users()
            .update_password(user_id, &form.current_password, &form.new_password)
            .await
        {
            Ok(()) => {
                tracing::info!(user_id, "Password updated");
                Flash::put(page.session(), "Your password has been updated!").await?;
                return Ok(Redirect::to("/account/view").into_response());
            }
            Err(StoreError::InvalidCredentials) => {
                form.validator
                    .add_field_error("currentPassword", "Current password is incorrect");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = page.template_data().await?.with_form(&form);
    state
        .templates()
        .render(StatusCode::UNPROCESSABLE_ENTITY, "password.html", &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_uses_camel_case_field_names() {
        let form: PasswordUpdateForm = crate::form::decode_post_form(
            b"currentPassword=old&newPassword=newer&newPasswordConfirmation=newer",
        )
        .unwrap();
        assert_eq!(form.current_password, "old");
        assert_eq!(form.new_password, "newer");
        assert_eq!(form.new_password_confirmation, "newer");
    }

    #[test]
    fn test_mismatched_confirmation() {
        let mut form = PasswordUpdateForm {
            current_password: "pa$$word".to_string(),
            new_password: "newPa$$word".to_string(),
            new_password_confirmation: "otherPa$$word".to_string(),
            ..Default::default()
        };
        form.validate();
        assert_eq!(
            form.validator.field_error("newPasswordConfirmation"),
            Some("Passwords do not match")
        );
        assert!(form.validator.field_error("newPassword").is_none());
    }
}

//! Snippet pages

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::form::DecodedForm;
use crate::session::Flash;
use crate::state::AppState;
use crate::templates::PageContext;
use crate::validator::{max_chars, not_blank, permitted_value, Validator};

const PERMITTED_EXPIRES: [u32; 3] = [1, 7, 365];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: u32,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl SnippetCreateForm {
    pub fn validate(&mut self) {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.title), "title", "This field cannot be blank");
        v.check_field(
            max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(not_blank(&self.content), "content", "This field cannot be blank");
        v.check_field(
            permitted_value(&self.expires, &PERMITTED_EXPIRES),
            "expires",
            "This field must equal 1, 7 or 365",
        );
    }
}

/// Parse a snippet id from the path; anything but a positive integer is a 404.
fn parse_id(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(Error::NotFound(format!("invalid snippet id {:?}", raw))),
    }
}

pub async fn snippet_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    page: PageContext,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let snippet = state.snippets().get(id).await?;

    let data = page.template_data().await?.with_snippet(snippet);
    state.templates().render(StatusCode::OK, "view.html", &data)
}

pub async fn snippet_create(State(state): State<AppState>, page: PageContext) -> Result<Response> {
    let form = SnippetCreateForm {
        expires: state.config().snippets.default_expires_days,
        ..Default::default()
    };

    let data = page.template_data().await?.with_form(&form);
    state.templates().render(StatusCode::OK, "create.html", &data)
}

pub async fn snippet_create_post(
    State(state): State<AppState>,
    page: PageContext,
    DecodedForm(mut form): DecodedForm<SnippetCreateForm>,
) -> Result<Response> {
    form.validate();
    if !form.validator.valid() {
        let data = page.template_data().await?.with_form(&form);
        return state
            .templates()
            .render(StatusCode::UNPROCESSABLE_ENTITY, "create.html", &data);
    }

    let id = state
        .snippets()
        .insert(&form.title, &form.content, form.expires)
        .await?;

    tracing::info!(snippet_id = id, "Snippet created");
    Flash::put(page.session(), "Snippet successfully created!").await?;

    Ok(Redirect::to(&format!("/snippet/view/{}", id)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1").unwrap(), 1);
        for raw in ["-1", "0", "1.23", "foo", ""] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND, "{raw}");
        }
    }

    #[test]
    fn test_validate_accepts_good_form() {
        let mut form = SnippetCreateForm {
            title: "O snail".to_string(),
            content: "Climb Mount Fuji".to_string(),
            expires: 7,
            ..Default::default()
        };
        form.validate();
        assert!(form.validator.valid());
    }

    #[test]
    fn test_validate_reports_each_field() {
        let mut form = SnippetCreateForm {
            title: "x".repeat(101),
            content: "   ".to_string(),
            expires: 30,
            ..Default::default()
        };
        form.validate();

        let v = &form.validator;
        assert_eq!(
            v.field_error("title"),
            Some("This field cannot be more than 100 characters long")
        );
        assert_eq!(v.field_error("content"), Some("This field cannot be blank"));
        assert_eq!(v.field_error("expires"), Some("This field must equal 1, 7 or 365"));
    }

    #[test]
    fn test_title_counts_characters() {
        let mut form = SnippetCreateForm {
            title: "é".repeat(100),
            content: "c".to_string(),
            expires: 1,
            ..Default::default()
        };
        form.validate();
        assert!(form.validator.valid());
    }
}

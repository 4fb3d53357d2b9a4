//! Page handlers
//!
//! Every handler that renders a page starts from
//! [`PageContext::template_data`](crate::templates::PageContext::template_data)
//! and hands the result to the template cache. Form submissions follow one
//! cycle: decode with [`DecodedForm`](crate::form::DecodedForm), validate
//! into the form's embedded [`Validator`](crate::validator::Validator), and
//! either re-render with 422 or act and redirect with 303.

mod account;
mod pages;
mod snippets;
mod users;

pub use account::{account_view, password_update, password_update_post, PasswordUpdateForm};
pub use pages::{about, home, not_found, ping};
pub use snippets::{snippet_create, snippet_create_post, snippet_view, SnippetCreateForm};
pub use users::{login, login_post, logout_post, signup, signup_post, LoginForm, SignupForm};

/// Where a successful login goes when no protected page was requested first
pub const DEFAULT_LOGIN_REDIRECT: &str = "/snippet/create";

//! Server-side page rendering with minijinja.
//!
//! Page sources live in `ui/html/` and are embedded into the binary:
//!
//! ```text
//! ui/html/base.html            layout with `title` and `main` blocks
//! ui/html/partials/*.html      included by the layout (navigation, ...)
//! ui/html/pages/*.html         one per page, `{% extends "base.html" %}`
//! ```
//!
//! ```rust,ignore
//! async fn about(State(state): State<AppState>, ctx: PageContext) -> Result<Response> {
//!     let data = ctx.template_data().await?;
//!     state.templates().render(StatusCode::OK, "about.html", &data)
//! }
//! ```

mod cache;
mod context;
mod helpers;

pub use cache::TemplateCache;
pub use context::{PageContext, TemplateData};
pub use helpers::human_date;

//! Precompiled page templates.
//!
//! The HTML sources are embedded at compile time. At startup every
//! `pages/*.html` file is compiled into its own environment together with
//! `base.html` and all `partials/*.html`, and the result is keyed by the
//! page's file name (`home.html`). Pages therefore cannot see each other's
//! blocks, and the cache never changes after it is built.

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::Environment;
use rust_embed::Embed;
use serde::Serialize;

use super::helpers::human_date_filter;
use crate::error::{Error, Result};

const BASE_TEMPLATE: &str = "base.html";
const PARTIALS_DIR: &str = "partials/";
const PAGES_DIR: &str = "pages/";

/// Embed all templates at compile time
#[derive(Embed)]
#[folder = "ui/html/"]
struct EmbeddedTemplates;

/// Immutable map from page name to its compiled environment.
pub struct TemplateCache {
    pages: HashMap<String, Environment<'static>>,
}

impl TemplateCache {
    /// Compile the embedded templates.
    pub fn build() -> Result<Self> {
        let mut sources = Vec::new();
        for name in EmbeddedTemplates::iter() {
            let file = EmbeddedTemplates::get(&name)
                .ok_or_else(|| Error::Template(format!("embedded template {name} vanished")))?;
            let source = String::from_utf8(file.data.into_owned()).map_err(|e| {
                Error::Template(format!("template {name} is not valid UTF-8: {e}"))
            })?;
            sources.push((name.into_owned(), source));
        }

        Self::from_sources(sources)
    }

    /// Compile from `(path, source)` pairs laid out like `ui/html/`.
    ///
    /// Fails on the first template that does not parse.
    pub fn from_sources<N, S>(sources: impl IntoIterator<Item = (N, S)>) -> Result<Self>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let mut base = None;
        let mut partials = Vec::new();
        let mut pages = Vec::new();

        for (name, source) in sources {
            let (name, source) = (name.into(), source.into());
            if name == BASE_TEMPLATE {
                base = Some(source);
            } else if name.starts_with(PARTIALS_DIR) {
                partials.push((name, source));
            } else if name.starts_with(PAGES_DIR) {
                pages.push((name, source));
            }
        }

        let base = base.ok_or_else(|| Error::Template(format!("{BASE_TEMPLATE} is missing")))?;

        let mut cache = HashMap::with_capacity(pages.len());
        for (path, source) in pages {
            let mut env = new_environment();
            env.add_template_owned(BASE_TEMPLATE, base.clone())?;
            for (name, partial) in &partials {
                env.add_template_owned(name.clone(), partial.clone())?;
            }
            env.add_template_owned(path.clone(), source)?;

            let key = path.trim_start_matches(PAGES_DIR).to_string();
            tracing::debug!(page = %key, "Compiled page template");
            cache.insert(key, env);
        }

        Ok(Self { pages: cache })
    }

    /// True when `page` was compiled into the cache.
    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    /// Render `page` to a string.
    ///
    /// Asking for a page that was never compiled is a programming error and
    /// reported as such.
    pub fn render_to_string<D: Serialize>(&self, page: &str, data: &D) -> Result<String> {
        let env = self
            .pages
            .get(page)
            .ok_or_else(|| Error::Template(format!("the template {page} does not exist")))?;

        let template = env.get_template(&format!("{PAGES_DIR}{page}"))?;
        Ok(template.render(data)?)
    }

    /// Render `page` with `status`.
    ///
    /// The whole page is rendered into a buffer first, so a failing template
    /// produces a 500 instead of a half-written page with the wrong status.
    pub fn render<D: Serialize>(&self, status: StatusCode, page: &str, data: &D) -> Result<Response> {
        let body = self.render_to_string(page, data)?;
        Ok((status, Html(body)).into_response())
    }
}

fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("human_date", human_date_filter);
    env
}

impl std::fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pages: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        pages.sort();
        f.debug_struct("TemplateCache").field("pages", &pages).finish()
    }
}

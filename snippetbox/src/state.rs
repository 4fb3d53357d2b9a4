//! Application state management

use std::sync::Arc;

use crate::{
    auth::PasswordHasher,
    config::Config,
    error::Result,
    session::{self, Key, MemorySessionStore},
    store::{MemorySnippetStore, MemoryUserStore, SnippetStore, UserStore},
    templates::TemplateCache,
};

/// Application state shared across handlers and middleware stages
///
/// Everything in here is immutable after startup or synchronizes
/// internally, so cloning the state per request is cheap and lock-free.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    templates: Arc<TemplateCache>,
    snippets: Arc<dyn SnippetStore>,
    users: Arc<dyn UserStore>,
    session_store: MemorySessionStore,
    session_key: Key,
}

impl AppState {
    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn templates(&self) -> &TemplateCache {
        &self.templates
    }

    pub fn snippets(&self) -> &dyn SnippetStore {
        self.snippets.as_ref()
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Store shared by every router wrapped in the session stage
    pub fn session_store(&self) -> MemorySessionStore {
        self.session_store.clone()
    }

    pub fn session_key(&self) -> Key {
        self.session_key.clone()
    }

    /// Largest body the CSRF guard and form binder will buffer
    pub fn body_limit(&self) -> usize {
        self.config.middleware.body_limit_bytes()
    }
}

/// Builder for AppState
///
/// Anything not provided falls back to: `Config::default()`, the embedded
/// templates, and the in-memory stores.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    templates: Option<TemplateCache>,
    snippets: Option<Arc<dyn SnippetStore>>,
    users: Option<Arc<dyn UserStore>>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a prebuilt template cache instead of the embedded pages
    pub fn templates(mut self, templates: TemplateCache) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn snippets(mut self, store: Arc<dyn SnippetStore>) -> Self {
        self.snippets = Some(store);
        self
    }

    pub fn users(mut self, store: Arc<dyn UserStore>) -> Self {
        self.users = Some(store);
        self
    }

    /// Build the state
    ///
    /// Fails when the templates do not compile, the session secret is too
    /// short, or the password parameters are rejected.
    pub fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();

        let templates = match self.templates {
            Some(templates) => templates,
            None => TemplateCache::build()?,
        };

        let snippets = match self.snippets {
            Some(store) => store,
            None => Arc::new(MemorySnippetStore::new()),
        };

        let users = match self.users {
            Some(store) => store,
            None => Arc::new(MemoryUserStore::new(PasswordHasher::new(&config.password)?)),
        };

        let session_key = session::signing_key(&config.session)?;

        Ok(AppState {
            config: Arc::new(config),
            templates: Arc::new(templates),
            snippets,
            users,
            session_store: MemorySessionStore::default(),
            session_key,
        })
    }
}

use anyhow::Context;
use snippetbox::prelude::*;
use snippetbox::session::spawn_expired_deletion;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config)?;

    let state = AppState::builder()
        .config(config.clone())
        .build()
        .context("failed to build application state")?;
    tracing::info!(templates = ?state.templates(), "Application state ready");

    let purge = config
        .session
        .cleanup_interval()
        .map(|period| spawn_expired_deletion(state.session_store(), period));

    let served = Server::new(config).serve(routes(state)).await;

    // serve returns once in-flight requests have drained
    if let Some(purge) = purge {
        purge.abort();
    }

    Ok(served?)
}

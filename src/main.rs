mod config;
mod db;
mod entities;
mod error;
mod models;
mod movies;
mod omdb;
mod ranking;
mod routes;
mod store;

#[cfg(test)]
mod tests;

use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    omdb::{MetadataProvider, OmdbClient},
    store::MovieStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: MovieStore,
    pub provider: Arc<dyn MetadataProvider>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,marquee=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = wreq::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = MovieStore::new(db);

    let omdb = OmdbClient::new(
        http,
        config.omdb_api_key.clone(),
        config.omdb_base_url.clone(),
        config.omdb_rps,
    );

    let state = Arc::new(AppState { store, provider: Arc::new(omdb) });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

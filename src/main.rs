mod analysis;
mod config;
mod error;
mod sentiment;
mod storage;
mod web;
mod youtube;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentitube=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = config::AppConfig::load()?;

    // Loaded once, shared read-only across requests
    let classifier = Arc::new(sentiment::SentimentClassifier::load(&config.model));

    let youtube = youtube::YouTubeClient::new(&config.youtube);

    let store = storage::AnalysisStore::connect(&config.database).await?;

    let analyzer = Arc::new(analysis::CommentAnalyzer::new(
        youtube.clone(),
        classifier.clone(),
        store.clone(),
        config.youtube.max_comments,
    ));

    let state = web::state::AppState {
        analyzer,
        classifier,
        youtube,
        store,
    };

    let router = web::create_router(state);
    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

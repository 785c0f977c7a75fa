use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use study_backend::{
    config::Config,
    api::routes::create_router,
    llm::GeminiClient,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("study_backend=debug,tower_http=info")),
        )
        .init();

    // Fails before binding when the API key is absent
    let config = Config::load()?;
    let server_addr = config.server_addr;

    let provider = GeminiClient::new(&config);
    info!(model = %config.gemini_model, endpoint = %provider.endpoint(), "using Gemini provider");

    let app_state = AppState {
        config: Arc::new(config),
        provider: Arc::new(provider),
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;

    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use hackathon_api::api::build_router;
use hackathon_api::config::Config;
use hackathon_api::domain::repositories::DocumentStore;
use hackathon_api::infrastructure::atlas::AtlasClient;
use hackathon_api::infrastructure::email::{HttpEmailNotifier, LogNotifier, Notifier};
use hackathon_api::infrastructure::llm::{AnthropicClient, TextGenerator};
use hackathon_api::infrastructure::repositories::{InMemoryDocumentStore, PostgresDocumentStore};
use hackathon_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    // Connect to database
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;
            let store = PostgresDocumentStore::new(pool);
            store.migrate().await?;
            tracing::info!("Database connected successfully");
            Arc::new(store)
        }
        None => Arc::new(InMemoryDocumentStore::new()),
    };

    let notifier: Arc<dyn Notifier> = match &config.email {
        Some(email) => Arc::new(HttpEmailNotifier::new(email.clone())?),
        None => Arc::new(LogNotifier),
    };

    let llm = config.llm.clone().map(AnthropicClient::new).transpose()?;
    let atlas = config.atlas.clone().map(AtlasClient::new).transpose()?;
    let port = config.port;

    let mut state = AppState::new(config, store, notifier);
    if let Some(llm) = llm {
        tracing::info!(model = llm.model(), "LLM features enabled");
        state = state.with_llm(Arc::new(llm));
    }
    if let Some(atlas) = atlas {
        state = state.with_provisioner(Arc::new(atlas));
    }

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

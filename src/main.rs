use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use inventory_api::{
    build_router,
    cli::{Arguments, Command},
    AppState, Config, InventoryStore, MemoryStore, PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,inventory_api=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Arguments::parse();
    let config = Config::from_env()?;

    let store: Arc<dyn InventoryStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url, config.db_max_connections).await?),
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store (data is lost on exit)");
            Arc::new(MemoryStore::new())
        }
    };

    match args.command() {
        Command::Serve => serve(config, store).await,
        Command::IssueToken { username } => {
            let token = store.issue_token(&username).await?;
            info!(username = %token.username, "Issued API token");
            println!("{}", token.key);
            Ok(())
        }
        Command::RevokeToken { key } => {
            if store.revoke_token(&key).await? {
                info!("Token revoked");
            } else {
                warn!("No such token");
            }
            Ok(())
        }
    }
}

async fn serve(config: Config, store: Arc<dyn InventoryStore>) -> anyhow::Result<()> {
    for grant in &config.api_tokens {
        store.register_token(&grant.username, &grant.key).await?;
    }
    info!(count = config.api_tokens.len(), "Registered API tokens from API_TOKENS");

    let app = build_router(AppState::new(store));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

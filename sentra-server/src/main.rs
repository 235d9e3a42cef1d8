use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sentra::{RepositoryProvider, Sentra, SqliteRepositoryProvider, TokenConfig};

/// Sentra: security-incident and asset tracking backend
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env = "SENTRA_DATABASE_URL", default_value = "sqlite:sentra.db")]
    db_url: String,

    /// Address to listen on
    #[arg(long, env = "SENTRA_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,

    /// HS256 secret used to sign bearer tokens
    #[arg(long, env = "SENTRA_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Bearer token lifetime in hours
    #[arg(long, env = "SENTRA_TOKEN_TTL_HOURS", default_value_t = 24)]
    token_ttl_hours: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let repositories = Arc::new(SqliteRepositoryProvider::connect(&cli.db_url).await?);
    repositories.migrate().await?;
    info!("Database migrations completed");

    let tokens = TokenConfig::new_hs256(cli.jwt_secret.into_bytes())
        .with_issuer("sentra")
        .expires_in(Duration::hours(cli.token_ttl_hours));

    let sentra = Arc::new(Sentra::new(repositories, tokens));

    let app = sentra_axum::create_router(sentra);

    let listener = tokio::net::TcpListener::bind(&cli.addr).await?;
    info!("Server listening on {}", cli.addr);
    axum::serve(listener, app).await?;

    Ok(())
}

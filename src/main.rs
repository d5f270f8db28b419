use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use tracing::info;

use crud_customer::api::{create_router, serve, shutdown_signal};
use crud_customer::app::{AppState, DEFAULT_SEED_COUNT, seed_customers};
use crud_customer::config::AppConfig;
use crud_customer::infra::{SqliteClient, SqliteConfig, init_tracing};

const USAGE: &str = "usage: crud-customer [serve | migrate | seed [count]]";

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Serve,
    Migrate,
    Seed(usize),
}

fn parse_command<I>(mut args: I) -> Result<Command>
where
    I: Iterator<Item = String>,
{
    let command = match args.next().as_deref() {
        None | Some("serve") => Command::Serve,
        Some("migrate") => Command::Migrate,
        Some("seed") => {
            let count = match args.next() {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("invalid seed count '{raw}'\n{USAGE}"))?,
                None => DEFAULT_SEED_COUNT,
            };
            Command::Seed(count)
        }
        Some(other) => bail!("unknown command '{other}'\n{USAGE}"),
    };

    if let Some(extra) = args.next() {
        bail!("unexpected argument '{extra}'\n{USAGE}");
    }
    Ok(command)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let command = parse_command(std::env::args().skip(1))?;
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log).context("failed to initialize logging")?;

    let pool_config = SqliteConfig {
        max_connections: config.database.max_connections,
        ..SqliteConfig::default()
    };
    let db = Arc::new(
        SqliteClient::new(&config.database.url, pool_config)
            .await
            .context("failed to open database")?,
    );
    db.run_migrations()
        .await
        .context("failed to run migrations")?;

    match command {
        Command::Migrate => {}
        Command::Seed(count) => {
            let ids = seed_customers(db.as_ref(), count).await?;
            info!(inserted = ids.len(), "Seeding finished");
        }
        Command::Serve => {
            let app_state = Arc::new(AppState::new(db.clone()));
            let router = create_router(app_state, &config.server);

            let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            info!(%addr, "Server starting");

            serve(
                listener,
                router,
                shutdown_signal(),
                config.server.shutdown_timeout,
            )
            .await?;
        }
    }

    db.close().await;
    Ok(())
}

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use placemap::report::summary_table;
use placemap::telemetry;
use placemap::state::{build_importer, connect_pool};
use placemap::{router, AppState};
use placemap_core::config::AppConfig;
use placemap_core::places::PgPlaceStore;
use placemap_core::properties::PgPropertyStore;
use placemap_core::{db, seed};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Placemap API server and import CLI", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Run database migrations
    Migrate,
    /// Seed sample places (optionally running migrations)
    DbSeed(DbSeedArgs),
    /// Run a spreadsheet import once and print the summary
    Import,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to listen on, overriding PLACEMAP_BIND
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Args, Debug, Default)]
struct DbSeedArgs {
    /// Skip running migrations before seeding
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    telemetry::init(cli.log_json);

    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Serve(args) => {
            let bind = args.bind.unwrap_or_else(|| config.bind_addr.clone());
            let state = AppState::from_config(&config).await?;
            let listener = TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;
            info!(%bind, "Placemap API listening");
            axum::serve(listener, router(state)).await?;
            Ok(())
        }
        Command::Migrate => {
            let pool = connect_pool(&config).await?;
            db::run_migrations(&pool).await?;
            info!("Database migrations applied");
            Ok(())
        }
        Command::DbSeed(args) => {
            let pool = connect_pool(&config).await?;
            if args.skip_migrations {
                warn!("Skipping migrations before seeding");
            } else {
                db::run_migrations(&pool).await?;
            }
            let inserted = seed::run(&PgPlaceStore::new(pool)).await?;
            info!(inserted, "Sample places seeded");
            Ok(())
        }
        Command::Import => {
            let pool = connect_pool(&config).await?;
            db::run_migrations(&pool).await?;
            let importer = build_importer(&config, Arc::new(PgPropertyStore::new(pool)))?;
            let summary = importer.run().await?;

            println!("{}", summary_table(&summary));
            for error in &summary.errors {
                println!("  - {error}");
            }
            Ok(())
        }
    }
}

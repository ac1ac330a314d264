use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod db;
mod engagement;
mod error;
mod models;
mod report;
mod server;
mod summary;
mod week;

use summary::SummaryService;

#[derive(Parser)]
#[command(name = "engagement-summary")]
#[command(about = "Participant engagement summaries for the mindfulness study", long_about = None)]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a demo participant with recent activity
    Seed,
    /// Serve the summary API
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Print one participant's engagement summary
    Summary {
        #[arg(long)]
        user_id: Uuid,
        /// Emit the API's JSON body instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("engagement_summary=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(cli.max_connections)
        .connect(&cli.database_url)
        .await
        .context("failed to connect to Postgres")?;
    debug!(max_connections = cli.max_connections, "connected to Postgres");

    let result = run(cli.command, &pool).await;
    pool.close().await;
    result
}

async fn run(command: Commands, pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let service = SummaryService::new(Arc::new(db::PgStore::new(pool.clone())));

    match command {
        Commands::InitDb => {
            db::init_db(pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let user_id = db::seed(pool).await?;
            println!("Seed data inserted for participant {user_id}.");
        }
        Commands::Serve { bind } => {
            info!(%bind, "starting summary API");
            server::serve(bind, service).await?;
        }
        Commands::Summary { user_id, json } => {
            let summary = service
                .user_summary(user_id)
                .await
                .with_context(|| format!("failed to summarize participant {user_id}"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_summary(user_id, &summary));
            }
        }
    }

    Ok(())
}

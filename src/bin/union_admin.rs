//! Union App Admin CLI
//!
//! Maintenance commands that run against the same database as the server.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use union_app::activity::ActivityEngine;
use union_app::config::AppConfig;
use union_app::database::queries::Queries;
use union_app::database::Database;
use union_app::strike::StrikeRegistry;

#[derive(Parser)]
#[command(name = "union-admin")]
#[command(about = "Administrative tasks for the union app database")]
struct Cli {
    /// Override the configured database URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Recompute activity scores
    Recompute {
        /// Member ID to rescore
        #[arg(short, long, conflicts_with = "all")]
        member: Option<i64>,

        /// Rescore every member
        #[arg(long)]
        all: bool,
    },
    /// Print a member's fee quote
    Fee {
        /// Member ID
        #[arg(short, long)]
        member: i64,
    },
    /// Print the tally for a strike decision
    Tally {
        /// Strike decision ID
        #[arg(short, long)]
        decision: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "union_app=info".into()))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
        config.validate()?;
    }

    let database = Database::new(&config).await?;
    let pool = database.pool().clone();

    match cli.command {
        Commands::Migrate => {
            database.run_migrations().await?;
            println!("Migrations applied to {}", config.database_url);
        }
        Commands::Recompute { member, all } => {
            let engine = ActivityEngine::new(pool.clone());
            let targets = match (member, all) {
                (Some(id), _) => vec![id],
                (None, true) => Queries::list_members(&pool)
                    .await?
                    .into_iter()
                    .map(|m| m.id)
                    .collect(),
                (None, false) => anyhow::bail!("Pass --member <ID> or --all"),
            };

            for member_id in targets {
                let score = engine.recompute(member_id).await?;
                println!("member {member_id}: {score}");
            }
        }
        Commands::Fee { member } => {
            let quote = ActivityEngine::new(pool).fee_quote(member).await?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Commands::Tally { decision } => {
            let view = StrikeRegistry::new(pool).get(decision).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    database.close().await;
    Ok(())
}

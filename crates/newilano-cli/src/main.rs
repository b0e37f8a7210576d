mod catalog;
mod db;
mod rank;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newilano-cli")]
#[command(about = "Newilano storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance.
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Print ranked product lists as JSON.
    Rank {
        #[command(subcommand)]
        command: RankCommands,
    },
    /// Print the catalog, optionally filtered, as JSON.
    Catalog {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
    /// Import brands, products, campaigns, hero slides and users from JSON.
    Seed {
        #[arg(long, default_value = "./config/catalog.json")]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum RankCommands {
    MostFavorited {
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },
    Trending {
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },
    Recommend {
        slug: String,
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("newilano-cli: no command given, see --help");
        return Ok(());
    };

    let config = newilano_core::load_app_config()?;
    // Logs go to stderr so JSON output on stdout stays pipeable.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = newilano_db::PoolConfig::from_app_config(&config);
    let pool = newilano_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_ping(&pool).await,
            DbCommands::Migrate => db::run_migrate(&pool).await,
            DbCommands::Seed { file } => db::run_seed(&pool, &file).await,
        },
        Commands::Rank { command } => {
            let engine = rank::engine(pool, &config);
            match command {
                RankCommands::MostFavorited { limit } => {
                    rank::run_most_favorited(&engine, limit).await
                }
                RankCommands::Trending { limit } => rank::run_trending(&engine, limit).await,
                RankCommands::Recommend { slug, limit } => {
                    rank::run_recommend(&engine, &slug, limit).await
                }
            }
        }
        Commands::Catalog {
            category,
            brand,
            search,
        } => catalog::run_catalog(&pool, category, brand, search).await,
    }
}

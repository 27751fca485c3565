use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use stronger_core::constants::POPULAR_EXERCISES;
use stronger_core::env_string;
use stronger_service::Services;
use stronger_storage::Storage;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "stronger")]
#[command(about = "Strength training log: workouts, nutrition and friends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Print site-wide record counts as JSON
    Stats,
    /// List registered users as JSON
    Users,
    /// Most logged exercises by set count
    Popular {
        #[arg(short, long, default_value_t = POPULAR_EXERCISES)]
        limit: usize,
    },
    /// Register an account without going through the signup page
    CreateUser {
        username: String,
        email: String,
        password: String,
    },
}

/// Database location: `STRONGER_DB_PATH`, else the platform data directory.
pub(crate) fn get_db_path() -> PathBuf {
    env_string("STRONGER_DB_PATH").map_or_else(
        || dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("stronger").join("stronger.db"),
        PathBuf::from,
    )
}

pub(crate) fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub(crate) fn open_services() -> Result<Services> {
    let db_path = get_db_path();
    ensure_db_dir(&db_path)?;
    let storage = Storage::new(&db_path)?;
    tracing::debug!(path = %db_path.display(), "Opened database");
    Ok(Services::new(storage))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Stats => commands::admin::stats().await?,
        Commands::Users => commands::admin::users().await?,
        Commands::Popular { limit } => commands::admin::popular(limit).await?,
        Commands::CreateUser { username, email, password } => {
            commands::admin::create_user(&username, &email, &password).await?;
        },
    }

    Ok(())
}

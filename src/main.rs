mod config;
mod database;
mod engine;
mod kiosk;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use kiosk::StudyRoom;
use kiosk::commands::{admin, attendance, dashboard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "study-room")]
#[command(about = "Study room check-in kiosk with live daily and monthly rankings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Register a new student
    Register {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Remove a registered student
    Remove {
        #[arg(long)]
        code: String,
        #[arg(long)]
        password: String,
    },
    /// Check a student in or out
    Check { code: String },
    /// Roll stale daily totals into the month
    Rollover,
    /// Print the leaderboards once
    Board {
        #[arg(long)]
        json: bool,
    },
    /// Run the interactive kiosk
    Kiosk,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "study_room=info,sqlx=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    let room = StudyRoom::open(config).await?;

    match cli.command {
        Commands::InitDb => {
            println!("Schema ready.");
        }
        Commands::Register {
            code,
            name,
            password,
        } => {
            println!("{}", admin::register(&room, &code, &name, &password).await);
        }
        Commands::Remove { code, password } => {
            println!("{}", admin::remove(&room, &code, &password).await);
        }
        Commands::Check { code } => {
            println!("{}", attendance::check(&room, &code).await);
        }
        Commands::Rollover => {
            println!("{}", admin::rollover(&room).await);
        }
        Commands::Board { json } => {
            println!("{}", dashboard::board(&room, json).await?);
        }
        Commands::Kiosk => {
            attendance::kiosk(&room).await?;
        }
    }

    room.pool.close().await;
    Ok(())
}

//! Cedar Thread CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations (sessions + client-state tables)
//! ct-cli migrate storefront
//!
//! # Fill a demo catalog backend with mock products
//! ct-cli seed --count 24
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Push mock products into the catalog backend

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ct-cli")]
#[command(author, version, about = "Cedar Thread CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Fill the catalog backend with mock products
    Seed {
        /// Number of products to generate
        #[arg(short, long, default_value_t = 24)]
        count: usize,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront database migrations
    Storefront,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate {
            target: MigrateTarget::Storefront,
        } => commands::migrate::storefront().await,
        Commands::Seed { count } => commands::seed::run(count).await,
    }
}

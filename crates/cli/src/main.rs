//! Premium Food Ventures CLI - operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Report stored images that no row references
//! pfv-cli storage orphans --bucket gallery
//!
//! # Report and remove them
//! pfv-cli storage orphans --bucket products --delete
//! ```
//!
//! # Commands
//!
//! - `storage orphans` - Find (and optionally remove) unreferenced objects
//!
//! Requires `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use premium_food_core::Bucket;

mod commands;

#[derive(Parser)]
#[command(name = "pfv-cli")]
#[command(author, version, about = "Premium Food Ventures CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect object storage
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
}

#[derive(Subcommand)]
enum StorageAction {
    /// List objects in a bucket that no row references
    Orphans {
        /// Bucket to check (`gallery`, `products`, `avatars`)
        #[arg(short, long)]
        bucket: Bucket,

        /// Remove the orphaned objects after listing them
        #[arg(long)]
        delete: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Storage { action } => match action {
            StorageAction::Orphans { bucket, delete } => {
                commands::storage::orphans(bucket, delete).await?;
            }
        },
    }
    Ok(())
}

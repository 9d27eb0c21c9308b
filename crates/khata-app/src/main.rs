//! Khata CLI - drive the expense tracker's screens from a terminal
//!
//! Each subcommand runs one screen's logic against the on-disk stores named
//! in the configuration. Notices go to stderr; PINs are read from stdin.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use khata_app::AppConfig;
use khata_core::FileStore;

mod commands;

#[derive(Parser)]
#[command(name = "khata")]
#[command(about = "Expense tracker: PIN lock, profile and bank accounts", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $KHATA_CONFIG or ~/.config/khata/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// PIN lock commands
    #[command(subcommand)]
    Pin(PinCommands),

    /// Bank account commands
    #[command(subcommand)]
    Accounts(AccountCommands),

    /// Show the user profile
    Profile,

    /// Session commands
    #[command(subcommand)]
    Session(SessionCommands),
}

#[derive(Subcommand)]
enum PinCommands {
    /// Set up or change the 4-digit PIN
    Setup,
    /// Unlock with the PIN
    Unlock,
    /// Show whether a PIN is set
    Status,
}

#[derive(Subcommand)]
enum AccountCommands {
    /// List stored accounts
    List,

    /// List banks accepted by `add`
    Banks,

    /// Add an account
    Add {
        /// Bank name, one of `khata accounts banks`
        #[arg(short, long)]
        bank: String,

        /// Account holder name
        #[arg(long)]
        holder: String,

        /// Account number
        #[arg(short, long)]
        number: String,
    },

    /// Remove the account at INDEX
    Remove {
        index: usize,

        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },

    /// Link the account at INDEX
    Link {
        index: usize,

        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Show session and PIN state
    Status,
    /// Revoke the session token
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", config.data_dir))?;

    let ctx = commands::Context {
        secure: Arc::new(FileStore::new(config.secure_store_path())),
        local: Arc::new(FileStore::new(config.local_store_path())),
        config,
    };

    let result = match cli.command {
        Commands::Pin(PinCommands::Setup) => commands::pin_setup(&ctx).await,
        Commands::Pin(PinCommands::Unlock) => commands::pin_unlock(&ctx).await,
        Commands::Pin(PinCommands::Status) => commands::pin_status(&ctx).await,
        Commands::Accounts(AccountCommands::List) => commands::accounts_list(&ctx).await,
        Commands::Accounts(AccountCommands::Banks) => {
            commands::accounts_banks();
            Ok(())
        }
        Commands::Accounts(AccountCommands::Add {
            bank,
            holder,
            number,
        }) => commands::accounts_add(&ctx, bank, holder, number).await,
        Commands::Accounts(AccountCommands::Remove { index, yes }) => {
            commands::accounts_remove(&ctx, index, yes).await
        }
        Commands::Accounts(AccountCommands::Link { index, yes }) => {
            commands::accounts_link(&ctx, index, yes).await
        }
        Commands::Profile => commands::profile(&ctx).await,
        Commands::Session(SessionCommands::Status) => commands::session_status(&ctx).await,
        Commands::Session(SessionCommands::Logout) => commands::session_logout(&ctx).await,
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }
    result
}

//! CLI command definitions and dispatch.

pub mod invite;
pub mod migrate;
pub mod seed;
pub mod serve;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use roster_api::{AppState, open_store};
use roster_core::config::AppConfig;
use roster_core::error::AppError;
use roster_service::mail::build_transport;

use crate::output::OutputFormat;

/// Roster: user, authentication and account administration
#[derive(Debug, Parser)]
#[command(name = "roster", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(short, long, env = "ROSTER_CONFIG_DIR", default_value = "config")]
    pub config: String,

    /// Environment overlay to load (development, test, production)
    #[arg(short, long, env = "ROSTER_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Roster server
    Serve(serve::ServeArgs),
    /// Apply database migrations
    Migrate,
    /// Create an admin account and mail its invitation
    InviteAdmin(invite::InviteArgs),
    /// User management
    User(user::UserArgs),
    /// Replace every user with the seed fixtures
    Seed(seed::SeedArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(&config).await,
            Commands::InviteAdmin(args) => invite::execute(args, config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
            Commands::Seed(args) => seed::execute(args, config, self.format).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}

/// Builds the same service graph the server runs on.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let (store, _pool) = open_store(&config).await?;
    let transport = build_transport(&config.mail)?;
    AppState::new(config, Arc::clone(&store), transport)
}

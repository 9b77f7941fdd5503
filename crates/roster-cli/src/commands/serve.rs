//! Start the Roster server.

use clap::Args;

use roster_core::config::AppConfig;
use roster_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Apply pending migrations before serving
    #[arg(long)]
    pub migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.migrate {
        config.database.run_migrations = true;
    }

    println!("Starting Roster server...");
    println!("  Environment: {:?}", config.environment);
    println!("  Listening:   {}:{}", config.server.host, config.server.port);

    roster_api::run_server(config).await
}

//! Seed data command.

use clap::Args;

use roster_core::config::AppConfig;
use roster_core::error::AppError;

use crate::output::{self, OutputFormat, UserRow};

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Delete every user and insert the fixtures. Refused in production.
pub async fn execute(
    args: &SeedArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if config.environment.is_production() {
        return Err(AppError::authorization(
            "Seeding is not available in production",
        ));
    }

    if !args.yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("This will DELETE every user and insert the seed fixtures. Continue?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            output::print_warning("Cancelled.");
            return Ok(());
        }
    }

    let state = super::build_state(config).await?;
    let users = state.seed_service.reset().await?;
    let profiles: Vec<_> = users.iter().map(|u| u.profile()).collect();

    output::print_success(&format!("Database reset with {} seed users", profiles.len()));
    output::print_list::<_, UserRow>(&profiles, format);
    Ok(())
}

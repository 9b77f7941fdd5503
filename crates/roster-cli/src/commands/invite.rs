//! Bootstrap an admin account.

use clap::Args;

use roster_core::config::AppConfig;
use roster_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the invite-admin command
#[derive(Debug, Args)]
pub struct InviteArgs {
    /// Email address of the new admin
    #[arg(long)]
    pub email: String,
}

/// Create the admin and send the invitation mail. Works in every environment.
pub async fn execute(
    args: &InviteArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::build_state(config).await?;
    let user = state.seed_service.invite_admin(&args.email).await?;

    output::print_success(&format!("Invitation sent to {}", user.email));
    output::print_user(&user.profile(), format);
    Ok(())
}

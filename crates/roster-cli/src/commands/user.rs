//! User management CLI commands.

use clap::{Args, Subcommand};

use roster_core::config::AppConfig;
use roster_core::error::AppError;
use roster_core::types::PageRequest;
use roster_entity::UserQuery;

use crate::output::{self, OutputFormat, UserRow};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users, newest first
    List {
        /// Also show archived users
        #[arg(long)]
        include_archived: bool,
        /// Match against email, first and last name
        #[arg(short, long)]
        search: Option<String>,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Users per page
        #[arg(long, default_value_t = 50)]
        limit: u64,
    },
    /// Restore an archived user
    Restore {
        /// User id
        id: String,
    },
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::build_state(config).await?;

    match &args.command {
        UserCommand::List {
            include_archived,
            search,
            page,
            limit,
        } => {
            let query = UserQuery {
                search: search.clone(),
                include_archived: *include_archived,
                page: PageRequest::new(*page, *limit),
                ..UserQuery::default()
            };
            let result = state.user_service.find_all(&query).await?;

            output::print_list::<_, UserRow>(&result.data, format);
            if format == OutputFormat::Table && result.total_pages > 1 {
                println!("Page {} of {} ({} users)", result.page, result.total_pages, result.total);
            }
        }
        UserCommand::Restore { id } => {
            let id = uuid::Uuid::parse_str(id)
                .map_err(|_| AppError::validation(format!("Invalid user id: {id}")))?;
            let user = state.user_service.restore(id).await?;

            output::print_success(&format!("User '{}' restored", user.email));
            output::print_user(&user.profile(), format);
        }
    }

    Ok(())
}

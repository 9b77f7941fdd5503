//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use roster_entity::UserProfile;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One user as a table row.
#[derive(Debug, Serialize, Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Last login")]
    pub last_login: String,
    #[tabled(rename = "Archived")]
    pub archived: String,
}

impl From<&UserProfile> for UserRow {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.label.clone(),
            role: user.role.as_str().to_string(),
            last_login: format_time(user.last_login_at),
            archived: format_time(user.deleted_at),
        }
    }
}

fn format_time(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Print a list of items in the selected format. JSON output keeps the
/// full records rather than the table rows.
pub fn print_list<T, R>(items: &[T], format: OutputFormat)
where
    T: Serialize,
    R: Tabled + for<'a> From<&'a T>,
{
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let rows: Vec<R> = items.iter().map(R::from).collect();
                println!("{}", Table::new(rows));
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Print a single user in the selected format
pub fn print_user(user: &UserProfile, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            print_kv("ID", &user.id.to_string());
            print_kv("Email", &user.email);
            print_kv("Name", &user.label);
            print_kv("Role", user.role.as_str());
            print_kv("Created", &format_time(Some(user.created_at)));
            print_kv("Archived", &format_time(user.deleted_at));
        }
        OutputFormat::Json => print_json(user),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => print_error(&format!("Failed to serialize output: {e}")),
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<12} {}", format!("{key}:"), value);
}

//! Signing secrets.

use roster_entity::user::User;

/// Per-user secret: `{base}-{password_hash}-{created_at_ms}`.
pub fn derived_secret(base: &str, user: &User) -> String {
    format!(
        "{base}-{}-{}",
        user.password_hash,
        user.created_at.timestamp_millis()
    )
}

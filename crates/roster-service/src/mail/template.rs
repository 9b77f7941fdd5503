//! Plain-text bodies for account mail.

use reqwest::Url;

use roster_core::error::AppError;

/// Link to the frontend page where a reset or invitation token is redeemed.
pub fn reset_link(origin: &str, token: &str) -> Result<String, AppError> {
    let base = format!("{}/auth/reset-password", origin.trim_end_matches('/'));
    Url::parse_with_params(&base, &[("token", token)])
        .map(String::from)
        .map_err(|e| AppError::configuration(format!("Invalid server.origin '{origin}': {e}")))
}

pub const RESET_SUBJECT: &str = "Password Reset Request";
pub const INVITATION_SUBJECT: &str = "You have been invited to join";

pub fn password_reset_body(first_name: &str, url: &str, from_name: &str) -> String {
    format!(
        "Hello {first_name},\n\n\
         We received a request to reset the password for your account.\n\
         Open the link below to choose a new password. The link expires in one hour.\n\n\
         {url}\n\n\
         If you did not request a password reset, you can ignore this email.\n\n\
         {from_name}\n\n\
         This is an automated message. Please do not reply to this email.\n"
    )
}

pub fn invitation_body(first_name: &str, url: &str, from_name: &str) -> String {
    format!(
        "Hello {first_name},\n\n\
         An administrator has created an account for you.\n\
         Open the link below to set your password. The link expires in seven days.\n\n\
         {url}\n\n\
         {from_name}\n\n\
         This invitation was sent to you by an administrator of our platform.\n"
    )
}

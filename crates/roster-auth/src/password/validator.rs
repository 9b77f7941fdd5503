//! Password policy enforcement for new passwords.

use roster_core::config::AuthConfig;
use roster_core::error::AppError;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "@$!%*?&";

/// Message shown when a password breaks the composition rules.
pub const POLICY_MESSAGE: &str = "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character";

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    /// zxcvbn score floor; 0 disables the check.
    min_strength: u8,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_strength: config.password_min_strength,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !meets_composition(password) {
            return Err(AppError::validation(POLICY_MESSAGE));
        }

        if self.min_strength > 0 {
            let estimate = zxcvbn::zxcvbn(password, &[]);
            if (estimate.score() as u8) < self.min_strength {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password with more entropy.",
                ));
            }
        }

        Ok(())
    }
}

/// Lowercase, uppercase, digit and one of [`SPECIAL_CHARACTERS`] all present.
pub fn meets_composition(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL_CHARACTERS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_accepts_policy_compliant_password() {
        assert!(validator().validate("Passw0rd!").is_ok());
    }

    #[test]
    fn test_rejects_each_missing_class() {
        let v = validator();
        assert!(v.validate("Sh0rt!").is_err());
        assert!(v.validate("password1!").is_err());
        assert!(v.validate("PASSWORD1!").is_err());
        assert!(v.validate("Password!!").is_err());
        assert!(v.validate("Password11").is_err());
    }

    #[test]
    fn test_other_punctuation_does_not_count_as_special() {
        assert!(validator().validate("Passw0rd#").is_err());
        assert!(validator().validate("Passw0rd#!").is_ok());
    }

    #[test]
    fn test_strength_floor_when_enabled() {
        let config = AuthConfig {
            password_min_strength: 4,
            ..AuthConfig::default()
        };
        let v = PasswordValidator::new(&config);
        assert!(v.validate("Passw0rd!").is_err());
    }
}

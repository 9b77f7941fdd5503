//! Human-readable duration strings such as `15m` or `7d`.

use std::time::Duration;

use crate::error::AppError;

/// Parse `<n>ms`, `<n>s`, `<n>m`, `<n>h` or `<n>d` into a [`Duration`].
pub fn parse_duration(input: &str) -> Result<Duration, AppError> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| AppError::configuration(format!("Invalid duration '{input}'")))?;

    let millis_per_unit: u64 = match unit.trim() {
        "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        other => {
            return Err(AppError::configuration(format!(
                "Unknown duration unit '{other}' in '{input}'"
            )));
        }
    };

    value
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| AppError::configuration(format!("Duration '{input}' is too large")))
}

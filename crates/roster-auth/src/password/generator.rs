//! Random initial passwords for invited users.

use argon2::password_hash::rand_core::{OsRng, RngCore};

/// Number of random bytes behind a generated password.
const GENERATED_BYTES: usize = 20;

/// Returns 20 random bytes, hex encoded (40 characters).
///
/// Invited users never learn this password; they replace it through the
/// invitation link.
pub fn generate_password() -> String {
    let mut bytes = [0u8; GENERATED_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

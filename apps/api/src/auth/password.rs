// Password hashing utilities
// Uses bcrypt for secure password hashing

use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashes a password using bcrypt at the given cost
///
/// # Example
/// ```
/// use hackathon_api::auth::password::hash_password;
///
/// let hash = hash_password("my_password", 4).expect("valid hash");
/// ```
pub fn hash_password(password: &str, cost: u32) -> Result<String, String> {
    hash(password, cost).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
///
/// # Returns
/// * `Ok(bool)` - True if password matches, false otherwise
/// * `Err(String)` - If the hash is malformed
///
/// # Example
/// ```
/// use hackathon_api::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("my_password", 4).unwrap();
/// let valid = verify_password("my_password", &hash).unwrap();
/// assert!(valid);
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

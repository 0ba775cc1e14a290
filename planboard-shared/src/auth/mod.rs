/// Authentication utilities
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: signed session tokens and the token → user resolver
///
/// # Example
///
/// ```
/// use planboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod session;

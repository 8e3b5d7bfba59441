use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;

/// Shortest password accepted for a new user, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash with Argon2id using the library's fixed default cost parameters
/// and a fresh random salt, so equal inputs never produce equal hashes.
pub fn hash_password(plain: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string())
}

/// Counterpart to [`hash_password`]: true when `plain` matches the stored PHC hash.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(plain.as_bytes(), &parsed))
        .is_ok()
}

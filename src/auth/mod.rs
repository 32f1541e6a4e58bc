use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;

use crate::database::DatabaseError;

/// Hash a plaintext password into an argon2id PHC string
pub fn hash_password(plain: &str) -> Result<String, DatabaseError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DatabaseError::PasswordHash(e.to_string()))
}

use std::sync::LazyLock;

/// Work factor used for every new hash. The salt is random per call and
/// embedded in the output, so hashing the same password twice differs.
pub const HASH_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
#[error("failed to hash password: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// hash_password
///
/// One-way bcrypt hash of `plaintext` with a freshly generated salt.
///
/// # Errors
/// Fails if `plaintext` is longer than the 72 bytes bcrypt reads (it is never
/// silently cut), or if the system random source fails.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::non_truncating_hash(plaintext, HASH_COST)?)
}

/// verify_password
///
/// True iff `plaintext` matches `hashed` under its embedded salt.
/// A malformed stored hash counts as a mismatch rather than an error.
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    match bcrypt::verify(plaintext, hashed) {
        Ok(matches) => matches,
        Err(err) => {
            tracing::warn!("stored password hash could not be parsed: {err}");
            false
        }
    }
}

// Hash of a throwaway value, built on first use.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no account has this password").ok());

/// verify_unknown
///
/// Spends the same bcrypt work as `verify_password` for a login whose email
/// matched no account, so the response time does not reveal which emails are
/// registered. Always false.
pub fn verify_unknown(plaintext: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plaintext, hash);
    }
    false
}

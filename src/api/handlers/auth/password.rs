//! Password hashing on top of bcrypt.
//!
//! The stored string is bcrypt's modular crypt format, so algorithm tag,
//! cost, and salt travel with the digest and `verify` needs no extra
//! configuration.

use anyhow::{Context, Result};

/// Hash a plaintext password with a fresh random salt.
///
/// Empty passwords are valid input; the cost factor comes from process
/// configuration.
///
/// # Errors
///
/// Returns an error only when the underlying primitive fails (for example
/// an out-of-range cost), never based on password content.
pub(crate) fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).context("failed to hash password")
}

/// Check a candidate password against a stored hash.
///
/// Comparison is delegated to bcrypt, which compares digests in constant
/// time. Malformed stored hashes and failed recomputations are both
/// reported as a mismatch rather than an error, so callers branch on a
/// plain boolean.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the test suite fast; production cost comes from
    // configuration.
    const COST: u32 = 4;

    #[test]
    fn hash_then_verify_round_trips() -> Result<()> {
        let hash = hash_password("testPassword123!", COST)?;
        assert!(verify_password("testPassword123!", &hash));
        assert!(!verify_password("testPassword123?", &hash));
        Ok(())
    }

    #[test]
    fn same_password_hashes_differently() -> Result<()> {
        let first = hash_password("correct horse battery staple", COST)?;
        let second = hash_password("correct horse battery staple", COST)?;
        assert_ne!(first, second);
        assert!(verify_password("correct horse battery staple", &first));
        assert!(verify_password("correct horse battery staple", &second));
        Ok(())
    }

    #[test]
    fn empty_password_is_hashable() -> Result<()> {
        let hash = hash_password("", COST)?;
        assert!(verify_password("", &hash));
        assert!(!verify_password("not-empty", &hash));
        Ok(())
    }

    #[test]
    fn empty_candidate_never_errors() -> Result<()> {
        let hash = hash_password("secret", COST)?;
        assert!(!verify_password("", &hash));
        Ok(())
    }

    #[test]
    fn garbage_hash_is_a_mismatch_not_a_panic() {
        assert!(!verify_password("secret", "not-a-bcrypt-hash"));
        assert!(!verify_password("secret", ""));
    }

    #[test]
    fn hash_self_describes_cost() -> Result<()> {
        let hash = hash_password("secret", COST)?;
        // "$2b$04$..." carries the algorithm tag and cost factor.
        assert!(hash.starts_with("$2"));
        assert!(hash.contains("$04$"));
        Ok(())
    }
}

//! # Soporte (Customer Support Platform API)
//!
//! `soporte` is the backend API for the soporte customer-support platform.
//! This crate covers the account and session subsystem: signup, login,
//! logout, and the authenticated `me` endpoint, backed by a Postgres user
//! store.
//!
//! ## Sessions
//!
//! A successful signup or login mints an HS256-signed token carrying the
//! user id, email, and an absolute expiry. The token travels in an
//! `HttpOnly` cookie (`Authorization: Bearer` is accepted as a fallback for
//! API clients). Tokens are verified on every request; the `me` endpoint
//! additionally re-reads the user row so revoked accounts drop out as soon
//! as the row is gone.
//!
//! ## Responses
//!
//! Every endpoint replies with the same JSON envelope: `{"success": true,
//! "data": ...}` on success, `{"success": false, "error": "..."}` plus a
//! matching HTTP status on failure. Credential failures share one message
//! regardless of cause to resist account enumeration.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
